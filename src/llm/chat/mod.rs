pub mod openai;

use async_trait::async_trait;
use log::info;
use serde::{ Deserialize, Serialize };
use std::sync::Arc;

use super::LlmConfig;
use crate::models::chat::{ ChatMessage, Role };
use self::openai::OpenAIChatClient;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    /// The provider answered with a non-success status; `body` is the raw text.
    #[error("provider returned {status}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("request to the chat provider timed out")]
    Timeout,

    #[error("failed to reach the chat provider: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("API key cannot be used in an Authorization header")]
    InvalidApiKey,

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { LlmError::Timeout } else { LlmError::Transport(err) }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletionMessage {
    #[serde(default = "default_role")]
    pub role: Role,
    pub content: Option<String>,
}

fn default_role() -> Role {
    Role::Assistant
}

/// First choice of a successful completion, if the provider sent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub message: Option<CompletionMessage>,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

/// Builds the upstream client, or `None` when no credential is configured.
pub fn new_client(config: &LlmConfig) -> Result<Option<Arc<dyn ChatClient>>, LlmError> {
    let Some(api_key) = config.api_key.clone() else {
        return Ok(None);
    };
    let client = OpenAIChatClient::new(
        api_key,
        config.completion_model.clone(),
        config.base_url.clone(),
        config.timeout
    )?;
    info!(
        "Chat client configured: Model={}, BaseURL={}, Key={}",
        client.get_model(),
        client.get_base_url(),
        config.redacted_key()
    );
    Ok(Some(Arc::new(client)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_means_no_client() {
        let config = LlmConfig::default();
        assert!(new_client(&config).unwrap().is_none());
    }

    #[test]
    fn key_yields_a_client() {
        let config = LlmConfig { api_key: Some("sk-test-abcdefgh".into()), ..LlmConfig::default() };
        let client = new_client(&config).unwrap().expect("client");
        assert_eq!(client.get_model(), crate::llm::DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn request_uses_relay_sampling_defaults() {
        let req = CompletionRequest::new(vec![ChatMessage::new(Role::User, "hi")]);
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, 1000);
    }
}
