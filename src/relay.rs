use log::{ debug, warn };
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::config::persona::Persona;
use crate::error::RelayError;
use crate::llm::chat::{ new_client, ChatClient, CompletionRequest, LlmError };
use crate::llm::{ scrub_key, LlmConfig };
use crate::models::chat::{ ChatMessage, ChatReply, Role };

/// Stateless bridge between the browser chat widget and the chat provider.
///
/// Holds only read-only configuration, so one instance is shared by every
/// request without locking.
pub struct Relay {
    chat_client: Option<Arc<dyn ChatClient>>,
    persona: Persona,
    secret: Option<String>,
}

impl Relay {
    pub fn new(
        chat_client: Option<Arc<dyn ChatClient>>,
        persona: Persona,
        secret: Option<String>
    ) -> Self {
        Self { chat_client, persona, secret }
    }

    pub fn from_config(config: &LlmConfig, persona: Persona) -> Result<Self, LlmError> {
        let chat_client = new_client(config)?;
        Ok(Self::new(chat_client, persona, config.api_key.clone()))
    }

    pub fn is_configured(&self) -> bool {
        self.chat_client.is_some()
    }

    pub fn model(&self) -> Option<String> {
        self.chat_client.as_ref().map(|c| c.get_model())
    }

    /// The sequence actually sent upstream: the persona first, then the
    /// caller's turns minus any system turns they tried to slip in.
    pub fn outbound_messages(&self, turns: Vec<ChatMessage>) -> Vec<ChatMessage> {
        let mut outbound = Vec::with_capacity(turns.len() + 1);
        outbound.push(self.persona.to_message());
        outbound.extend(turns.into_iter().filter(|turn| turn.role != Role::System));
        outbound
    }

    pub async fn relay(&self, turns: Vec<ChatMessage>) -> Result<ChatReply, RelayError> {
        let client = self.chat_client.as_ref().ok_or(RelayError::ConfigurationError)?;

        let caller_turns = turns.len();
        let messages = self.outbound_messages(turns);
        if messages.len() != caller_turns + 1 {
            warn!("Dropped {} caller-supplied system turn(s)", caller_turns + 1 - messages.len());
        }
        debug!("Forwarding {} message(s) to {}", messages.len(), client.get_base_url());

        let completion = client
            .complete(&CompletionRequest::new(messages)).await
            .map_err(|e| self.map_llm_error(e))?;

        let message = completion.message.ok_or(RelayError::EmptyResponse)?;
        let content = message.content.ok_or(RelayError::EmptyResponse)?;

        Ok(ChatReply { message: content, role: message.role })
    }

    fn map_llm_error(&self, err: LlmError) -> RelayError {
        match err {
            LlmError::Status { status, body } => {
                let details = serde_json::from_str::<JsonValue>(&body).ok();
                let message = details
                    .as_ref()
                    .and_then(upstream_message)
                    .unwrap_or_else(|| {
                        format!(
                            "provider error: {}",
                            status.canonical_reason().unwrap_or(status.as_str())
                        )
                    });
                RelayError::UpstreamError {
                    status: status.as_u16(),
                    message: self.scrub(&message),
                    details: details.map(|d| self.scrub_value(d)),
                }
            }
            LlmError::Timeout =>
                RelayError::UpstreamUnavailable {
                    message: "Chat provider timed out".to_string(),
                    timed_out: true,
                },
            other => {
                warn!("Chat provider unreachable: {}", self.scrub(&other.to_string()));
                RelayError::UpstreamUnavailable {
                    message: "Failed to reach chat provider".to_string(),
                    timed_out: false,
                }
            }
        }
    }

    fn scrub(&self, text: &str) -> String {
        match &self.secret {
            Some(secret) => scrub_key(text, secret),
            None => text.to_string(),
        }
    }

    fn scrub_value(&self, value: JsonValue) -> JsonValue {
        match value {
            JsonValue::String(s) => JsonValue::String(self.scrub(&s)),
            JsonValue::Array(items) =>
                JsonValue::Array(
                    items
                        .into_iter()
                        .map(|v| self.scrub_value(v))
                        .collect()
                ),
            JsonValue::Object(map) =>
                JsonValue::Object(
                    map
                        .into_iter()
                        .map(|(k, v)| (k, self.scrub_value(v)))
                        .collect()
                ),
            other => other,
        }
    }
}

/// Best-effort message from a provider error body. Providers disagree on the
/// shape, so several are accepted.
fn upstream_message(body: &JsonValue) -> Option<String> {
    let candidate = match body.get("error") {
        Some(JsonValue::Object(err)) => err.get("message"),
        Some(err @ JsonValue::String(_)) => Some(err),
        _ => body.get("message"),
    };
    candidate
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}
