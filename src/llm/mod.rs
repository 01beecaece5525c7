pub mod chat;

use std::time::Duration;

use crate::cli::Args;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const REDACTED_PREFIX_LEN: usize = 4;
const MIN_SCRUB_LEN: usize = REDACTED_PREFIX_LEN * 2;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub completion_model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            completion_model: DEFAULT_CHAT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LlmConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            api_key: args.api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            completion_model: args.chat_model.clone(),
            base_url: args.chat_base_url.clone(),
            timeout: Duration::from_secs(args.request_timeout_secs),
        }
    }

    pub fn redacted_key(&self) -> String {
        redact_key(self.api_key.as_deref())
    }
}

/// Renders a credential for logs: a short prefix and nothing else.
pub fn redact_key(key: Option<&str>) -> String {
    match key {
        None => "<unset>".to_string(),
        Some(k) if k.chars().count() <= REDACTED_PREFIX_LEN * 2 => "…".to_string(),
        Some(k) => {
            let prefix: String = k.chars().take(REDACTED_PREFIX_LEN).collect();
            format!("{}…", prefix)
        }
    }
}

/// Replaces every occurrence of `key` in `text` with its redacted form.
/// Keys too short to be a real credential are left alone, since they would
/// match unrelated text.
pub fn scrub_key(text: &str, key: &str) -> String {
    if key.chars().count() < MIN_SCRUB_LEN {
        return text.to_string();
    }
    text.replace(key, &redact_key(Some(key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_never_reveals_the_whole_key() {
        let key = "sk-live-0123456789abcdef";
        let shown = redact_key(Some(key));
        assert_eq!(shown, "sk-l…");
        assert!(!shown.contains(key));
    }

    #[test]
    fn short_keys_are_fully_hidden() {
        assert_eq!(redact_key(Some("abc123")), "…");
        assert_eq!(redact_key(None), "<unset>");
    }

    #[test]
    fn scrub_replaces_embedded_keys() {
        let key = "sk-live-0123456789abcdef";
        let text = format!("Incorrect API key provided: {}.", key);
        let scrubbed = scrub_key(&text, key);
        assert_eq!(scrubbed, "Incorrect API key provided: sk-l….");
        assert_eq!(scrub_key("nothing here", ""), "nothing here");
    }

    #[test]
    fn tiny_keys_do_not_mangle_messages() {
        let text = "Rate limit reached for requests";
        assert_eq!(scrub_key(text, "e"), text);
        assert_eq!(scrub_key(text, "re"), text);
        assert_eq!(scrub_key("key=abcd1234", "abcd1234"), "key=…");
    }
}
