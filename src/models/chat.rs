use serde::{ Deserialize, Serialize };
use serde_json::Value as JsonValue;

use crate::error::RelayError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One turn of a conversation, as sent by the browser and forwarded upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

/// Pulls the `messages` array out of a chat request body, rejecting anything
/// that is not a list of `{ role, content }` turns.
pub fn parse_messages(body: &JsonValue) -> Result<Vec<ChatMessage>, RelayError> {
    let items = match body.get("messages") {
        Some(JsonValue::Array(items)) => items,
        _ => {
            return Err(RelayError::InvalidInput("Messages array is required".to_string()));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            ChatMessage::deserialize(item).map_err(|e|
                RelayError::InvalidInput(format!("Invalid message at index {}: {}", index, e))
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_messages_is_rejected() {
        for body in [json!({}), json!({ "messages": null }), json!({ "messages": "hi" })] {
            let err = parse_messages(&body).unwrap_err();
            assert_eq!(err.to_string(), "Messages array is required");
            assert_eq!(err.status().as_u16(), 400);
        }
    }

    #[test]
    fn empty_array_is_valid() {
        let parsed = parse_messages(&json!({ "messages": [] })).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn turns_keep_their_order() {
        let body = json!({
            "messages": [
                { "role": "user", "content": "hello" },
                { "role": "assistant", "content": "hi there", "id": 7 },
                { "role": "system", "content": "be brief" }
            ]
        });
        let parsed = parse_messages(&body).unwrap();
        assert_eq!(
            parsed,
            vec![
                ChatMessage::new(Role::User, "hello"),
                ChatMessage::new(Role::Assistant, "hi there"),
                ChatMessage::new(Role::System, "be brief")
            ]
        );
    }

    #[test]
    fn unknown_role_names_the_bad_index() {
        let body = json!({
            "messages": [
                { "role": "user", "content": "ok" },
                { "role": "tool", "content": "nope" }
            ]
        });
        let err = parse_messages(&body).unwrap_err();
        assert!(matches!(err, RelayError::InvalidInput(_)));
        assert!(err.to_string().starts_with("Invalid message at index 1"));
    }

    #[test]
    fn non_string_content_is_rejected() {
        let body = json!({ "messages": [{ "role": "user", "content": 42 }] });
        assert!(matches!(parse_messages(&body), Err(RelayError::InvalidInput(_))));
    }

    #[test]
    fn error_body_omits_absent_details() {
        let body = ErrorBody { error: "boom".into(), details: None };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "error": "boom" }));
    }
}
