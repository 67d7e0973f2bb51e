use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a session-creation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreate {
    pub state: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Nested message submission for the unified `/run` endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
    pub new_message: Content,
}

/// Flat message submission for the per-app conversations endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRequest {
    pub score: u8,
    pub text: String,
    pub invocation_id: String,
    pub user_id: String,
}

/// Pull a conversation or invocation id out of a successful response body.
///
/// Conversation replies carry `conversation_id`; run replies are event
/// lists whose events carry `invocationId`.
pub fn extract_conversation_id(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => {
            map.get("conversation_id")
                .or_else(|| map.get("invocationId"))
                .or_else(|| map.get("invocation_id"))
                .and_then(Value::as_str)
                .map(str::to_string)
        }
        Value::Array(events) => events.iter().find_map(|event| {
            event
                .get("invocationId")
                .or_else(|| event.get("invocation_id"))
                .and_then(Value::as_str)
                .map(str::to_string)
        }),
        _ => None,
    }
}
