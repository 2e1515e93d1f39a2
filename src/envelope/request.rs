use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JSON-RPC method every agent stream is opened with
pub const STREAM_METHOD: &str = "message/stream";

/// JSON-RPC protocol version carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// Request envelope POSTed to an agent endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: StreamParams,
    /// Call id, fresh per request
    pub id: String,
}

/// `params` of a `message/stream` call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamParams {
    /// Task id, fresh per request
    pub id: String,
    /// Conversation the message belongs to
    pub session_id: String,
    pub message: UserMessage,
}

/// The user's utterance in agent message form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserMessage {
    pub role: String,
    pub parts: Vec<TextPart>,
}

/// A single text part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

impl StreamRequest {
    /// Create a request starting a new conversation
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_session(text, Uuid::new_v4().to_string())
    }

    /// Create a request continuing the conversation `session_id`
    pub fn with_session(text: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: STREAM_METHOD.to_string(),
            params: StreamParams {
                id: Uuid::new_v4().to_string(),
                session_id: session_id.into(),
                message: UserMessage {
                    role: "user".to_string(),
                    parts: vec![TextPart::new(text)],
                },
            },
            id: Uuid::new_v4().to_string(),
        }
    }

    /// Continue `session_id` when given, otherwise start fresh
    pub fn for_session(text: impl Into<String>, session_id: Option<&str>) -> Self {
        match session_id {
            Some(id) => Self::with_session(text, id),
            None => Self::new(text),
        }
    }

    /// The resolved conversation id
    pub fn session_id(&self) -> &str {
        &self.params.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let request = StreamRequest::with_session("Hello", "sess-1");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "message/stream");
        assert_eq!(value["params"]["sessionId"], "sess-1");
        assert_eq!(
            value["params"]["message"],
            json!({"role": "user", "parts": [{"type": "text", "text": "Hello"}]})
        );
        assert!(value["params"]["id"].as_str().is_some());
        assert!(value["id"].as_str().is_some());
        assert!(value["params"].get("session_id").is_none());
    }

    #[test]
    fn test_fresh_ids_per_request() {
        let a = StreamRequest::with_session("x", "s");
        let b = StreamRequest::with_session("x", "s");
        assert_ne!(a.id, b.id);
        assert_ne!(a.params.id, b.params.id);
        assert_ne!(a.id, a.params.id);
    }

    #[test]
    fn test_new_generates_session() {
        let request = StreamRequest::new("hi");
        assert!(Uuid::parse_str(request.session_id()).is_ok());
    }

    #[test]
    fn test_for_session() {
        assert_eq!(StreamRequest::for_session("hi", Some("abc")).session_id(), "abc");
        assert_ne!(StreamRequest::for_session("hi", None).session_id(), "abc");
    }
}
