//! Inbound envelope deserialization structs
//!
//! Internal structs for the two payload shapes an agent may put on a
//! `data:` line: the JSON-RPC envelope and the older flat shape.

use serde::Deserialize;

/// JSON-RPC envelope wrapping every current stream event
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RpcEnvelope {
    pub jsonrpc: String,
    #[serde(default)]
    pub result: Option<RpcResult>,
    /// Protocol-level error (no `result`)
    #[serde(default)]
    pub error: Option<RpcError>,
    #[serde(default, rename = "final")]
    pub is_final: Option<bool>,
}

impl RpcEnvelope {
    /// Whether this looks like a JSON-RPC 2.0 response at all
    pub fn is_response(&self) -> bool {
        self.jsonrpc == "2.0" && (self.result.is_some() || self.error.is_some())
    }

    /// `final` from the top level, else from inside `result`
    pub fn is_final(&self) -> bool {
        self.is_final
            .or_else(|| self.result.as_ref().and_then(|r| r.is_final))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcResult {
    #[serde(default)]
    pub artifact: Option<Artifact>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub error: Option<RpcError>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, rename = "final")]
    pub is_final: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Artifact {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One message part; only `type: "text"` parts carry conversational text
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Part {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TaskStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub message: Option<StatusMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StatusMessage {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RpcError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Flat payload from older backends
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LegacyPayload {
    #[serde(rename = "type")]
    pub kind: LegacyKind,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl LegacyPayload {
    /// `content`, falling back to `message`
    pub fn content_first(&self) -> Option<String> {
        self.content.clone().or_else(|| self.message.clone())
    }

    /// `message`, falling back to `content`
    pub fn message_first(&self) -> Option<String> {
        self.message.clone().or_else(|| self.content.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LegacyKind {
    Artifact,
    Status,
    Error,
}

/// Concatenate the text of all `type: "text"` parts
pub(crate) fn text_of(parts: &[Part]) -> String {
    parts
        .iter()
        .filter(|p| p.kind.as_deref() == Some("text"))
        .filter_map(|p| p.text.as_deref())
        .collect()
}
