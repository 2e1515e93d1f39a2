//! SSE frame types
//!
//! `StreamEvent` is one complete event block lifted off the wire. `SseLine`
//! is the classification of a single line inside a block.

/// One complete SSE event extracted from the stream.
///
/// Built each time the parser finds a blank-line terminated block; the
/// parser keeps no state across blocks, so `id` is never inherited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamEvent {
    /// Value of the `id:` field, if the block had one
    pub id: Option<String>,
    /// Value of the `event:` field, if the block had one
    pub event: Option<String>,
    /// All `data:` bodies of the block joined with no separator, trimmed
    pub data: String,
    /// Reconnection hint from a numeric `retry:` field
    pub retry: Option<u64>,
}

impl StreamEvent {
    /// Create an event carrying only a data payload.
    pub fn from_data(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }
}

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Data payload (e.g., "data: {\"text\": \"hello\"}")
    Data(String),
    /// Event name declaration (e.g., "event: message")
    Event(String),
    /// Event identifier (e.g., "id: 42")
    Id(String),
    /// Reconnection delay in milliseconds, unparsed
    Retry(String),
    /// Comment line (starts with ':')
    Comment(String),
    /// Empty line
    Empty,
    /// Any field this parser does not know about
    Unknown(String),
}
