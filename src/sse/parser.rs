//! SSE framing
//!
//! Contains the stateful `FrameParser` that buffers arbitrary text chunks and
//! hands back complete events, plus the line classifier it is built on.
//!
//! Events are separated by a blank line (`\n\n`). Within a block, all `data:`
//! bodies are concatenated with no separator: the backend sends exactly one
//! JSON document per event and never splits it across `data:` lines.

use tracing::{debug, warn};

use crate::sse::events::{SseLine, StreamEvent};

const BLOCK_DELIMITER: &str = "\n\n";

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.trim().is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        // Only the single optional space after the colon belongs to framing
        let body = rest.strip_prefix(' ').unwrap_or(rest);
        return SseLine::Data(body.to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("id:") {
        return SseLine::Id(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("retry:") {
        return SseLine::Retry(rest.trim().to_string());
    }

    SseLine::Unknown(line.to_string())
}

/// Build an event from one delimiter-free block, or `None` when the block
/// carries no data.
fn parse_block(block: &str) -> Option<StreamEvent> {
    let mut event = StreamEvent::default();
    let mut data = String::new();

    for line in block.split('\n') {
        match parse_sse_line(line) {
            SseLine::Data(body) => data.push_str(&body),
            SseLine::Event(name) => event.event = Some(name),
            SseLine::Id(id) => event.id = Some(id),
            SseLine::Retry(value) => match value.parse::<u64>() {
                Ok(ms) => event.retry = Some(ms),
                Err(_) => debug!(value = %value, "ignoring non-numeric retry field"),
            },
            SseLine::Comment(_) | SseLine::Empty | SseLine::Unknown(_) => {}
        }
    }

    let data = data.trim();
    if data.is_empty() {
        return None;
    }
    event.data = data.to_string();
    Some(event)
}

/// Stateful SSE parser that buffers chunks and emits complete events.
///
/// Chunk boundaries need not line up with lines or events: feeding a stream
/// in any number of pieces yields the same events as feeding it whole.
#[derive(Debug, Default)]
pub struct FrameParser {
    buffer: String,
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every event completed by it, in wire order.
    ///
    /// Never fails: unknown fields, comments and empty data blocks are
    /// skipped silently.
    pub fn push(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.buffer.push_str(chunk);
        if self.buffer.contains('\r') {
            // A lone trailing '\r' survives until the chunk holding its '\n' arrives
            self.buffer = self.buffer.replace("\r\n", "\n");
        }
        self.drain_blocks()
    }

    /// Flush at end of stream.
    ///
    /// Complete blocks are emitted as in `push`. Whatever is left over is
    /// scanned line by line and each `data:` line whose body is valid JSON is
    /// emitted on its own; anything else is logged and dropped. The buffer is
    /// empty afterwards.
    pub fn finalize(&mut self) -> Vec<StreamEvent> {
        let mut events = self.drain_blocks();
        let residue = std::mem::take(&mut self.buffer);

        for line in residue.split('\n') {
            let SseLine::Data(body) = parse_sse_line(line.trim_end_matches('\r')) else {
                continue;
            };
            let body = body.trim();
            if body.is_empty() {
                continue;
            }
            match serde_json::from_str::<serde_json::Value>(body) {
                Ok(_) => events.push(StreamEvent::from_data(body)),
                Err(err) => warn!(
                    error = %err,
                    fragment = %body,
                    "dropping malformed trailing SSE fragment"
                ),
            }
        }

        events
    }

    /// Text received but not yet framed into an event
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn drain_blocks(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let mut consumed = 0;

        while let Some(pos) = self.buffer[consumed..].find(BLOCK_DELIMITER) {
            let block = &self.buffer[consumed..consumed + pos];
            if let Some(event) = parse_block(block) {
                events.push(event);
            }
            consumed += pos + BLOCK_DELIMITER.len();
        }

        if consumed > 0 {
            self.buffer.drain(..consumed);
        }
        events
    }
}
