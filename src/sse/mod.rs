//! SSE (Server-Sent Events) framing
//!
//! Turns the raw body of an agent stream into discrete events.
//! SSE format consists of:
//! - `data: <json>` - data payload line(s)
//! - `event: <name>`, `id: <id>`, `retry: <ms>` - optional fields
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `events` - `StreamEvent` and `SseLine`
//! - `decode` - incremental UTF-8 decoding of transport chunks
//! - `parser` - `FrameParser` and `parse_sse_line`

mod decode;
mod events;
mod parser;

pub use decode::Utf8ChunkDecoder;
pub use events::{SseLine, StreamEvent};
pub use parser::{parse_sse_line, FrameParser};
