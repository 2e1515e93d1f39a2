//! Wire envelopes for agent streams
//!
//! - `request` - the outbound `message/stream` JSON-RPC call
//! - `payloads` - inbound payload shapes (internal)
//! - `classify` - turning one `data:` payload into [`Signal`]s

mod classify;
mod payloads;
mod request;

pub use classify::{classify, Signal, DEFAULT_BACKEND_ERROR};
pub use request::{StreamParams, StreamRequest, TextPart, UserMessage, JSONRPC_VERSION, STREAM_METHOD};
