//! Error types for agent streams.
//!
//! Two tiers, matching how far an error travels:
//!
//! | Type | Scope | Reaches consumer? |
//! |------|-------|-------------------|
//! | [`FrameError`] | one malformed `data:` payload | no, logged and skipped |
//! | [`StreamError`] | the whole stream | yes, once, as `StreamUpdate::Failed` |
//!
//! Transport-level errors from the HTTP seam ([`crate::traits::HttpError`])
//! convert into `StreamError` at the client boundary.

mod frame;
mod stream;

pub use frame::FrameError;
pub use stream::StreamError;
