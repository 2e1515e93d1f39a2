//! Agent Stream - streaming chat client for A2A-style agent endpoints
//!
//! - [`sse`] frames a raw SSE body into events
//! - [`envelope`] builds requests and classifies event payloads
//! - [`agent`] drives one streamed request per call
//! - [`chat`] accumulates a conversation from stream updates
//!
//! This library exposes modules for use in integration tests and by the
//! `agent-stream` binary.

pub mod adapters;
pub mod agent;
pub mod chat;
pub mod cli;
pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod logging;
pub mod sse;
pub mod traits;
