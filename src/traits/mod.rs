//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - streaming HTTP POST used by the agent client

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
