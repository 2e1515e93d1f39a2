//! Mock implementations for testing.
//!
//! Enables driving the agent client without network access.

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
