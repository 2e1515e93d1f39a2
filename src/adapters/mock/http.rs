//! Mock HTTP client for testing.
//!
//! Provides a scripted HTTP client that returns predefined streaming bodies
//! or errors, records every request, and counts how many body chunks the
//! consumer actually pulled.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: String,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return these chunks, then end the body
    Stream(Vec<Bytes>),
    /// Return these chunks, then never produce another one
    StreamThenHang(Vec<Bytes>),
    /// Return these chunks, then fail the body read
    StreamThenError(Vec<Bytes>, HttpError),
    /// Fail before any body (connection error, non-2xx status...)
    Error(HttpError),
    /// Never answer at all
    Hang,
}

impl MockResponse {
    /// Convenience: a body made of string chunks.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(to_bytes(chunks))
    }

    /// Convenience: string chunks, then an open connection that stays silent.
    pub fn chunks_then_hang<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::StreamThenHang(to_bytes(chunks))
    }
}

fn to_bytes<I, S>(chunks: I) -> Vec<Bytes>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    chunks
        .into_iter()
        .map(|c| Bytes::from(c.into()))
        .collect()
}

/// Mock HTTP client for testing.
///
/// URLs are matched exactly first, then by prefix, then the default
/// response applies.
///
/// # Example
///
/// ```ignore
/// use agent_stream::adapters::mock::{MockHttpClient, MockResponse};
///
/// let http = MockHttpClient::new();
/// http.set_default_response(MockResponse::chunks([
///     "data: {\"type\":\"artifact\",\"content\":\"hi\"}\n\n",
/// ]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Body chunks handed to the consumer so far
    chunks_read: Arc<AtomicUsize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose every request gets `response`.
    pub fn with_default(response: MockResponse) -> Self {
        let client = Self::new();
        client.set_default_response(response);
        client
    }

    /// Set a response for a specific URL.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Number of body chunks pulled by consumers across all requests.
    pub fn chunks_read(&self) -> usize {
        self.chunks_read.load(Ordering::SeqCst)
    }

    fn record_request(&self, url: &str, headers: &Headers, body: &str) {
        lock(&self.requests).push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = lock(&self.responses);

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        lock(&self.default_response).clone()
    }

    /// Wrap scripted chunks so each pull is counted.
    fn counted(&self, chunks: Vec<Bytes>) -> impl futures::Stream<Item = Result<Bytes, HttpError>> {
        let counter = Arc::clone(&self.chunks_read);
        stream::iter(chunks).map(move |chunk| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(chunk)
        })
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, headers, body);

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => Ok(Box::pin(self.counted(chunks))),
            Some(MockResponse::StreamThenHang(chunks)) => {
                Ok(Box::pin(self.counted(chunks).chain(stream::pending())))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => Ok(Box::pin(
                self.counted(chunks).chain(stream::once(async move { Err(err) })),
            )),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Hang) => futures::future::pending().await,
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
