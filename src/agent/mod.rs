//! Agent stream client.
//!
//! Opens one `message/stream` request per call against
//! `{base}/api/v1/a2a/{agent_id}` and turns the SSE body into
//! [`StreamUpdate`]s. Each call is independent: the client keeps no session
//! registry, only the HTTP client and base URL.
//!
//! Update order for a successful stream:
//! 1. `starting` with the resolved session id
//! 2. `working` (status) once headers are accepted
//! 3. artifact and status fragments in wire order
//! 4. exactly one terminal update
//!
//! All calls need a running Tokio runtime; the read loop is a spawned task.

mod handle;
mod reader;
mod sink;

pub use handle::{AgentStream, CancellationHandle};
pub use sink::UpdateSink;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::envelope::StreamRequest;
use crate::error::StreamError;
use crate::events::{Progress, StreamUpdate};
use crate::traits::{HttpClient, HttpError};
use reader::{run_stream, StreamJob};

/// Client for agent streams.
#[derive(Clone)]
pub struct AgentClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for AgentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AgentClient {
    /// Create a client backed by reqwest, using the config's base URL and
    /// connect timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::with_connect_timeout(config.connect_timeout)?;
        Ok(Self::with_http(config.base_url.clone(), Arc::new(http)))
    }

    /// Create a client over any [`HttpClient`].
    pub fn with_http(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the agent `agent_id`.
    pub fn endpoint(&self, agent_id: &str) -> String {
        format!(
            "{}/api/v1/a2a/{}",
            self.base_url.trim_end_matches('/'),
            agent_id
        )
    }

    /// Start a stream and consume its updates as a [`futures::Stream`].
    ///
    /// `session_id` continues an existing conversation; `None` starts a new
    /// one. The `starting` update is already queued when this returns.
    pub fn start_stream(
        &self,
        agent_id: &str,
        message: &str,
        session_id: Option<&str>,
    ) -> AgentStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let request = StreamRequest::for_session(message, session_id);
        let session = request.session_id().to_string();
        let handle = self.spawn(agent_id, request, tx);
        AgentStream::new(rx, handle, session)
    }

    /// Start a stream, invoking `on_update` for every update.
    ///
    /// `on_update` receives the `starting` update before this returns and
    /// every later update from the read loop task.
    pub fn start_stream_with<S: UpdateSink>(
        &self,
        agent_id: &str,
        message: &str,
        session_id: Option<&str>,
        on_update: S,
    ) -> CancellationHandle {
        let request = StreamRequest::for_session(message, session_id);
        self.spawn(agent_id, request, on_update)
    }

    fn spawn<S: UpdateSink>(
        &self,
        agent_id: &str,
        request: StreamRequest,
        mut sink: S,
    ) -> CancellationHandle {
        let handle = CancellationHandle::new();
        let session_id = request.session_id().to_string();

        if !sink.emit(Progress::starting(session_id.clone()).into()) {
            debug!("Update consumer gone before the stream started");
        }

        let body = match serde_json::to_string(&request) {
            Ok(body) => body,
            Err(e) => {
                handle.mark_finished();
                sink.emit(StreamUpdate::from(StreamError::ConnectionFailed {
                    message: format!("failed to encode request: {}", e),
                }));
                return handle;
            }
        };

        let job = StreamJob {
            http: Arc::clone(&self.http),
            url: self.endpoint(agent_id),
            body,
            session_id,
        };
        tokio::spawn(run_stream(job, handle.clone(), sink));
        handle
    }
}
