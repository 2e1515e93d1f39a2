//! Handles returned to callers of the agent client.

use futures::Stream;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::events::StreamUpdate;

/// Cancels one in-flight agent stream.
///
/// Cloning yields another handle to the same stream, and handles compare
/// equal when they control the same stream. Canceling is idempotent, and a
/// no-op once the stream has ended.
#[derive(Debug, Clone, Default)]
pub struct CancellationHandle {
    token: CancellationToken,
    finished: Arc<AtomicBool>,
}

impl CancellationHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Abort the stream. The reader emits a single `Canceled` update
    /// unless it already delivered its terminal update.
    pub fn cancel(&self) {
        if !self.is_finished() {
            self.token.cancel();
        }
    }

    /// Whether the stream was canceled before it ended.
    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the stream has delivered its terminal update.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub(crate) fn mark_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

impl PartialEq for CancellationHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.finished, &other.finished)
    }
}

impl Eq for CancellationHandle {}

/// An agent stream consumed as a [`Stream`] of [`StreamUpdate`]s.
///
/// Ends after the terminal update. Dropping it cancels the request.
#[derive(Debug)]
pub struct AgentStream {
    updates: mpsc::UnboundedReceiver<StreamUpdate>,
    handle: CancellationHandle,
    session_id: String,
}

impl AgentStream {
    pub(crate) fn new(
        updates: mpsc::UnboundedReceiver<StreamUpdate>,
        handle: CancellationHandle,
        session_id: String,
    ) -> Self {
        Self {
            updates,
            handle,
            session_id,
        }
    }

    /// Abort the stream.
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// A handle that can cancel this stream from elsewhere.
    pub fn handle(&self) -> CancellationHandle {
        self.handle.clone()
    }

    /// The conversation this stream belongs to.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Receive the next update, `None` after the terminal one.
    pub async fn recv(&mut self) -> Option<StreamUpdate> {
        self.updates.recv().await
    }
}

impl Stream for AgentStream {
    type Item = StreamUpdate;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.updates.poll_recv(cx)
    }
}

impl Drop for AgentStream {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}
