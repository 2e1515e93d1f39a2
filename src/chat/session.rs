//! Single-flight ownership of the in-flight stream.

use tracing::debug;

use crate::agent::CancellationHandle;

/// Owns at most one live stream and the conversation id across turns.
///
/// The latest stream stays installed after it ends or is canceled, so its
/// trailing updates can still be told apart from those of a replaced one.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    current: Option<CancellationHandle>,
    session_id: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue an existing conversation.
    pub fn with_session_id(session_id: Option<String>) -> Self {
        Self {
            current: None,
            session_id,
        }
    }

    /// Cancel the outstanding stream, then install `handle`.
    ///
    /// Returns whether a still-running stream was canceled.
    pub fn replace(&mut self, handle: CancellationHandle) -> bool {
        let canceled = self.cancel();
        self.current = Some(handle);
        canceled
    }

    /// Cancel the outstanding stream, if any.
    ///
    /// Returns whether a still-running stream was canceled.
    pub fn cancel(&mut self) -> bool {
        match &self.current {
            Some(handle) if is_running(handle) => {
                debug!("Canceling in-flight stream");
                handle.cancel();
                true
            }
            _ => false,
        }
    }

    /// Whether a stream is still running.
    pub fn is_busy(&self) -> bool {
        self.current.as_ref().is_some_and(is_running)
    }

    /// Whether `handle` belongs to the latest stream.
    pub fn owns(&self, handle: &CancellationHandle) -> bool {
        self.current.as_ref() == Some(handle)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Remember the conversation id; the first one sticks.
    pub fn remember(&mut self, session_id: &str) {
        if self.session_id.is_none() {
            self.session_id = Some(session_id.to_string());
        }
    }
}

fn is_running(handle: &CancellationHandle) -> bool {
    !handle.is_finished() && !handle.is_canceled()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_cancels_previous() {
        let mut session = ChatSession::new();
        let first = CancellationHandle::new();
        let second = CancellationHandle::new();

        assert!(!session.replace(first.clone()));
        assert!(session.is_busy());

        assert!(session.replace(second.clone()));
        assert!(first.is_canceled());
        assert!(!second.is_canceled());
        assert!(session.is_busy());
    }

    #[test]
    fn test_finished_stream_is_not_canceled() {
        let mut session = ChatSession::new();
        let handle = CancellationHandle::new();
        session.replace(handle.clone());
        handle.mark_finished();

        assert!(!session.is_busy());
        assert!(!session.cancel());
        assert!(!handle.is_canceled());
    }

    #[test]
    fn test_cancel_twice() {
        let mut session = ChatSession::new();
        let handle = CancellationHandle::new();
        session.replace(handle.clone());

        assert!(session.cancel());
        assert!(!session.cancel());
        assert!(handle.is_canceled());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_owns_latest_stream_only() {
        let mut session = ChatSession::new();
        let first = CancellationHandle::new();
        let second = CancellationHandle::new();
        assert!(!session.owns(&first));

        session.replace(first.clone());
        assert!(session.owns(&first));

        session.replace(second.clone());
        assert!(!session.owns(&first));
        assert!(session.owns(&second));

        session.cancel();
        assert!(session.owns(&second));
    }

    #[test]
    fn test_first_session_id_sticks() {
        let mut session = ChatSession::new();
        session.remember("a");
        session.remember("b");
        assert_eq!(session.session_id(), Some("a"));

        let continued = ChatSession::with_session_id(Some("x".to_string()));
        assert_eq!(continued.session_id(), Some("x"));
    }
}
