//! Stream update types delivered to consumers of an agent stream.
//!
//! Every stream produces zero or more [`StreamUpdate::InProgress`] values
//! followed by exactly one terminal value: `Completed`, `Failed` or
//! `Canceled`.

use crate::error::StreamError;

/// Lifecycle state sent before the request is issued
pub const STATE_STARTING: &str = "starting";
/// Lifecycle state once response headers are accepted
pub const STATE_WORKING: &str = "working";
pub const STATE_COMPLETED: &str = "completed";
pub const STATE_FAILED: &str = "failed";
pub const STATE_CANCELED: &str = "canceled";

/// Which channel an in-progress update's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateSource {
    /// Part of the agent's reply
    Artifact,
    /// Backend lifecycle text, not conversational content
    Status,
}

impl UpdateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateSource::Artifact => "artifact",
            UpdateSource::Status => "status",
        }
    }
}

impl std::fmt::Display for UpdateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-terminal update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub source: Option<UpdateSource>,
    /// Only meaningful when `source` is set
    pub text: Option<String>,
    /// Backend-defined lifecycle state, advisory
    pub state: Option<String>,
    /// Set on the first update of a stream only
    pub session_id: Option<String>,
}

impl Progress {
    /// The update sent before the request goes out.
    pub fn starting(session_id: impl Into<String>) -> Self {
        Self {
            state: Some(STATE_STARTING.to_string()),
            session_id: Some(session_id.into()),
            ..Self::default()
        }
    }

    /// The update sent once response headers are accepted.
    pub fn connected() -> Self {
        Self {
            source: Some(UpdateSource::Status),
            state: Some(STATE_WORKING.to_string()),
            ..Self::default()
        }
    }

    /// A reply fragment. `state` defaults to `working`.
    pub fn artifact(text: impl Into<String>, state: Option<String>) -> Self {
        Self {
            source: Some(UpdateSource::Artifact),
            text: Some(text.into()),
            state: Some(state.unwrap_or_else(|| STATE_WORKING.to_string())),
            session_id: None,
        }
    }

    /// Backend lifecycle text.
    pub fn status(text: Option<String>, state: Option<String>) -> Self {
        Self {
            source: Some(UpdateSource::Status),
            text,
            state,
            session_id: None,
        }
    }
}

/// One update from an agent stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    InProgress(Progress),
    /// Terminal success, with the last reply fragment if the final
    /// envelope carried one
    Completed { text: Option<String> },
    /// Terminal failure
    Failed { error: StreamError },
    /// The caller canceled the stream; not an error
    Canceled,
}

impl StreamUpdate {
    /// Lifecycle state of this update, if known.
    pub fn state(&self) -> Option<&str> {
        match self {
            StreamUpdate::InProgress(progress) => progress.state.as_deref(),
            StreamUpdate::Completed { .. } => Some(STATE_COMPLETED),
            StreamUpdate::Failed { .. } => Some(STATE_FAILED),
            StreamUpdate::Canceled => Some(STATE_CANCELED),
        }
    }

    pub fn source(&self) -> Option<UpdateSource> {
        match self {
            StreamUpdate::InProgress(progress) => progress.source,
            StreamUpdate::Completed { text: Some(_) } => Some(UpdateSource::Artifact),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            StreamUpdate::InProgress(progress) => progress.text.as_deref(),
            StreamUpdate::Completed { text } => text.as_deref(),
            _ => None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            StreamUpdate::InProgress(progress) => progress.session_id.as_deref(),
            _ => None,
        }
    }

    /// Text of an artifact fragment, including the trailing text of a
    /// completion. Status text is never returned here.
    pub fn artifact_text(&self) -> Option<&str> {
        match self.source() {
            Some(UpdateSource::Artifact) => self.text(),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamUpdate::InProgress(_))
    }

    pub fn error(&self) -> Option<&StreamError> {
        match self {
            StreamUpdate::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(|e| e.to_string())
    }
}

impl From<Progress> for StreamUpdate {
    fn from(progress: Progress) -> Self {
        StreamUpdate::InProgress(progress)
    }
}

impl From<StreamError> for StreamUpdate {
    fn from(error: StreamError) -> Self {
        StreamUpdate::Failed { error }
    }
}
