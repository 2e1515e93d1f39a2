//! Terminal stream failures.
//!
//! A `StreamError` ends a stream. It reaches the consumer exactly once, as
//! the payload of `StreamUpdate::Failed`. Its `Display` output is the plain
//! failure message shown to the consumer.

use std::fmt;

use crate::traits::HttpError;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// No response was received (connection refused, DNS, TLS...).
    ConnectionFailed {
        message: String,
    },

    /// The backend answered with a non-2xx status.
    ///
    /// `message` is the server-provided message when the body was JSON,
    /// otherwise `server error <status>`.
    HttpStatus {
        status: u16,
        message: String,
    },

    /// Reading the response body failed after headers were accepted.
    Transport {
        message: String,
    },

    /// The agent reported a failure inside the stream.
    Backend {
        code: Option<i64>,
        message: String,
    },
}

impl StreamError {
    /// Build the error for a non-2xx response from its raw body.
    ///
    /// A JSON body contributes its `message` (or `error`, or
    /// `error.message`) field; anything else falls back to a generic message.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| server_message(&json))
            .unwrap_or_else(|| format!("server error {}", status));
        StreamError::HttpStatus { status, message }
    }

    /// Check if this error is likely transient and a new stream may succeed.
    ///
    /// The client never retries on its own; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::ConnectionFailed { .. } | StreamError::Transport { .. } => true,
            StreamError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            StreamError::Backend { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionFailed { .. } => {
                "Unable to reach the agent. Please check your connection.".to_string()
            }
            StreamError::HttpStatus { status, .. } => match *status {
                401 | 403 => "The agent refused the request.".to_string(),
                404 => "That agent does not exist.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => "The agent is having trouble. Please try again later.".to_string(),
                _ => format!("The agent returned an error (HTTP {}).", status),
            },
            StreamError::Transport { .. } => {
                "The connection dropped before the reply finished.".to_string()
            }
            StreamError::Backend { message, .. } => format!("The agent reported: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionFailed { .. } => "E_STREAM_CONN",
            StreamError::HttpStatus { .. } => "E_STREAM_HTTP",
            StreamError::Transport { .. } => "E_STREAM_TRANSPORT",
            StreamError::Backend { .. } => "E_STREAM_BACKEND",
        }
    }

    /// The bare failure message.
    pub fn message(&self) -> &str {
        match self {
            StreamError::ConnectionFailed { message }
            | StreamError::HttpStatus { message, .. }
            | StreamError::Transport { message }
            | StreamError::Backend { message, .. } => message,
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for StreamError {}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => {
                StreamError::from_status(status, &message)
            }
            HttpError::ConnectionFailed(message)
            | HttpError::Timeout(message)
            | HttpError::InvalidUrl(message)
            | HttpError::Other(message) => StreamError::ConnectionFailed { message },
            HttpError::Io(message) => StreamError::Transport { message },
        }
    }
}

/// Pull a human-readable message out of a JSON error body.
fn server_message(json: &serde_json::Value) -> Option<String> {
    let direct = json.get("message").and_then(|v| v.as_str());
    let error = json.get("error");
    let nested = error.and_then(|e| e.get("message")).and_then(|v| v.as_str());
    let flat = error.and_then(|e| e.as_str());
    let detail = json.get("detail").and_then(|v| v.as_str());

    direct
        .or(nested)
        .or(flat)
        .or(detail)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}
