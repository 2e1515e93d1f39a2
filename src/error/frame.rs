//! Recoverable per-frame errors.
//!
//! A `FrameError` means one `data:` payload could not be understood. The
//! stream keeps going; these are logged and never reach the consumer.

use std::fmt;

/// Longest payload excerpt kept for logging
const PREVIEW_LEN: usize = 120;

/// Errors that can occur while interpreting a single frame payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The payload is not JSON at all
    InvalidJson { message: String, preview: String },
    /// Valid JSON that matches neither the JSON-RPC nor the legacy shape
    UnrecognizedEnvelope { preview: String },
}

impl FrameError {
    pub fn invalid_json(err: &serde_json::Error, data: &str) -> Self {
        FrameError::InvalidJson {
            message: err.to_string(),
            preview: preview(data),
        }
    }

    pub fn unrecognized(data: &str) -> Self {
        FrameError::UnrecognizedEnvelope {
            preview: preview(data),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            FrameError::InvalidJson { .. } => "E_FRAME_JSON",
            FrameError::UnrecognizedEnvelope { .. } => "E_FRAME_SHAPE",
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::InvalidJson { message, preview } => {
                write!(f, "Invalid JSON in frame ({}): {}", message, preview)
            }
            FrameError::UnrecognizedEnvelope { preview } => {
                write!(f, "Unrecognized frame envelope: {}", preview)
            }
        }
    }
}

impl std::error::Error for FrameError {}

fn preview(data: &str) -> String {
    if data.chars().count() <= PREVIEW_LEN {
        return data.to_string();
    }
    let mut cut: String = data.chars().take(PREVIEW_LEN).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = FrameError::invalid_json(&json_err, "{oops");
        let display = err.to_string();
        assert!(display.starts_with("Invalid JSON in frame"));
        assert!(display.ends_with("{oops"));
        assert_eq!(err.error_code(), "E_FRAME_JSON");
    }

    #[test]
    fn test_preview_truncates_long_payloads() {
        let long = "x".repeat(500);
        let err = FrameError::unrecognized(&long);
        match err {
            FrameError::UnrecognizedEnvelope { preview } => {
                assert_eq!(preview.chars().count(), PREVIEW_LEN + 1);
                assert!(preview.ends_with('…'));
            }
            _ => panic!("Expected UnrecognizedEnvelope"),
        }
    }
}
