//! Classification of decoded `data:` payloads
//!
//! Each payload becomes an ordered list of [`Signal`]s. The JSON-RPC
//! envelope is tried first, then the flat legacy shape; a payload matching
//! neither is a [`FrameError`].

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::payloads::{text_of, LegacyKind, LegacyPayload, RpcEnvelope, RpcError};
use crate::error::FrameError;

/// Message used when the agent reports an error without saying what
pub const DEFAULT_BACKEND_ERROR: &str = "agent reported an error";

/// What one payload tells the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// The backend named the conversation
    Session(String),
    /// A fragment of the agent's reply
    Artifact {
        text: String,
        /// Lifecycle state reported alongside the fragment, if any
        state: Option<String>,
    },
    /// Backend lifecycle text; never conversational content
    Status {
        text: Option<String>,
        state: Option<String>,
    },
    /// The task finished successfully
    Completed { text: Option<String> },
    /// The task failed
    Failed { code: Option<i64>, message: String },
}

impl Signal {
    /// Whether this signal ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Signal::Completed { .. } | Signal::Failed { .. })
    }
}

/// Classify one `data:` payload.
///
/// # Errors
/// `FrameError::InvalidJson` when the payload is not JSON,
/// `FrameError::UnrecognizedEnvelope` when it is JSON of an unknown shape.
pub fn classify(data: &str) -> Result<Vec<Signal>, FrameError> {
    let value: Value =
        serde_json::from_str(data).map_err(|e| FrameError::invalid_json(&e, data))?;

    if let Ok(envelope) = RpcEnvelope::deserialize(&value) {
        if envelope.is_response() {
            return Ok(classify_rpc(envelope));
        }
    }

    match LegacyPayload::deserialize(&value) {
        Ok(legacy) => Ok(classify_legacy(legacy)),
        Err(e) => {
            debug!("Payload matches no known envelope: {}", e);
            Err(FrameError::unrecognized(data))
        }
    }
}

fn failed(error: RpcError) -> Signal {
    Signal::Failed {
        code: error.code,
        message: error
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_ERROR.to_string()),
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn classify_rpc(envelope: RpcEnvelope) -> Vec<Signal> {
    let is_final = envelope.is_final();

    if let Some(error) = envelope.error {
        return vec![failed(error)];
    }

    let Some(result) = envelope.result else {
        return Vec::new();
    };

    let mut signals = Vec::new();

    if let Some(id) = result.session_id.filter(|id| !id.is_empty()) {
        signals.push(Signal::Session(id));
    }

    if let Some(error) = result.error {
        signals.push(failed(error));
        return signals;
    }

    let artifact_text = result
        .artifact
        .as_ref()
        .and_then(|a| non_empty(text_of(&a.parts)));
    let state = result.status.as_ref().and_then(|s| s.state.clone());
    let status_text = result
        .status
        .as_ref()
        .and_then(|s| s.message.as_ref())
        .and_then(|m| non_empty(text_of(&m.parts)));

    if is_final {
        match state.as_deref() {
            Some("completed") => {
                signals.push(Signal::Completed {
                    text: artifact_text,
                });
                return signals;
            }
            Some(failure @ ("failed" | "rejected")) => {
                if let Some(text) = artifact_text {
                    signals.push(Signal::Artifact {
                        text,
                        state: state.clone(),
                    });
                }
                signals.push(Signal::Failed {
                    code: None,
                    message: status_text
                        .unwrap_or_else(|| format!("agent task ended in state {}", failure)),
                });
                return signals;
            }
            // input-required and similar pauses stay ordinary status
            _ => {}
        }
    }

    if let Some(text) = artifact_text {
        signals.push(Signal::Artifact {
            text,
            state: state.clone(),
        });
    }

    if result.status.is_some() {
        signals.push(Signal::Status {
            text: status_text,
            state,
        });
    }

    signals
}

fn classify_legacy(payload: LegacyPayload) -> Vec<Signal> {
    match payload.kind {
        LegacyKind::Artifact => payload
            .content_first()
            .and_then(non_empty)
            .map(|text| Signal::Artifact {
                text,
                state: payload.state.clone(),
            })
            .into_iter()
            .collect(),
        LegacyKind::Status if payload.state.as_deref() == Some("completed") => {
            vec![Signal::Completed { text: None }]
        }
        LegacyKind::Status => vec![Signal::Status {
            text: payload.message_first(),
            state: payload.state.clone(),
        }],
        LegacyKind::Error => vec![Signal::Failed {
            code: None,
            message: payload
                .message_first()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BACKEND_ERROR.to_string()),
        }],
    }
}
