//! Common test utilities for integration tests.
//!
//! Builders for SSE bodies in the shapes agents send.

#![allow(dead_code)]

use futures_util::StreamExt;
use std::time::Duration;

use agent_stream::agent::AgentStream;
use agent_stream::events::StreamUpdate;

/// One SSE event block carrying `data`.
pub fn sse_frame(data: &str) -> String {
    format!("data: {}\n\n", data)
}

/// A JSON-RPC artifact event.
pub fn artifact_frame(text: &str) -> String {
    sse_frame(
        &serde_json::json!({
            "jsonrpc": "2.0",
            "result": {"artifact": {"parts": [{"type": "text", "text": text}]}}
        })
        .to_string(),
    )
}

/// A JSON-RPC status event.
pub fn status_frame(state: &str, text: Option<&str>, is_final: bool) -> String {
    let mut status = serde_json::json!({"state": state});
    if let Some(text) = text {
        status["message"] = serde_json::json!({"role": "agent", "parts": [{"type": "text", "text": text}]});
    }
    let mut envelope = serde_json::json!({"jsonrpc": "2.0", "result": {"status": status}});
    if is_final {
        envelope["final"] = serde_json::json!(true);
    }
    sse_frame(&envelope.to_string())
}

/// The terminal `completed` event.
pub fn completed_frame() -> String {
    status_frame("completed", None, true)
}

/// Concatenate frames into one body.
pub fn sse_body(frames: &[String]) -> String {
    frames.concat()
}

/// Drain a stream, failing the test if it does not end.
pub async fn collect_updates(stream: AgentStream) -> Vec<StreamUpdate> {
    tokio::time::timeout(Duration::from_secs(10), stream.collect::<Vec<_>>())
        .await
        .expect("agent stream did not finish")
}

/// Artifact text of every update, in order.
pub fn artifact_texts(updates: &[StreamUpdate]) -> Vec<String> {
    updates
        .iter()
        .filter_map(|u| u.artifact_text().map(str::to_string))
        .collect()
}

pub fn terminal_count(updates: &[StreamUpdate]) -> usize {
    updates.iter().filter(|u| u.is_terminal()).count()
}
