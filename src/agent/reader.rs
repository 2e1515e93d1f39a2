//! The read loop behind every agent stream.
//!
//! One spawned task per stream: await headers, then decode, frame and
//! classify the body chunk by chunk, delivering updates to an
//! [`UpdateSink`] until exactly one terminal update has been sent.

use futures_util::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::handle::CancellationHandle;
use super::sink::UpdateSink;
use crate::envelope::{classify, Signal};
use crate::error::StreamError;
use crate::events::{Progress, StreamUpdate};
use crate::sse::{FrameParser, StreamEvent, Utf8ChunkDecoder};
use crate::traits::{ByteStream, Headers, HttpClient};

/// Whether the loop keeps reading after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Everything the spawned task needs to drive one stream.
pub(crate) struct StreamJob {
    pub http: Arc<dyn HttpClient>,
    pub url: String,
    pub body: String,
    pub session_id: String,
}

pub(crate) fn stream_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Accept".to_string(), "text/event-stream".to_string());
    headers
}

struct Reader<S> {
    sink: S,
    handle: CancellationHandle,
    session_id: String,
}

impl<S: UpdateSink> Reader<S> {
    /// Deliver a non-terminal update.
    fn progress(&mut self, progress: Progress) -> Flow {
        if self.sink.emit(StreamUpdate::InProgress(progress)) {
            Flow::Continue
        } else {
            debug!("Update consumer went away, stopping read loop");
            self.handle.mark_finished();
            Flow::Stop
        }
    }

    /// Deliver the terminal update. Always stops the loop.
    fn finish(&mut self, update: StreamUpdate) -> Flow {
        match &update {
            StreamUpdate::Failed { error } => {
                warn!("Agent stream failed [{}]: {}", error.error_code(), error)
            }
            other => info!("Agent stream ended: {}", other.state().unwrap_or("unknown")),
        }
        self.handle.mark_finished();
        self.sink.emit(update);
        Flow::Stop
    }

    fn handle_event(&mut self, event: StreamEvent) -> Flow {
        if self.handle.is_canceled() {
            return self.finish(StreamUpdate::Canceled);
        }

        debug!("Frame: {}", event.data);
        let signals = match classify(&event.data) {
            Ok(signals) => signals,
            Err(e) => {
                warn!("Skipping malformed frame [{}]: {}", e.error_code(), e);
                return Flow::Continue;
            }
        };

        for signal in signals {
            let flow = match signal {
                Signal::Session(id) => {
                    if id != self.session_id {
                        debug!(
                            "Backend reported session {}, keeping {}",
                            id, self.session_id
                        );
                    }
                    Flow::Continue
                }
                Signal::Artifact { text, state } => self.progress(Progress::artifact(text, state)),
                Signal::Status { text, state } => self.progress(Progress::status(text, state)),
                Signal::Completed { text } => self.finish(StreamUpdate::Completed { text }),
                Signal::Failed { code, message } => {
                    self.finish(StreamError::Backend { code, message }.into())
                }
            };
            if flow == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn handle_events(&mut self, events: Vec<StreamEvent>) -> Flow {
        for event in events {
            if self.handle_event(event) == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    async fn read_body(&mut self, mut body: ByteStream, token: &CancellationToken) {
        let mut decoder = Utf8ChunkDecoder::new();
        let mut parser = FrameParser::new();

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    self.finish(StreamUpdate::Canceled);
                    return;
                }
                chunk = body.next() => match chunk {
                    Some(Ok(bytes)) => {
                        let text = decoder.decode(&bytes);
                        if self.handle_events(parser.push(&text)) == Flow::Stop {
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        self.finish(StreamError::Transport { message: e.to_string() }.into());
                        return;
                    }
                    None => break,
                },
            }
        }

        debug!("Agent stream body closed, recovering trailing frames");
        let tail = decoder.finish();
        let mut events = parser.push(&tail);
        events.extend(parser.finalize());
        if self.handle_events(events) == Flow::Stop {
            return;
        }

        self.finish(StreamUpdate::Completed { text: None });
    }
}

/// Drive one stream to its terminal update.
///
/// The `starting` update has already been delivered by the caller.
pub(crate) async fn run_stream<S: UpdateSink>(job: StreamJob, handle: CancellationHandle, sink: S) {
    let token = handle.token();
    let mut reader = Reader {
        sink,
        handle,
        session_id: job.session_id,
    };

    info!("Opening agent stream to {} (session {})", job.url, reader.session_id);

    let headers = stream_headers();
    let response = tokio::select! {
        biased;

        _ = token.cancelled() => {
            reader.finish(StreamUpdate::Canceled);
            return;
        }
        response = job.http.post_stream(&job.url, &job.body, &headers) => response,
    };

    let body = match response {
        Ok(body) => body,
        Err(e) => {
            reader.finish(StreamError::from(e).into());
            return;
        }
    };

    if reader.progress(Progress::connected()) == Flow::Stop {
        return;
    }

    reader.read_body(body, &token).await;
}
