//! Consumer side of agent streams.
//!
//! - `session` - [`ChatSession`], the single-flight stream owner
//! - `transcript` - [`Transcript`], the accumulated conversation
//!
//! [`Conversation`] ties both to an [`AgentClient`].

mod session;
mod transcript;

pub use session::ChatSession;
pub use transcript::{ChatMessage, MessageRole, Transcript, TurnOutcome, FAILURE_MESSAGE};

use thiserror::Error;
use tracing::{debug, info};

use crate::agent::{AgentClient, AgentStream, CancellationHandle};
use crate::events::StreamUpdate;

/// Errors from sending a chat message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
}

/// A conversation with one agent.
#[derive(Debug)]
pub struct Conversation {
    client: AgentClient,
    agent_id: String,
    session: ChatSession,
    transcript: Transcript,
}

impl Conversation {
    /// `session_id` continues an existing conversation.
    pub fn new(client: AgentClient, agent_id: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            client,
            agent_id: agent_id.into(),
            session: ChatSession::with_session_id(session_id),
            transcript: Transcript::new(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Send a user message, canceling any reply still streaming.
    ///
    /// Feed every update of the returned stream back through
    /// [`apply`](Self::apply), together with the stream's handle.
    pub fn send(&mut self, text: &str) -> Result<AgentStream, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.transcript.push_user(text);
        let stream = self
            .client
            .start_stream(&self.agent_id, text, self.session.session_id());
        if self.session.replace(stream.handle()) {
            info!("Previous reply canceled by a new message");
        }
        self.session.remember(stream.session_id());
        Ok(stream)
    }

    /// Fold an update from the stream behind `from` into the transcript.
    ///
    /// Updates from a stream replaced by a later [`send`](Self::send) are
    /// ignored.
    pub fn apply(
        &mut self,
        from: &CancellationHandle,
        update: &StreamUpdate,
    ) -> Option<TurnOutcome> {
        if !self.session.owns(from) {
            debug!("Ignoring update from a replaced stream");
            return None;
        }
        if let Some(id) = update.session_id() {
            self.session.remember(id);
        }
        self.transcript.apply(update)
    }

    /// Cancel the reply in flight. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.session.cancel()
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }
}
