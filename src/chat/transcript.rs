//! Conversation transcript built from stream updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::StreamUpdate;

/// Assistant message appended when a reply fails.
pub const FAILURE_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One message in the transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: MessageRole,
    /// Final content, set when the message is finalized
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Whether the reply is still arriving
    #[serde(default)]
    pub is_streaming: bool,
    /// Text accumulated while streaming
    #[serde(default)]
    pub partial_content: String,
}

impl ChatMessage {
    fn new(id: u64, role: MessageRole, content: String) -> Self {
        Self {
            id,
            role,
            content,
            created_at: Utc::now(),
            is_streaming: false,
            partial_content: String::new(),
        }
    }

    /// Append a fragment during streaming
    pub fn append_token(&mut self, token: &str) {
        self.partial_content.push_str(token);
    }

    /// Move partial content into `content` and stop streaming
    pub fn finalize(&mut self) {
        if self.is_streaming {
            self.content = std::mem::take(&mut self.partial_content);
            self.is_streaming = false;
        }
    }

    /// Text to show right now, streaming or not
    pub fn text(&self) -> &str {
        if self.is_streaming {
            &self.partial_content
        } else {
            &self.content
        }
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    /// Carries the underlying failure message, for logs
    Failed(String),
    Canceled,
}

/// Accumulates a conversation from user turns and stream updates.
///
/// Artifact text builds one assistant message per turn; status text is kept
/// apart as the latest status line and never enters the conversation.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    status: Option<String>,
    last_outcome: Option<TurnOutcome>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Latest status line of the turn in progress
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn last_outcome(&self) -> Option<&TurnOutcome> {
        self.last_outcome.as_ref()
    }

    /// Whether an assistant reply is currently streaming
    pub fn is_streaming(&self) -> bool {
        self.streaming_reply().is_some()
    }

    fn streaming_reply(&self) -> Option<&ChatMessage> {
        self.messages
            .last()
            .filter(|m| m.role == MessageRole::Assistant && m.is_streaming)
    }

    fn push(&mut self, role: MessageRole, content: String) -> &mut ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage::new(id, role, content));
        let index = self.messages.len() - 1;
        &mut self.messages[index]
    }

    /// Start a new turn with the user's message.
    ///
    /// A reply still streaming from the previous turn is closed as is.
    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.close_reply();
        self.status = None;
        self.last_outcome = None;
        self.push(MessageRole::User, text.into())
    }

    fn reply_mut(&mut self) -> &mut ChatMessage {
        if self.streaming_reply().is_none() {
            let message = self.push(MessageRole::Assistant, String::new());
            message.is_streaming = true;
        }
        let index = self.messages.len() - 1;
        &mut self.messages[index]
    }

    /// Finalize the streaming reply, dropping it if nothing arrived.
    fn close_reply(&mut self) {
        if let Some(last) = self.messages.last_mut() {
            if last.role == MessageRole::Assistant && last.is_streaming {
                last.finalize();
                if last.content.is_empty() {
                    self.messages.pop();
                }
            }
        }
    }

    /// Fold one update into the transcript.
    ///
    /// Returns the outcome when the update ends the turn.
    pub fn apply(&mut self, update: &StreamUpdate) -> Option<TurnOutcome> {
        let outcome = match update {
            StreamUpdate::InProgress(_) => {
                if let Some(text) = update.artifact_text() {
                    self.reply_mut().append_token(text);
                } else if let Some(line) = update.text().or(update.state()) {
                    self.status = Some(line.to_string());
                }
                return None;
            }
            StreamUpdate::Completed { text } => {
                if let Some(text) = text {
                    self.reply_mut().append_token(text);
                }
                self.close_reply();
                TurnOutcome::Completed
            }
            StreamUpdate::Failed { error } => {
                self.close_reply();
                self.push(MessageRole::Assistant, FAILURE_MESSAGE.to_string());
                TurnOutcome::Failed(error.to_string())
            }
            StreamUpdate::Canceled => {
                self.close_reply();
                TurnOutcome::Canceled
            }
        };

        self.status = None;
        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }
}
