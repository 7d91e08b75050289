//! Per-session conversation state.
//!
//! [`SessionState`] owns the append-only message log for one chat session.
//! The full log is retained in memory for the session; only a bounded window
//! of the most recent entries is ever sent to the completion provider (see
//! [`SessionState::recent`]), bounding request size and cost while the log
//! grows unbounded.
//!
//! All mutation happens through the chat orchestrator, which `&mut`-owns the
//! session, so appends are strictly ordered by submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inline image attached to a user message, carried base64-encoded for
/// vision completion requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// MIME type, e.g. `image/jpeg`.
    pub media_type: String,
    /// Base64-encoded image bytes.
    pub base64_data: String,
}

/// One entry of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Message text.
    pub content: String,
    /// `true` for user turns, `false` for companion turns.
    pub is_from_user: bool,
    /// Append timestamp.
    pub timestamp: DateTime<Utc>,
    /// Optional attached image (user turns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
}

impl ConversationMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_from_user: true,
            timestamp: Utc::now(),
            image: None,
        }
    }

    /// Create a user message with an attached image.
    #[must_use]
    pub fn user_with_image(content: impl Into<String>, image: ImagePayload) -> Self {
        Self {
            content: content.into(),
            is_from_user: true,
            timestamp: Utc::now(),
            image: Some(image),
        }
    }

    /// Create a companion (assistant) message.
    #[must_use]
    pub fn companion(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_from_user: false,
            timestamp: Utc::now(),
            image: None,
        }
    }
}

/// Append-only conversation log for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    messages: Vec<ConversationMessage>,
}

impl SessionState {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the log.
    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    /// The full message log, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// The last `n` messages in original order — the bounded history window
    /// sent to the completion provider. Never exceeds `n` regardless of log
    /// length.
    #[must_use]
    pub fn recent(&self, n: usize) -> &[ConversationMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Number of messages in the full log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// `true` when no message has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
