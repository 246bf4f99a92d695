use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Who authored a transcript message.
///
/// Only user and assistant turns are ever stored; the persona directive is attached to each
/// request and never enters the transcript.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in a conversation transcript.
///
/// Messages are immutable once created.  The `id` is a rendering key only, and the `timestamp`
/// is for display; the transcript's insertion order is what orders turns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    id: String,
    content: String,
    role: MessageRole,
    #[serde(with = "crate::utils::time")]
    timestamp: OffsetDateTime,
}

impl Message {
    /// Create a new message with a fresh id and the current time.
    pub fn new(content: impl Into<String>, role: MessageRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role,
            timestamp: crate::utils::time::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, MessageRole::User)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, MessageRole::Assistant)
    }

    /// The rendering key for this message.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The message text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Who authored the message.
    pub fn role(&self) -> MessageRole {
        self.role
    }

    /// When the message was created.
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    /// True if the user wrote this message.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
