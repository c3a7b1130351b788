//! Conversation types for the completion pipeline
//!
//! These types model the gateway wire format but carry enough metadata
//! (ids, timestamps) for the interactive surfaces that produce them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Role of a conversation turn
///
/// Closed set; serialized lowercase on the wire and in persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Coerce into the two roles accepted for conversational history
    ///
    /// `user` stays `user`; every other role is forwarded as `assistant`.
    /// System turns are synthesized by the assembler, never carried over
    /// from history.
    pub fn coerce_conversational(self) -> Role {
        match self {
            Role::User => Role::User,
            _ => Role::Assistant,
        }
    }
}

/// One message in a conversation
///
/// Ordering within a sequence is significant - it is chat history and is
/// forwarded verbatim. `id` and `timestamp` are optional and skipped when
/// absent so the serialized form stays minimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub role: Role,

    /// Free text; may contain Markdown
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ConversationTurn {
    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        debug!("ConversationTurn::user: called");
        Self {
            id: None,
            role: Role::User,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        debug!("ConversationTurn::assistant: called");
        Self {
            id: None,
            role: Role::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        debug!("ConversationTurn::system: called");
        Self {
            id: None,
            role: Role::System,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Attach an id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach a timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
