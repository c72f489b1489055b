//! Assistant client and reply worker
//!
//! Ties the pieces together: conversation history, prompt assembly, the
//! provider call, and directive processing of the reply. All of it runs on
//! a single worker task fed by a command channel, so reply processing is
//! strictly serialized — concurrent sends are totally ordered by arrival
//! and directive batches from different replies never interleave.

mod client;
mod prompt;

pub use client::AssistantClient;
pub use prompt::{assemble_prompt, DIRECTIVE_VOCABULARY, HISTORY_WINDOW};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to callers of the assistant client
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Reply processing failed: {0}")]
    Processing(String),

    #[error("Reply worker is no longer running")]
    WorkerGone,
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// One turn in the conversation log.
///
/// Immutable once created; the log is append-only and owned by the reply
/// worker.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Message text (for assistant turns, after directive processing)
    pub content: String,

    /// Who authored the turn
    pub author: Author,

    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user turn stamped with the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: Author::User,
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant turn stamped with the current time
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: Author::Assistant,
            timestamp: Utc::now(),
        }
    }

    /// Whether this turn was authored by the user
    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}
