//! Session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Opaque message id
    pub id: String,
    /// Message text
    pub content: String,
    /// Whether the message came from the user (false = assistant)
    pub is_user: bool,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            is_user: true,
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            is_user: false,
        }
    }
}

/// A conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Session id (millisecond creation timestamp)
    pub id: String,
    /// Display name
    pub title: String,
    /// Messages in insertion order; append-only
    pub messages: Vec<Message>,
    /// Session creation time
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a new session stamped with the current time
    pub fn new() -> Self {
        let now = Utc::now();
        let id = now.timestamp_millis().to_string();
        Self {
            title: id.clone(),
            id,
            messages: Vec::new(),
            created_at: now,
        }
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Title truncated for display, with an ellipsis when cut
    pub fn display_title(&self, max_chars: usize) -> String {
        if self.title.chars().count() <= max_chars {
            return self.title.clone();
        }
        let truncated: String = self.title.chars().take(max_chars).collect();
        format!("{}…", truncated)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = ChatSession::new();
        assert_eq!(session.id, session.title);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut session = ChatSession::new();
        session.push(Message::user("Hello"));
        session.push(Message::assistant("Hi there!"));

        assert_eq!(session.messages.len(), 2);
        assert!(session.messages[0].is_user);
        assert!(!session.messages[1].is_user);
    }

    #[test]
    fn test_display_title_truncation() {
        let mut session = ChatSession::new();
        session.title = "a very long conversation title".to_string();
        assert_eq!(session.display_title(6), "a very…");
        session.title = "short".to_string();
        assert_eq!(session.display_title(6), "short");
    }
}
