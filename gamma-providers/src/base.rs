//! Base trait for completion providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header carrying the caller's session identifier to the gateway
pub const SESSION_HEADER: &str = "x-session-id";

/// Error type for provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A role-tagged conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for upstream completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete the conversation and return the assistant text
    async fn complete(&self, turns: &[ChatTurn]) -> ProviderResult<String>;

    /// Model identifier this provider targets
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let turn = ChatTurn::user("hi");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_turn_roundtrip() {
        let json = r#"{"role":"assistant","content":"hello"}"#;
        let turn: ChatTurn = serde_json::from_str(json).unwrap();
        assert_eq!(turn.role, ChatRole::Assistant);
    }
}
