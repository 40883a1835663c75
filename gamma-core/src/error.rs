//! Error types for gamma

use thiserror::Error;

/// The main error type for gamma operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Session management errors
    #[error("Session error: {0}")]
    Session(String),

    /// Generator (LLM) errors
    #[error("Generation error: {0}")]
    Generation(String),

    /// The usage window is exhausted
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// A generation call is already in flight
    #[error("Busy: {0}")]
    Busy(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for gamma operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
