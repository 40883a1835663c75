//! Cached response representation

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// A response held in a cache partition
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// Request URL this response answers
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Content type, when the origin sent one
    pub content_type: Option<String>,
    /// Response body
    pub body: Bytes,
    /// When the response was fetched
    pub stored_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
