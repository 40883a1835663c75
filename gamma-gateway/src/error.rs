//! Gateway error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the chat endpoint, each with a fixed wire body
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller's declared origin is not allow-listed
    #[error("unauthorized origin")]
    UnauthorizedOrigin,

    /// Malformed request payload
    #[error("invalid request")]
    InvalidRequest,

    /// Per-session quota exhausted
    #[error("rate limit exceeded")]
    RateLimited,

    /// Upstream completion call failed
    #[error("generation failed")]
    GenerationFailed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnauthorizedOrigin => (StatusCode::FORBIDDEN, "Unauthorized origin"),
            ApiError::InvalidRequest => (StatusCode::BAD_REQUEST, "Invalid request"),
            ApiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded"),
            ApiError::GenerationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate response",
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
