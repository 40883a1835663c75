//! Chat endpoint handlers

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use gamma_providers::base::SESSION_HEADER;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_SESSION: &str = "default";

fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| DEFAULT_SESSION.to_string())
}

/// Pull the first user message's content out of the request body.
/// Anything that is not a non-empty messages array with string content
/// is an invalid request.
fn first_message_content(body: &Value) -> Result<&str, ApiError> {
    let messages = body
        .get("messages")
        .and_then(Value::as_array)
        .ok_or(ApiError::InvalidRequest)?;
    let first = messages.first().ok_or(ApiError::InvalidRequest)?;
    first
        .get("content")
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .ok_or(ApiError::InvalidRequest)
}

/// `POST /api/chat`: append the user turn, complete against the rolling
/// context and return the assistant text.
pub async fn post_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::InvalidRequest)?;
    let content = first_message_content(&body)?;
    let session = session_id(&headers);

    let now = Utc::now();
    if !state.quota.check(&session, now) {
        warn!(session = %session, "Rejected send over quota");
        return Err(ApiError::RateLimited);
    }

    let context = state.history.append_user(&session, content);

    let reply = match state.provider.complete(&context).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(session = %session, "Error generating response: {}", e);
            return Err(ApiError::GenerationFailed);
        }
    };

    state.history.append_assistant(&session, &reply);
    state.quota.record(&session, now);

    Ok(Json(json!({ "response": reply })))
}

/// `DELETE /api/chat`: reset the caller's conversation memory to the
/// seeded state; without a session header every session is reset.
pub async fn delete_chat(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    match headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
        Some(session) if !session.is_empty() => {
            info!(session = %session, "Clearing conversation memory");
            state.history.reset(session);
        }
        _ => {
            info!("Clearing conversation memory for all sessions");
            state.history.reset_all();
        }
    }
    Json(json!({ "message": "Conversation memory cleared" }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "gamma-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
