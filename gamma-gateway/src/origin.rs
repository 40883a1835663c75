//! Origin authorization for the chat endpoint
//!
//! One shared layer applied to every verb on the route: a present Referer
//! must start with an allowed origin, a present Origin must equal one.
//! Requests carrying neither header pass (non-browser callers).

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn check_origin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers();

    if let Some(referer) = headers.get(header::REFERER) {
        let Ok(referer) = referer.to_str() else {
            return Err(ApiError::UnauthorizedOrigin);
        };
        if !state
            .allowed_origins
            .iter()
            .any(|origin| referer.starts_with(origin))
        {
            warn!(referer = %referer, "Rejected request with unlisted referer");
            return Err(ApiError::UnauthorizedOrigin);
        }
    }

    if let Some(origin) = headers.get(header::ORIGIN) {
        let Ok(origin) = origin.to_str() else {
            return Err(ApiError::UnauthorizedOrigin);
        };
        if !state.allowed_origins.iter().any(|allowed| allowed == origin) {
            warn!(origin = %origin, "Rejected request with unlisted origin");
            return Err(ApiError::UnauthorizedOrigin);
        }
    }

    Ok(next.run(request).await)
}
