//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting the JSON API.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::web::state::AppState;

/// Middleware that validates the signed session cookie.
///
/// If valid, inserts the `SessionUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 before the handler (and its body extractor) runs.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(user) = state.session_key.current_user(req.headers()) else {
        debug!("Rejected unauthenticated request to {}", req.uri().path());
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response();
    };

    req.extensions_mut().insert(user);
    next.run(req).await
}
