//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the assistant widget and image-editing endpoints under
//! a single Axum router. The widget itself is rendered by the host page; the
//! service only exposes its state, transitions and a live view stream.

pub mod assistant;
pub mod images;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ErrorCode;
use crate::state::AppState;

/// Uploaded images arrive base64-encoded in the JSON body.
const IMAGE_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/assistant", get(assistant::get_view))
        .route("/api/assistant/events", get(assistant::events))
        .route("/api/assistant/open", post(assistant::open))
        .route("/api/assistant/close", post(assistant::close))
        .route("/api/assistant/toggle", post(assistant::toggle))
        .route("/api/assistant/reset", post(assistant::reset))
        .route("/api/assistant/identity", post(assistant::identity))
        .route("/api/assistant/messages", post(assistant::submit))
        .route(
            "/api/images/edit",
            post(images::edit).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// JSON error body: `{ "code": "E_...", "message": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

pub(crate) fn error_response<E: ErrorCode>(status: StatusCode, err: &E) -> Response {
    let body = ErrorBody { code: err.error_code(), message: err.to_string() };
    (status, Json(body)).into_response()
}
