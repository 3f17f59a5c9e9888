//! Assistant widget routes.
//!
//! Every transition answers with the resulting [`WidgetView`]; the events
//! stream pushes the same projection after each state change.

use std::convert::Infallible;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Json, Response};
use futures::stream::{self, Stream};
use serde::Deserialize;
use tracing::{info, warn};

use super::error_response;
use crate::assistant::{HostUser, SubmitError, WidgetView};
use crate::error::ErrorCode;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitBody {
    pub text: String,
}

/// `GET /api/assistant` — current view snapshot.
pub async fn get_view(State(state): State<AppState>) -> Json<WidgetView> {
    Json(state.assistant.view())
}

/// `GET /api/assistant/events` — SSE stream, current view first, then one
/// `view` event per change.
pub async fn events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.assistant.subscribe();
    let stream = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let view = rx.borrow_and_update().clone();
        Some((Ok(view_event(&view)), (rx, false)))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn view_event(view: &WidgetView) -> Event {
    match Event::default().event("view").json_data(view) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "assistant: failed to encode view event");
            Event::default().comment("view unavailable")
        }
    }
}

/// `POST /api/assistant/open`
pub async fn open(State(state): State<AppState>) -> Json<WidgetView> {
    Json(state.assistant.open())
}

/// `POST /api/assistant/close`
pub async fn close(State(state): State<AppState>) -> Json<WidgetView> {
    Json(state.assistant.close())
}

/// `POST /api/assistant/toggle`
pub async fn toggle(State(state): State<AppState>) -> Json<WidgetView> {
    Json(state.assistant.toggle())
}

/// `POST /api/assistant/reset` — logout-equivalent.
pub async fn reset(State(state): State<AppState>) -> Json<WidgetView> {
    Json(state.assistant.reset())
}

/// `POST /api/assistant/identity` — display identity of the signed-in user.
pub async fn identity(State(state): State<AppState>, Json(user): Json<HostUser>) -> Json<WidgetView> {
    Json(state.assistant.identify(user))
}

/// `POST /api/assistant/messages` — accept a user message. The reply is
/// resolved in the background and arrives on the events stream.
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<WidgetView>), Response> {
    match state.assistant.submit(&body.text) {
        Ok(pending) => {
            info!(model = state.model.as_deref().unwrap_or("simulation"), "assistant: reply scheduled");
            Ok((StatusCode::ACCEPTED, Json(pending.view().clone())))
        }
        Err(e) => {
            info!(code = e.error_code(), "assistant: message rejected");
            Err(error_response(submit_error_to_status(e), &e))
        }
    }
}

pub(crate) fn submit_error_to_status(err: SubmitError) -> StatusCode {
    match err {
        SubmitError::EmptySubmission => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitError::ConcurrentSubmission | SubmitError::WidgetClosed => StatusCode::CONFLICT,
    }
}

#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;
