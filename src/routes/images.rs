//! Image editing route.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Deserialize;

use super::error_response;
use crate::error::ErrorCode;
use crate::services::image_edit::{EditedImage, ImageEditError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EditImageBody {
    /// Raw base64 or a `data:` URL.
    pub image: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub prompt: String,
}

/// `POST /api/images/edit` — apply an instruction to an uploaded image.
pub async fn edit(State(state): State<AppState>, Json(body): Json<EditImageBody>) -> Result<Json<EditedImage>, Response> {
    state
        .images
        .edit(&body.image, body.mime_type.as_deref(), &body.prompt)
        .await
        .map(Json)
        .map_err(|e| error_response(image_error_to_status(&e), &PublicError(&e)))
}

pub(crate) fn image_error_to_status(err: &ImageEditError) -> StatusCode {
    match err {
        ImageEditError::EmptyPrompt | ImageEditError::MissingImage | ImageEditError::InvalidImage(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ImageEditError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        ImageEditError::NoImageReturned | ImageEditError::Backend(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Client-facing rendering of an [`ImageEditError`]; backend internals stay
/// in the logs.
struct PublicError<'a>(&'a ImageEditError);

impl std::fmt::Display for PublicError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            ImageEditError::Backend(_) => f.write_str("image backend unavailable"),
            other => write!(f, "{other}"),
        }
    }
}

impl ErrorCode for PublicError<'_> {
    fn error_code(&self) -> &'static str {
        self.0.error_code()
    }
}

#[cfg(test)]
#[path = "images_test.rs"]
mod tests;
