//! Image editing service — instruction + image in, edited image out.
//!
//! DESIGN
//! ======
//! Accepts raw base64 or a `data:<mime>;base64,<payload>` URL, validates the
//! payload, and forwards it to the configured [`ImageEdit`] backend. There is
//! no simulation mode: without a credential, or with a provider that answers
//! [`LlmError::Unsupported`], every call is `NotConfigured`.
//!
//! ERROR HANDLING
//! ==============
//! Backend failures are logged with their code and surfaced as
//! [`ImageEditError::Backend`]; route handlers map them to an opaque 502.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use tracing::{error, info};

use crate::error::ErrorCode;
use crate::llm::ImageEdit;
use crate::llm::types::{InlineImage, LlmError};

const DEFAULT_MIME_TYPE: &str = "image/png";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ImageEditError {
    #[error("edit instruction is empty")]
    EmptyPrompt,
    #[error("no image supplied")]
    MissingImage,
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("image editing is not configured")]
    NotConfigured,
    #[error("backend returned no image")]
    NoImageReturned,
    #[error(transparent)]
    Backend(#[from] LlmError),
}

impl ErrorCode for ImageEditError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyPrompt => "E_EMPTY_PROMPT",
            Self::MissingImage => "E_MISSING_IMAGE",
            Self::InvalidImage(_) => "E_INVALID_IMAGE",
            Self::NotConfigured => "E_NOT_CONFIGURED",
            Self::NoImageReturned => "E_NO_IMAGE_RETURNED",
            Self::Backend(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Backend(e) => e.retryable(),
            _ => false,
        }
    }
}

/// Edited image, ready to drop into an `<img src>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditedImage {
    pub mime_type: String,
    pub data: String,
    pub data_url: String,
}

impl From<InlineImage> for EditedImage {
    fn from(image: InlineImage) -> Self {
        let data_url = format!("data:{};base64,{}", image.mime_type, image.data);
        Self { mime_type: image.mime_type, data: image.data, data_url }
    }
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct ImageEditService {
    editor: Option<Arc<dyn ImageEdit>>,
}

impl ImageEditService {
    #[must_use]
    pub fn new(editor: Option<Arc<dyn ImageEdit>>) -> Self {
        Self { editor }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.editor.is_some()
    }

    /// Apply `prompt` to `image`.
    ///
    /// `mime_type` is used for raw base64 input; a data URL's own type wins.
    ///
    /// # Errors
    ///
    /// Validation errors are checked before the backend is consulted, so an
    /// unconfigured service still reports bad input first.
    pub async fn edit(
        &self,
        image: &str,
        mime_type: Option<&str>,
        prompt: &str,
    ) -> Result<EditedImage, ImageEditError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ImageEditError::EmptyPrompt);
        }
        let input = decode_image_input(image, mime_type)?;

        let Some(editor) = &self.editor else {
            return Err(ImageEditError::NotConfigured);
        };

        info!(mime_type = %input.mime_type, bytes = input.data.len(), "image: edit requested");
        match editor.edit_image(&input, prompt).await {
            Ok(Some(edited)) => {
                info!(mime_type = %edited.mime_type, "image: edit completed");
                Ok(edited.into())
            }
            Ok(None) => Err(ImageEditError::NoImageReturned),
            Err(LlmError::Unsupported(what)) => {
                info!(%what, "image: provider cannot edit images");
                Err(ImageEditError::NotConfigured)
            }
            Err(e) => {
                error!(error = %e, code = e.error_code(), "image: backend failed");
                Err(e.into())
            }
        }
    }
}

/// Split an optional data-URL prefix off `raw` and validate the payload.
pub(crate) fn decode_image_input(raw: &str, mime_type: Option<&str>) -> Result<InlineImage, ImageEditError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ImageEditError::MissingImage);
    }

    let (mime_type, data) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (mime, payload) = rest
                .split_once(";base64,")
                .ok_or_else(|| ImageEditError::InvalidImage("data URL is not base64".into()))?;
            let mime = if mime.is_empty() { DEFAULT_MIME_TYPE } else { mime };
            (mime, payload)
        }
        None => (mime_type.filter(|m| !m.trim().is_empty()).unwrap_or(DEFAULT_MIME_TYPE), raw),
    };

    if data.is_empty() {
        return Err(ImageEditError::MissingImage);
    }
    if !mime_type.starts_with("image/") {
        return Err(ImageEditError::InvalidImage(format!("unsupported mime type {mime_type}")));
    }
    STANDARD
        .decode(data)
        .map_err(|e| ImageEditError::InvalidImage(e.to_string()))?;

    Ok(InlineImage { mime_type: mime_type.to_string(), data: data.to_string() })
}

#[cfg(test)]
#[path = "image_edit_test.rs"]
mod tests;
