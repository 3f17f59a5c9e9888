//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the single process-wide assistant controller (one conversation per
//! process) and the image-editing service. Both are cheap to clone.

use std::sync::Arc;

use crate::assistant::WidgetController;
use crate::services::image_edit::ImageEditService;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub assistant: WidgetController,
    pub images: Arc<ImageEditService>,
    /// Active chat model, `None` in simulation mode.
    pub model: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new(assistant: WidgetController, images: ImageEditService, model: Option<String>) -> Self {
        Self { assistant, images: Arc::new(images), model }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
