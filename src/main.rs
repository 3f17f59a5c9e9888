mod assistant;
mod error;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::assistant::{AssistantConfig, ConversationState, FallbackPolicy, SessionClient, WidgetController};
use crate::llm::types::LlmError;
use crate::llm::{ImageEdit, LlmChat, LlmClient};
use crate::services::image_edit::ImageEditService;

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port = match std::env::var("PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(%raw, "invalid PORT, using default");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    };

    // Credential is read once. Without it the assistant runs in simulation mode.
    let llm = match LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e @ LlmError::MissingApiKey { .. }) => {
            tracing::info!(reason = %e, "no LLM credential, assistant in simulation mode");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, assistant in simulation mode");
            None
        }
    };

    let config = AssistantConfig::from_env();
    let model = llm.as_ref().map(|c| c.model().to_string());
    let session = llm
        .clone()
        .map(|c| SessionClient::new(c as Arc<dyn LlmChat>, &config));
    let editor = llm.map(|c| c as Arc<dyn ImageEdit>);

    let assistant = WidgetController::new(FallbackPolicy::new(session, &config), ConversationState::new());
    let images = ImageEditService::new(editor);
    tracing::info!(image_edit = images.is_configured(), "services ready");
    let state = state::AppState::new(assistant, images, model);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "allo-docteur assistant listening");
    axum::serve(listener, app).await
}
