//! LLM — multi-provider adapter for the assistant and image editor.
//!
//! DESIGN
//! ======
//! Callers only see the [`LlmChat`] and [`ImageEdit`] traits, so the
//! vendor is swappable and tests can substitute scripted mocks. The
//! concrete [`LlmClient`] dispatches to Gemini (default) or an
//! OpenAI-compatible endpoint based on `LLM_PROVIDER`.

pub mod config;
pub mod gemini;
pub mod openai;
pub mod types;

use config::{LlmConfig, LlmProviderKind};
pub use types::{ImageEdit, LlmChat};
use types::{ChatResponse, InlineImage, LlmError, Message};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client that dispatches to either Gemini or `OpenAI`.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: LlmProvider,
    model: String,
    image_model: String,
}

enum LlmProvider {
    Gemini(gemini::GeminiClient),
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let model = config.model.clone();
        let image_model = config.image_model.clone();
        let inner = match config.provider {
            LlmProviderKind::Gemini => {
                LlmProvider::Gemini(gemini::GeminiClient::new(config.api_key, config.base_url, config.timeouts)?)
            }
            LlmProviderKind::OpenAi => {
                LlmProvider::OpenAi(openai::OpenAiClient::new(config.api_key, config.base_url, config.timeouts)?)
            }
        };
        Ok(Self { inner, model, image_model })
    }

    /// Return the configured chat model name (e.g. `"gemini-2.5-flash"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        match &self.inner {
            LlmProvider::Gemini(c) => c.chat(&self.model, max_tokens, system, messages).await,
            LlmProvider::OpenAi(c) => c.chat(&self.model, max_tokens, system, messages).await,
        }
    }
}

/// Gemini only; the `OpenAI` provider answers [`LlmError::Unsupported`].
#[async_trait::async_trait]
impl ImageEdit for LlmClient {
    async fn edit_image(&self, image: &InlineImage, prompt: &str) -> Result<Option<InlineImage>, LlmError> {
        match &self.inner {
            LlmProvider::Gemini(c) => c.edit_image(&self.image_model, image, prompt).await,
            LlmProvider::OpenAi(_) => Err(LlmError::Unsupported("image editing")),
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
