//! LLM types — provider-neutral message types and errors.
//!
//! Shared by the Gemini and `OpenAI` clients. Roles are the neutral
//! strings `"user"` and `"assistant"`; each client maps them onto its own
//! vocabulary when building the wire request.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Neutral role name for end-user messages.
pub const ROLE_USER: &str = "user";

/// Neutral role name for model-authored messages.
pub const ROLE_ASSISTANT: &str = "assistant";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The API key environment variable is not set or is blank.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// No reply arrived within the configured deadline.
    #[error("LLM call timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The configured provider does not offer this capability.
    #[error("operation not supported by provider: {0}")]
    Unsupported(&'static str),
}

impl ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Timeout { .. } => "E_TIMEOUT",
            Self::Unsupported(_) => "E_UNSUPPORTED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// CONTENT
// =============================================================================

/// Base64 image payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// A structured content block in an API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// A plain text segment.
    Text { text: String },
    /// An inline image returned by image-capable models.
    Image(InlineImage),
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ROLE_USER.into(), content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ROLE_ASSISTANT.into(), content: content.into() }
    }
}

/// Response from an LLM chat call.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl ChatResponse {
    /// Concatenated text blocks, or `None` when the model produced no text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Image(_) => None,
            })
            .collect();
        let joined = parts.join("");
        if joined.trim().is_empty() { None } else { Some(joined) }
    }

    /// First inline image in the response, if any.
    #[must_use]
    pub fn first_image(&self) -> Option<&InlineImage> {
        self.content.iter().find_map(|b| match b {
            ContentBlock::Image(img) => Some(img),
            ContentBlock::Text { .. } => None,
        })
    }
}

// =============================================================================
// CAPABILITY TRAITS
// =============================================================================

/// Provider-neutral async trait for LLM chat. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send a chat request to the LLM provider.
    ///
    /// `messages` is the ordered conversation; its last entry is the new
    /// user prompt.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the response is malformed.
    async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError>;
}

/// Instruction-driven image editing.
#[async_trait::async_trait]
pub trait ImageEdit: Send + Sync {
    /// Apply `prompt` to `image`. `Ok(None)` means the model answered
    /// without an image part.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the provider cannot edit images.
    async fn edit_image(&self, image: &InlineImage, prompt: &str) -> Result<Option<InlineImage>, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
