//! Gemini `generateContent` API client.
//!
//! Thin HTTP wrapper for `/models/{model}:generateContent`. Request building
//! and response parsing are pure functions so they can be tested without a
//! network. The conversation is sent in full on every call; no server-side
//! chat session is held.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::LlmTimeouts;
use super::types::{ChatResponse, ContentBlock, InlineImage, LlmError, Message, ROLE_ASSISTANT};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MODEL_ROLE: &str = "model";
const USER_ROLE: &str = "user";

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        let body = build_chat_request(max_tokens, system, messages);
        let text = self.generate(model, &body).await?;
        parse_response(&text, model)
    }

    pub async fn edit_image(
        &self,
        model: &str,
        image: &InlineImage,
        prompt: &str,
    ) -> Result<Option<InlineImage>, LlmError> {
        let body = build_image_request(image, prompt);
        let text = self.generate(model, &body).await?;
        let response = parse_response(&text, model)?;
        Ok(response.first_image().cloned())
    }

    async fn generate(&self, model: &str, body: &GenerateRequest<'_>) -> Result<String, LlmError> {
        let url = format!("{}/models/{model}:generateContent", self.base_url);
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    contents: Vec<WireContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: WireInlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<ResponseInlineData>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseInlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

// =============================================================================
// REQUEST BUILDING
// =============================================================================

/// Map a neutral role onto Gemini's vocabulary (`assistant` → `model`).
fn wire_role(role: &str) -> &'static str {
    if role == ROLE_ASSISTANT { MODEL_ROLE } else { USER_ROLE }
}

fn build_chat_request<'a>(max_tokens: u32, system: &'a str, messages: &'a [Message]) -> GenerateRequest<'a> {
    let system_instruction = (!system.trim().is_empty())
        .then(|| WireContent { role: None, parts: vec![WirePart::Text { text: system }] });
    let contents = messages
        .iter()
        .map(|m| WireContent { role: Some(wire_role(&m.role)), parts: vec![WirePart::Text { text: &m.content }] })
        .collect();
    GenerateRequest {
        system_instruction,
        contents,
        generation_config: GenerationConfig { max_output_tokens: Some(max_tokens), ..GenerationConfig::default() },
    }
}

fn build_image_request<'a>(image: &'a InlineImage, prompt: &'a str) -> GenerateRequest<'a> {
    let parts = vec![
        WirePart::InlineData { inline_data: WireInlineData { mime_type: &image.mime_type, data: &image.data } },
        WirePart::Text { text: prompt },
    ];
    GenerateRequest {
        system_instruction: None,
        contents: vec![WireContent { role: Some(USER_ROLE), parts }],
        generation_config: GenerationConfig { response_modalities: Some(vec!["IMAGE"]), ..GenerationConfig::default() },
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a `generateContent` body. Only the first candidate is read; a
/// response without candidates (e.g. a blocked prompt) yields empty content.
fn parse_response(json: &str, requested_model: &str) -> Result<ChatResponse, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let (content, stop_reason) = match api.candidates.into_iter().next() {
        Some(candidate) => {
            let blocks = candidate
                .content
                .map(|c| c.parts)
                .unwrap_or_default()
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| match (p.text, p.inline_data) {
                    (_, Some(img)) => Some(ContentBlock::Image(InlineImage { mime_type: img.mime_type, data: img.data })),
                    (Some(text), None) => Some(ContentBlock::Text { text }),
                    (None, None) => None,
                })
                .collect();
            (blocks, candidate.finish_reason.unwrap_or_else(|| "STOP".into()))
        }
        None => (Vec::new(), "NO_CANDIDATES".into()),
    };

    let usage = api.usage_metadata;
    Ok(ChatResponse {
        content,
        model: api.model_version.unwrap_or_else(|| requested_model.to_string()),
        stop_reason,
        input_tokens: usage.as_ref().map_or(0, |u| u.prompt_token_count),
        output_tokens: usage.as_ref().map_or(0, |u| u.candidates_token_count),
    })
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
