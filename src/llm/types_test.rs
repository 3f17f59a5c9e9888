use super::*;

// =============================================================================
// LlmError::error_code
// =============================================================================

#[test]
fn error_code_missing_api_key() {
    let err = LlmError::MissingApiKey { var: "API_KEY".into() };
    assert_eq!(err.error_code(), "E_MISSING_API_KEY");
}

#[test]
fn error_code_api_response() {
    let err = LlmError::ApiResponse { status: 500, body: "oops".into() };
    assert_eq!(err.error_code(), "E_API_RESPONSE");
}

#[test]
fn error_code_timeout() {
    let err = LlmError::Timeout { secs: 30 };
    assert_eq!(err.error_code(), "E_TIMEOUT");
    assert!(err.to_string().contains("30s"));
}

#[test]
fn error_code_unsupported() {
    let err = LlmError::Unsupported("image editing");
    assert_eq!(err.error_code(), "E_UNSUPPORTED");
}

// =============================================================================
// LlmError::retryable
// =============================================================================

#[test]
fn retryable_api_request() {
    assert!(LlmError::ApiRequest("conn refused".into()).retryable());
}

#[test]
fn retryable_rate_limit_and_server_errors() {
    assert!(LlmError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(LlmError::ApiResponse { status: 503, body: String::new() }.retryable());
}

#[test]
fn not_retryable_client_errors() {
    assert!(!LlmError::ApiResponse { status: 400, body: String::new() }.retryable());
    assert!(!LlmError::ApiResponse { status: 401, body: String::new() }.retryable());
}

#[test]
fn not_retryable_parse_timeout_or_config() {
    assert!(!LlmError::ApiParse("bad".into()).retryable());
    assert!(!LlmError::Timeout { secs: 1 }.retryable());
    assert!(!LlmError::MissingApiKey { var: "X".into() }.retryable());
}

// =============================================================================
// ChatResponse helpers
// =============================================================================

fn response(content: Vec<ContentBlock>) -> ChatResponse {
    ChatResponse { content, model: "m".into(), stop_reason: "end_turn".into(), input_tokens: 0, output_tokens: 0 }
}

#[test]
fn text_joins_text_blocks() {
    let resp = response(vec![
        ContentBlock::Text { text: "Bonjour ".into() },
        ContentBlock::Image(InlineImage { mime_type: "image/png".into(), data: "AAAA".into() }),
        ContentBlock::Text { text: "Dakar".into() },
    ]);
    assert_eq!(resp.text().as_deref(), Some("Bonjour Dakar"));
}

#[test]
fn text_is_none_for_whitespace_only() {
    let resp = response(vec![ContentBlock::Text { text: "  \n".into() }]);
    assert!(resp.text().is_none());
}

#[test]
fn first_image_skips_text() {
    let img = InlineImage { mime_type: "image/png".into(), data: "iVBOR".into() };
    let resp = response(vec![ContentBlock::Text { text: "voici".into() }, ContentBlock::Image(img.clone())]);
    assert_eq!(resp.first_image(), Some(&img));
}

#[test]
fn message_constructors_use_neutral_roles() {
    assert_eq!(Message::user("a").role, ROLE_USER);
    assert_eq!(Message::assistant("b").role, ROLE_ASSISTANT);
}
