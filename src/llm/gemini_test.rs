use super::*;
use serde_json::json;

fn make_response(parts: serde_json::Value) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 42, "candidatesTokenCount": 7 },
        "modelVersion": "gemini-2.5-flash"
    })
    .to_string()
}

// =============================================================================
// build_chat_request
// =============================================================================

#[test]
fn chat_request_maps_assistant_to_model_role() {
    let messages = vec![
        Message::user("Bonjour"),
        Message::assistant("Bonjour ! Comment puis-je vous aider ?"),
        Message::user("Je cherche un cardiologue"),
    ];
    let body = serde_json::to_value(build_chat_request(512, "Réponds en français.", &messages)).unwrap();

    let roles: Vec<&str> = body["contents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["user", "model", "user"]);
    assert_eq!(body["contents"][2]["parts"][0]["text"], "Je cherche un cardiologue");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Réponds en français.");
    assert!(body["systemInstruction"].get("role").is_none());
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
    assert!(body["generationConfig"].get("responseModalities").is_none());
}

#[test]
fn chat_request_omits_blank_system_instruction() {
    let messages = vec![Message::user("hi")];
    let body = serde_json::to_value(build_chat_request(10, "  ", &messages)).unwrap();
    assert!(body.get("systemInstruction").is_none());
}

#[test]
fn image_request_sends_inline_data_then_prompt() {
    let image = InlineImage { mime_type: "image/jpeg".into(), data: "/9j/4AAQ".into() };
    let body = serde_json::to_value(build_image_request(&image, "Enlever l'arrière-plan")).unwrap();

    let parts = &body["contents"][0]["parts"];
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(parts[0]["inlineData"]["data"], "/9j/4AAQ");
    assert_eq!(parts[1]["text"], "Enlever l'arrière-plan");
    assert_eq!(body["generationConfig"]["responseModalities"], json!(["IMAGE"]));
    assert!(body["generationConfig"].get("maxOutputTokens").is_none());
}

// =============================================================================
// parse_response
// =============================================================================

#[test]
fn parse_text_response() {
    let json = make_response(json!([{ "text": "Voici deux cardiologues à Dakar..." }]));
    let resp = parse_response(&json, "requested").unwrap();
    assert_eq!(resp.text().as_deref(), Some("Voici deux cardiologues à Dakar..."));
    assert_eq!(resp.model, "gemini-2.5-flash");
    assert_eq!(resp.stop_reason, "STOP");
    assert_eq!(resp.input_tokens, 42);
    assert_eq!(resp.output_tokens, 7);
}

#[test]
fn parse_joins_multiple_text_parts() {
    let json = make_response(json!([{ "text": "Bonjour, " }, { "text": "je suis là." }]));
    let resp = parse_response(&json, "m").unwrap();
    assert_eq!(resp.text().as_deref(), Some("Bonjour, je suis là."));
}

#[test]
fn parse_drops_thought_parts() {
    let json = make_response(json!([
        { "text": "let me think", "thought": true },
        { "text": "Réponse" }
    ]));
    let resp = parse_response(&json, "m").unwrap();
    assert_eq!(resp.content.len(), 1);
    assert_eq!(resp.text().as_deref(), Some("Réponse"));
}

#[test]
fn parse_inline_image_part() {
    let json = make_response(json!([
        { "text": "Voici l'image modifiée" },
        { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
    ]));
    let resp = parse_response(&json, "m").unwrap();
    let img = resp.first_image().unwrap();
    assert_eq!(img.mime_type, "image/png");
    assert_eq!(img.data, "iVBORw0KGgo=");
}

#[test]
fn parse_no_candidates_is_empty_not_error() {
    let json = json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
    let resp = parse_response(&json, "gemini-2.5-flash").unwrap();
    assert!(resp.content.is_empty());
    assert!(resp.text().is_none());
    assert_eq!(resp.stop_reason, "NO_CANDIDATES");
    assert_eq!(resp.model, "gemini-2.5-flash");
}

#[test]
fn parse_candidate_without_content() {
    let json = json!({ "candidates": [{ "finishReason": "SAFETY" }] }).to_string();
    let resp = parse_response(&json, "m").unwrap();
    assert!(resp.content.is_empty());
    assert_eq!(resp.stop_reason, "SAFETY");
}

#[test]
fn parse_invalid_json() {
    let err = parse_response("not json", "m").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}
