use super::*;
use crate::state::test_helpers::ScriptedImageEditor;

const PNG_MAGIC: &str = "iVBORw0KGgo=";

fn edited(data: &str) -> InlineImage {
    InlineImage { mime_type: "image/png".into(), data: data.into() }
}

fn service_with(editor: Arc<ScriptedImageEditor>) -> ImageEditService {
    ImageEditService::new(Some(editor as Arc<dyn ImageEdit>))
}

// =========================================================================
// decode_image_input
// =========================================================================

#[test]
fn raw_base64_defaults_to_png() {
    let image = decode_image_input(PNG_MAGIC, None).unwrap();
    assert_eq!(image, InlineImage { mime_type: "image/png".into(), data: PNG_MAGIC.into() });
}

#[test]
fn raw_base64_uses_supplied_mime_type() {
    let image = decode_image_input(PNG_MAGIC, Some("image/jpeg")).unwrap();
    assert_eq!(image.mime_type, "image/jpeg");
}

#[test]
fn data_url_prefix_is_stripped_and_its_type_wins() {
    let url = format!("data:image/webp;base64,{PNG_MAGIC}");
    let image = decode_image_input(&url, Some("image/jpeg")).unwrap();

    assert_eq!(image.mime_type, "image/webp");
    assert_eq!(image.data, PNG_MAGIC);
}

#[test]
fn blank_input_is_missing_image() {
    assert!(matches!(decode_image_input("  ", None), Err(ImageEditError::MissingImage)));
    assert!(matches!(decode_image_input("data:image/png;base64,", None), Err(ImageEditError::MissingImage)));
}

#[test]
fn non_base64_payload_is_invalid() {
    assert!(matches!(decode_image_input("not base64!!", None), Err(ImageEditError::InvalidImage(_))));
    assert!(matches!(decode_image_input("data:image/png,abc", None), Err(ImageEditError::InvalidImage(_))));
}

#[test]
fn non_image_mime_type_is_invalid() {
    let err = decode_image_input(PNG_MAGIC, Some("application/pdf")).unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_IMAGE");
}

// =========================================================================
// edit
// =========================================================================

#[tokio::test]
async fn edit_returns_backend_image_with_data_url() {
    let editor = Arc::new(ScriptedImageEditor::new(Ok(Some(edited("AAAA")))));
    let service = service_with(editor.clone());

    let result = service
        .edit(PNG_MAGIC, None, "Ajoute un filtre rétro")
        .await
        .unwrap();

    assert_eq!(result.data, "AAAA");
    assert_eq!(result.data_url, "data:image/png;base64,AAAA");
    let calls = editor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "Ajoute un filtre rétro");
}

#[tokio::test]
async fn empty_prompt_never_reaches_backend() {
    let editor = Arc::new(ScriptedImageEditor::new(Ok(Some(edited("AAAA")))));
    let service = service_with(editor.clone());

    let err = service.edit(PNG_MAGIC, None, "   ").await.unwrap_err();

    assert!(matches!(err, ImageEditError::EmptyPrompt));
    assert!(editor.calls().is_empty());
}

#[tokio::test]
async fn unconfigured_service_validates_then_refuses() {
    let service = ImageEditService::new(None);
    assert!(!service.is_configured());

    assert!(matches!(service.edit("", None, "x").await, Err(ImageEditError::MissingImage)));
    assert!(matches!(service.edit(PNG_MAGIC, None, "x").await, Err(ImageEditError::NotConfigured)));
}

#[tokio::test]
async fn backend_without_image_is_reported() {
    let editor = Arc::new(ScriptedImageEditor::new(Ok(None)));
    let err = service_with(editor).edit(PNG_MAGIC, None, "x").await.unwrap_err();
    assert_eq!(err.error_code(), "E_NO_IMAGE_RETURNED");
}

#[tokio::test]
async fn backend_error_keeps_its_code() {
    let editor = Arc::new(ScriptedImageEditor::new(Err(LlmError::ApiResponse { status: 503, body: "busy".into() })));
    let err = service_with(editor).edit(PNG_MAGIC, None, "x").await.unwrap_err();

    assert!(matches!(err, ImageEditError::Backend(_)));
    assert_eq!(err.error_code(), "E_API_RESPONSE");
    assert!(err.retryable());
}

#[tokio::test]
async fn provider_without_image_support_is_not_configured() {
    let editor = Arc::new(ScriptedImageEditor::new(Err(LlmError::Unsupported("image editing"))));
    let err = service_with(editor.clone()).edit(PNG_MAGIC, None, "x").await.unwrap_err();

    assert!(matches!(err, ImageEditError::NotConfigured));
    assert_eq!(editor.calls().len(), 1);
}
