use super::*;
use crate::consts::STYLE_DIRECTIVE;

fn request(drawing: Option<Vec<u8>>) -> GenerationRequest {
    GenerationRequest {
        prompt: "add a sun".into(),
        drawing,
        similarity: 0.5,
        model: "test-model".into(),
        credential: None,
    }
}

// =============================================================
// parts
// =============================================================

#[test]
fn parts_with_drawing_are_image_then_text() {
    let req = request(Some(vec![1, 2, 3]));
    let parts = req.parts();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], RequestPart::Image { png: &[1, 2, 3] });
    match &parts[1] {
        RequestPart::Text(text) => {
            assert!(text.starts_with("add a sun"));
            assert!(text.contains(similarity::instruction_for(0.5)));
            assert!(text.ends_with(STYLE_DIRECTIVE));
        }
        RequestPart::Image { .. } => panic!("expected text part second"),
    }
}

#[test]
fn parts_without_drawing_are_text_only() {
    let req = request(None);
    let parts = req.parts();
    assert_eq!(parts.len(), 1);
    assert!(matches!(&parts[0], RequestPart::Text(t) if t.contains("add a sun")));
}

// =============================================================
// error_message_from_payload
// =============================================================

#[test]
fn structured_payload_yields_inner_message() {
    let raw = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
    assert_eq!(error_message_from_payload(raw), "API key not valid");
}

#[test]
fn unstructured_payload_is_returned_verbatim() {
    assert_eq!(error_message_from_payload("connection reset"), "connection reset");
}

#[test]
fn json_without_error_message_is_returned_verbatim() {
    let raw = r#"{"error":{"code":500}}"#;
    assert_eq!(error_message_from_payload(raw), raw);
}

#[test]
fn empty_inner_message_falls_back_to_raw() {
    let raw = r#"{"error":{"message":"  "}}"#;
    assert_eq!(error_message_from_payload(raw), raw);
}

// =============================================================
// GenerationPhase / Submission
// =============================================================

#[test]
fn phase_default_is_idle() {
    assert_eq!(GenerationPhase::default(), GenerationPhase::Idle);
}

#[test]
fn phase_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&GenerationPhase::Submitting).unwrap(), r#""submitting""#);
}

#[test]
fn submission_credential_is_optional() {
    let sub: Submission = serde_json::from_str(r#"{"prompt":"p","similarity":0.1,"model":"m"}"#).unwrap();
    assert_eq!(sub.credential, None);
}

#[test]
fn generation_error_messages() {
    assert_eq!(GenerationError::Busy.to_string(), "a generation request is already in progress");
    assert_eq!(GenerationError::Service("boom".into()).to_string(), "boom");
}
