use serde_json::{Value, json};

use chroma_bedrock::error::NormalizeError;
use chroma_bedrock::normalize::{PREVIEW_CHARS, normalize_completion};

const PALETTE_JSON: &str = r##"{"name":"Harbor Dawn","colors":["#0B3D91","#1E6F9F","#F2C14E","#F78154","#FDF0D5"],"description":"First light over still water."}"##;

fn expected() -> Value {
    serde_json::from_str(PALETTE_JSON).unwrap()
}

fn as_value(payload: &Value) -> Value {
    serde_json::to_value(normalize_completion(Some(payload)).unwrap()).unwrap()
}

#[test]
fn bare_string_payload() {
    assert_eq!(as_value(&json!(PALETTE_JSON)), expected());
}

#[test]
fn response_field_payload() {
    assert_eq!(as_value(&json!({ "response": PALETTE_JSON })), expected());
}

#[test]
fn text_field_payload() {
    assert_eq!(as_value(&json!({ "text": PALETTE_JSON })), expected());
}

#[test]
fn all_wrappings_agree() {
    let bare = as_value(&json!(PALETTE_JSON));
    let response = as_value(&json!({ "response": PALETTE_JSON }));
    let text = as_value(&json!({ "text": PALETTE_JSON }));
    assert_eq!(bare, response);
    assert_eq!(response, text);
}

#[test]
fn fenced_output_with_commentary() {
    let raw = "Sure! ```json\n{\"name\":\"Dawn\",\"colors\":[\"#111111\"],\"description\":\"x\"}\n```";
    let palette = normalize_completion(Some(&json!(raw))).unwrap();

    assert_eq!(palette.name, "Dawn");
    assert_eq!(palette.colors, ["#111111"]);
    assert_eq!(palette.description, "x");
}

#[test]
fn commentary_on_both_sides() {
    let raw = format!("Here is your palette:\n\n{PALETTE_JSON}\n\nLet me know if you want changes!");
    assert_eq!(as_value(&json!({ "response": raw })), expected());
}

#[test]
fn unfenced_json_inside_plain_fence() {
    let raw = format!("```\n{PALETTE_JSON}\n```");
    assert_eq!(as_value(&json!(raw)), expected());
}

#[test]
fn missing_payload_is_empty_output() {
    assert!(matches!(
        normalize_completion(None),
        Err(NormalizeError::EmptyModelOutput)
    ));
}

#[test]
fn unknown_shape_is_empty_output() {
    assert!(matches!(
        normalize_completion(Some(&json!({ "choices": [] }))),
        Err(NormalizeError::EmptyModelOutput)
    ));
}

#[test]
fn malformed_output_preview_is_truncated_to_200_chars() {
    let raw = format!("{{\"name\": \"Broken\", {}", "x".repeat(500));
    let err = normalize_completion(Some(&json!(raw))).unwrap_err();

    match err {
        NormalizeError::MalformedOutput { preview, .. } => {
            assert_eq!(preview.chars().count(), PREVIEW_CHARS);
            assert!(preview.starts_with("{\"name\": \"Broken\""));
        }
        other => panic!("expected MalformedOutput, got {other:?}"),
    }
}

#[test]
fn short_malformed_output_is_previewed_whole() {
    let err = normalize_completion(Some(&json!("I cannot help with that."))).unwrap_err();
    match err {
        NormalizeError::MalformedOutput { preview, .. } => {
            assert_eq!(preview, "I cannot help with that.");
        }
        other => panic!("expected MalformedOutput, got {other:?}"),
    }
}

#[test]
fn absent_colors_is_missing_colors() {
    let err = normalize_completion(Some(&json!(r#"{"name":"N","description":"d"}"#))).unwrap_err();
    match err {
        NormalizeError::MissingColors { received } => {
            assert_eq!(received, json!({"name": "N", "description": "d"}));
        }
        other => panic!("expected MissingColors, got {other:?}"),
    }
}

#[test]
fn non_array_colors_is_missing_colors() {
    let err =
        normalize_completion(Some(&json!(r##"{"name":"N","colors":"#000000"}"##))).unwrap_err();
    assert!(matches!(err, NormalizeError::MissingColors { .. }));
}

#[test]
fn empty_colors_is_empty_colors() {
    let err = normalize_completion(Some(&json!(r#"{"name":"N","colors":[]}"#))).unwrap_err();
    assert!(matches!(err, NormalizeError::EmptyColors));
}

#[test]
fn malformed_color_tokens_pass_through() {
    let raw = r##"{"name":"N","colors":["blue","#12345","#ABCDEF"],"description":"d"}"##;
    let palette = normalize_completion(Some(&json!(raw))).unwrap();
    assert_eq!(palette.colors, ["blue", "#12345", "#ABCDEF"]);
}
