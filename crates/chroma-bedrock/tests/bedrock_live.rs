//! Integration tests against a real Bedrock endpoint.
//!
//! These tests call real AWS APIs and require valid credentials in the
//! environment (e.g. `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`) and
//! access to the model named by `CHROMA_MODEL_ID`.
//!
//! Run with: `cargo test -p chroma-bedrock --test bedrock_live -- --ignored`

use chroma_bedrock::model::{BedrockPaletteModel, PaletteModel};
use chroma_bedrock::normalize::normalize_completion;
use chroma_bedrock::prompt::palette_messages;

async fn build_model() -> BedrockPaletteModel {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new("us-east-1"))
        .load()
        .await;
    let model_id = std::env::var("CHROMA_MODEL_ID")
        .unwrap_or_else(|_| "us.anthropic.claude-haiku-4-5-20251001-v1:0".to_string());
    BedrockPaletteModel::from_config(&config, model_id)
}

#[tokio::test]
#[ignore]
async fn live_completion_normalizes_to_five_colors() {
    let model = build_model().await;
    let payload = model
        .complete(&palette_messages("a calm ocean at dawn"))
        .await
        .expect("model invocation failed");

    println!("raw completion: {payload:?}");

    let palette = normalize_completion(payload.as_ref()).expect("completion did not normalize");
    println!("palette: {palette:?}");

    assert_eq!(palette.colors.len(), 5);
    assert!(!palette.name.is_empty());
}
