use serde::{Deserialize, Serialize};

/// Fixed instruction sent with every palette request.
pub const PALETTE_SYSTEM_PROMPT: &str = "\
You are a color palette designer. Read the user's text and create a palette \
of exactly 5 colors that captures its mood, setting, and imagery. \
Respond with raw JSON only: no markdown, no code fences, no commentary. \
Use exactly this schema: \
{\"name\": \"<short creative palette name>\", \
\"colors\": [\"#RRGGBB\", \"#RRGGBB\", \"#RRGGBB\", \"#RRGGBB\", \"#RRGGBB\"], \
\"description\": \"<one sentence describing the palette>\"}. \
Every color must be a 6-digit hex code prefixed with #.";

/// A single message in a model request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// The message list for one palette request: the fixed directive followed
/// by the user's text, passed through literally.
pub fn palette_messages(text: &str) -> Vec<PromptMessage> {
    vec![
        PromptMessage {
            role: PromptRole::System,
            content: PALETTE_SYSTEM_PROMPT.to_string(),
        },
        PromptMessage {
            role: PromptRole::User,
            content: text.to_string(),
        },
    ]
}
