//! Palette extraction from model completions.
//!
//! Completions are unreliable: the payload shape varies by caller, and the
//! text inside often arrives wrapped in markdown fences or surrounded by
//! chatter. Extraction runs in fixed steps:
//!
//! 1. Pull text out of the payload ([`completion_text`]).
//! 2. Remove code-fence delimiters ([`strip_code_fences`]).
//! 3. Cut out the outermost `{...}` span ([`isolate_json`]).
//! 4. Decode and validate the palette shape ([`parse_palette`]).
//!
//! Individual color tokens are passed through untouched; only the presence
//! and non-emptiness of the `colors` array is checked.

use serde_json::Value;

use chroma_core::models::palette::Palette;

use crate::error::NormalizeError;

/// Characters of the attempted text kept in a `MalformedOutput` preview.
pub const PREVIEW_CHARS: usize = 200;

/// Name given to a palette whose completion carried no usable name.
pub const UNTITLED_PALETTE: &str = "Untitled Palette";

const FENCE: &str = "```";

/// The payload shapes a completion is known to arrive in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionShape<'a> {
    /// The payload is the completion text itself.
    Text(&'a str),
    /// An object carrying the completion in its `response` field.
    ResponseField(&'a Value),
    /// An object carrying the completion in its `text` field.
    TextField(&'a Value),
}

impl<'a> CompletionShape<'a> {
    /// Classify a payload, probing `response` before `text`. A field holding
    /// `null` counts as absent.
    pub fn classify(payload: &'a Value) -> Option<Self> {
        if let Value::String(text) = payload {
            return Some(CompletionShape::Text(text));
        }

        let object = payload.as_object()?;
        if let Some(value) = object.get("response").filter(|v| !v.is_null()) {
            return Some(CompletionShape::ResponseField(value));
        }
        if let Some(value) = object.get("text").filter(|v| !v.is_null()) {
            return Some(CompletionShape::TextField(value));
        }
        None
    }

    fn into_text(self) -> String {
        match self {
            CompletionShape::Text(text) => text.to_string(),
            CompletionShape::ResponseField(value) | CompletionShape::TextField(value) => {
                value_to_text(value)
            }
        }
    }
}

/// Strings verbatim, anything else as compact JSON.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract the completion text from a raw payload.
///
/// Fails with `EmptyModelOutput` when there is no payload, when it matches
/// none of the known shapes, or when the text is blank.
pub fn completion_text(payload: Option<&Value>) -> Result<String, NormalizeError> {
    let text = payload
        .and_then(CompletionShape::classify)
        .map(CompletionShape::into_text)
        .ok_or(NormalizeError::EmptyModelOutput)?;

    if text.trim().is_empty() {
        return Err(NormalizeError::EmptyModelOutput);
    }
    Ok(text)
}

/// Remove markdown code-fence delimiters.
///
/// Every ```` ``` ```` is dropped. A language tag sitting on the same line
/// as a fence (```` ```json ````) is dropped with it.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];

        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        let after_tag = &rest[tag_len..];
        if tag_len > 0 && (after_tag.is_empty() || after_tag.starts_with(['\n', '\r'])) {
            rest = after_tag;
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// The span from the first `{` to the last `}`, or the whole text when no
/// such span exists.
pub fn isolate_json(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Decode a candidate JSON text and validate it as a palette.
pub fn parse_palette(candidate: &str) -> Result<Palette, NormalizeError> {
    let value: Value =
        serde_json::from_str(candidate).map_err(|e| NormalizeError::MalformedOutput {
            message: e.to_string(),
            preview: preview(candidate),
        })?;

    let colors: Option<Vec<String>> = value
        .get("colors")
        .and_then(Value::as_array)
        .map(|colors| colors.iter().map(value_to_text).collect());
    let Some(colors) = colors else {
        return Err(NormalizeError::MissingColors { received: value });
    };
    if colors.is_empty() {
        return Err(NormalizeError::EmptyColors);
    }

    let field = |name: &str| match value.get(name) {
        None | Some(Value::Null) => String::new(),
        Some(v) => value_to_text(v),
    };

    let mut name = field("name");
    if name.trim().is_empty() {
        name = UNTITLED_PALETTE.to_string();
    }

    Ok(Palette::new(name, colors, field("description")))
}

/// Run the full extraction pipeline over a raw completion payload.
pub fn normalize_completion(payload: Option<&Value>) -> Result<Palette, NormalizeError> {
    let text = completion_text(payload)?;
    let cleaned = strip_code_fences(&text);
    parse_palette(isolate_json(&cleaned))
}
