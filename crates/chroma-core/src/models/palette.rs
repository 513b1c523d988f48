use serde::{Deserialize, Serialize};

/// A generated color palette.
///
/// `colors` holds the model's tokens as-is. Five `#RRGGBB` codes are
/// expected, but any non-empty sequence is accepted and nothing is dropped.
/// `original_text` and `timestamp` are attached after generation and are
/// absent from the palette returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<jiff::Timestamp>,
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: Vec<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors,
            description: description.into(),
            original_text: None,
            timestamp: None,
        }
    }

    /// Attach the input text and creation instant. An existing timestamp is
    /// kept, since it is set once.
    pub fn with_origin(mut self, original_text: impl Into<String>, now: jiff::Timestamp) -> Self {
        self.original_text = Some(original_text.into());
        self.timestamp.get_or_insert(now);
        self
    }

    /// Whether a token is in canonical `#RRGGBB` form.
    pub fn is_canonical_color(token: &str) -> bool {
        token
            .strip_prefix('#')
            .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
    }
}
