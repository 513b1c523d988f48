use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),
}

/// Why a completion could not be turned into a palette.
///
/// Each variant carries just enough context to diagnose the failure without
/// echoing the full model output.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("model returned no usable output")]
    EmptyModelOutput,

    #[error("model output is not valid JSON: {message}")]
    MalformedOutput {
        message: String,
        /// The first 200 characters of the text that failed to decode.
        preview: String,
    },

    #[error("palette is missing a colors array")]
    MissingColors { received: serde_json::Value },

    #[error("palette colors array is empty")]
    EmptyColors,
}
