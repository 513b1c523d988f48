//! chroma-bedrock
//!
//! Bedrock model invocation and palette extraction from model completions.

pub mod error;
pub mod model;
pub mod normalize;
pub mod prompt;
