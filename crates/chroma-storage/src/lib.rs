//! chroma-storage
//!
//! Palette history persistence. S3 operations are a thin wrapper around the
//! AWS S3 SDK; [`history`] builds the per-user append log on top of them.

pub mod client;
pub mod error;
pub mod history;
pub mod objects;
