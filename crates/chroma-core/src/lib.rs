//! chroma-core
//!
//! Pure domain types, shard addressing, and S3 key conventions.
//! No AWS SDK dependency. This is the shared vocabulary of the Chroma system.

pub mod error;
pub mod models;
pub mod s3_keys;
pub mod shard;
