//! User → shard addressing.
//!
//! A shard key is the lowercase hex SHA-256 digest of the user identifier.
//! The mapping is pure: the same identifier always lands in the same shard,
//! and arbitrary caller strings never reach an object key verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identifier used when the caller does not supply one.
pub const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShardKey(String);

impl ShardKey {
    /// Resolve the shard for a caller-supplied identifier. Absent or blank
    /// identifiers share the anonymous shard.
    pub fn for_user(user_id: Option<&str>) -> Self {
        let user_id = resolve_user_id(user_id);
        Self(hex::encode(Sha256::digest(user_id.as_bytes())))
    }

    pub fn anonymous() -> Self {
        Self::for_user(None)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The effective user identifier: the trimmed input, or [`ANONYMOUS_USER`].
pub fn resolve_user_id(user_id: Option<&str>) -> &str {
    match user_id.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => ANONYMOUS_USER,
    }
}
