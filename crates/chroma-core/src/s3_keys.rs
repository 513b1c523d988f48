//! S3 key/path conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of history objects in the Chroma S3 bucket.

use crate::models::history::EntryId;
use crate::shard::ShardKey;

pub const HISTORY_PREFIX: &str = "history/";

/// Prefix under which every entry of one shard lives.
pub fn history_shard_prefix(shard: &ShardKey) -> String {
    format!("{HISTORY_PREFIX}{shard}/")
}

pub fn history_entry(shard: &ShardKey, id: &EntryId) -> String {
    format!("{HISTORY_PREFIX}{shard}/{id}.json")
}

/// Recover the entry id from a full object key produced by [`history_entry`].
///
/// Returns `None` for keys outside the shard's prefix or without the
/// `.json` suffix.
pub fn entry_id_from_key<'a>(shard: &ShardKey, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(HISTORY_PREFIX)?
        .strip_prefix(shard.as_str())?
        .strip_prefix('/')?
        .strip_suffix(".json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_key_round_trips_through_prefix() {
        let shard = ShardKey::for_user(Some("ada"));
        let id = EntryId::parse("1700000000000-0123456789abcdef0123456789abcdef").unwrap();

        let key = history_entry(&shard, &id);
        assert!(key.starts_with(&history_shard_prefix(&shard)));
        assert_eq!(entry_id_from_key(&shard, &key), Some(id.as_str()));
    }

    #[test]
    fn foreign_keys_are_rejected() {
        let shard = ShardKey::for_user(Some("ada"));
        let other = ShardKey::for_user(Some("grace"));
        let id = EntryId::parse("1700000000000-0123456789abcdef0123456789abcdef").unwrap();

        assert_eq!(entry_id_from_key(&shard, &history_entry(&other, &id)), None);
        assert_eq!(entry_id_from_key(&shard, "history/notes.txt"), None);
    }
}
