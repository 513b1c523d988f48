//! Per-user palette history.
//!
//! Each user identifier maps to a [`ShardKey`]; a shard is an append-only
//! log of [`HistoryEntry`] values. Appends are additive: every entry is
//! written under its own freshly generated id, so concurrent appends to the
//! same shard never overwrite one another and nothing reads the whole set
//! before writing.
//!
//! Reads load the whole shard and always sort newest-first before
//! truncating. Neither backend preserves insertion order.
//!
//! Retention is explicit. [`RetentionPolicy::TruncateOnRead`] keeps every
//! entry and only bounds what `list` returns. [`RetentionPolicy::Bounded`]
//! additionally deletes the oldest entries after each append so the stored
//! log never grows past the bound.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use chroma_core::models::history::{EntryId, HistoryEntry};
use chroma_core::models::palette::Palette;
use chroma_core::s3_keys;
use chroma_core::shard::ShardKey;

use crate::error::StorageError;
use crate::objects;

/// Number of entries a history read returns.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Concurrent object fetches while loading a shard from S3.
const FETCH_CONCURRENCY: usize = 8;

/// What happens to entries beyond the history limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    /// Keep everything; reads return only the newest entries.
    #[default]
    TruncateOnRead,
    /// Physically delete the oldest entries after each append.
    Bounded,
}

impl FromStr for RetentionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate-on-read" | "truncate_on_read" => Ok(RetentionPolicy::TruncateOnRead),
            "bounded" => Ok(RetentionPolicy::Bounded),
            other => Err(format!(
                "unknown retention policy {other:?} (expected \"truncate-on-read\" or \"bounded\")"
            )),
        }
    }
}

/// Retention settings shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    pub policy: RetentionPolicy,
    pub max_entries: usize,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            policy: RetentionPolicy::TruncateOnRead,
            max_entries: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// A keyed, per-user append log of palettes.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist `palette` as a new entry in `shard` and return its id.
    ///
    /// A palette without a timestamp is stamped with the append instant.
    async fn append(&self, shard: &ShardKey, palette: Palette) -> Result<EntryId, StorageError>;

    /// The newest `limit` entries of `shard`, newest first.
    async fn list(&self, shard: &ShardKey, limit: usize) -> Result<Vec<HistoryEntry>, StorageError>;
}

/// Assign an id and make sure the palette carries a timestamp.
fn prepare_entry(mut palette: Palette) -> (EntryId, Palette) {
    let now = jiff::Timestamp::now();
    palette.timestamp.get_or_insert(now);
    (EntryId::generate(now), palette)
}

/// Sort newest-first and keep the first `limit` entries.
pub fn newest(mut entries: Vec<HistoryEntry>, limit: usize) -> Vec<HistoryEntry> {
    entries.sort_by(HistoryEntry::newest_first);
    entries.truncate(limit);
    entries
}

/// Ids that fall outside the newest `keep` entries.
fn overflow(mut entries: Vec<HistoryEntry>, keep: usize) -> Vec<EntryId> {
    entries.sort_by(HistoryEntry::newest_first);
    entries.into_iter().skip(keep).map(|e| e.id).collect()
}

// ── S3 backend ───────────────────────────────────────────────────────────────

/// History stored as one JSON object per entry under
/// `history/{shard}/{entry_id}.json`.
#[derive(Clone)]
pub struct S3HistoryStore {
    client: Client,
    bucket: String,
    retention: Retention,
}

impl S3HistoryStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            retention: Retention::default(),
        }
    }

    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Load every entry of a shard, in no particular order.
    async fn load_all(&self, shard: &ShardKey) -> Result<Vec<HistoryEntry>, StorageError> {
        let prefix = s3_keys::history_shard_prefix(shard);
        let keys = objects::list_objects(&self.client, &self.bucket, &prefix).await?;

        let ids: Vec<(EntryId, String)> = keys
            .into_iter()
            .filter_map(|key| {
                let raw = s3_keys::entry_id_from_key(shard, &key)?;
                match EntryId::parse(raw) {
                    Ok(id) => Some((id, key)),
                    Err(e) => {
                        warn!(key = %key, error = %e, "skipping object with unrecognized key");
                        None
                    }
                }
            })
            .collect();

        let loaded: Vec<Option<HistoryEntry>> = stream::iter(ids)
            .map(|(id, key)| async move { self.fetch_entry(id, &key).await })
            .buffer_unordered(FETCH_CONCURRENCY)
            .try_collect()
            .await?;

        Ok(loaded.into_iter().flatten().collect())
    }

    /// Fetch one entry. Entries deleted between list and get, and objects
    /// that no longer decode as a palette, are skipped.
    async fn fetch_entry(&self, id: EntryId, key: &str) -> Result<Option<HistoryEntry>, StorageError> {
        let output = match objects::get_object(&self.client, &self.bucket, key).await {
            Ok(output) => output,
            Err(StorageError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        match serde_json::from_slice::<Palette>(&output.body) {
            Ok(palette) => Ok(Some(HistoryEntry { id, palette })),
            Err(e) => {
                warn!(key, error = %e, "skipping undecodable history entry");
                Ok(None)
            }
        }
    }

    async fn prune(&self, shard: &ShardKey) -> Result<usize, StorageError> {
        let entries = self.load_all(shard).await?;
        let doomed = overflow(entries, self.retention.max_entries);
        for id in &doomed {
            let key = s3_keys::history_entry(shard, id);
            objects::delete_object(&self.client, &self.bucket, &key).await?;
        }
        Ok(doomed.len())
    }
}

#[async_trait]
impl HistoryStore for S3HistoryStore {
    async fn append(&self, shard: &ShardKey, palette: Palette) -> Result<EntryId, StorageError> {
        let (id, palette) = prepare_entry(palette);
        let key = s3_keys::history_entry(shard, &id);
        let body = serde_json::to_vec(&palette)?;

        objects::put_object(&self.client, &self.bucket, &key, body, Some("application/json")).await?;
        info!(user_shard = %shard, entry_id = %id, "history entry saved");

        if self.retention.policy == RetentionPolicy::Bounded {
            // The entry is already durable; a failed prune only delays eviction.
            match self.prune(shard).await {
                Ok(0) => {}
                Ok(removed) => debug!(user_shard = %shard, removed, "pruned history"),
                Err(e) => warn!(user_shard = %shard, error = %e, "history prune failed"),
            }
        }

        Ok(id)
    }

    async fn list(&self, shard: &ShardKey, limit: usize) -> Result<Vec<HistoryEntry>, StorageError> {
        let entries = self.load_all(shard).await?;
        let total = entries.len();
        let entries = newest(entries, limit);
        debug!(user_shard = %shard, total, returned = entries.len(), "history listed");
        Ok(entries)
    }
}

// ── In-memory backend ────────────────────────────────────────────────────────

/// Process-local history, for local development and tests.
///
/// Shards are `HashMap`s keyed by entry id, so iteration order is arbitrary
/// just like an object listing.
#[derive(Default)]
pub struct MemoryHistoryStore {
    shards: RwLock<HashMap<ShardKey, HashMap<EntryId, Palette>>>,
    retention: Retention,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Number of entries physically stored for a shard.
    pub async fn stored_len(&self, shard: &ShardKey) -> usize {
        self.shards.read().await.get(shard).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, shard: &ShardKey, palette: Palette) -> Result<EntryId, StorageError> {
        let (id, palette) = prepare_entry(palette);

        let mut shards = self.shards.write().await;
        let entries = shards.entry(shard.clone()).or_default();
        entries.insert(id.clone(), palette);

        if self.retention.policy == RetentionPolicy::Bounded
            && entries.len() > self.retention.max_entries
        {
            let snapshot = entries
                .iter()
                .map(|(id, palette)| HistoryEntry {
                    id: id.clone(),
                    palette: palette.clone(),
                })
                .collect();
            for doomed in overflow(snapshot, self.retention.max_entries) {
                entries.remove(&doomed);
            }
        }

        debug!(user_shard = %shard, entry_id = %id, "history entry saved");
        Ok(id)
    }

    async fn list(&self, shard: &ShardKey, limit: usize) -> Result<Vec<HistoryEntry>, StorageError> {
        let shards = self.shards.read().await;
        let entries = shards
            .get(shard)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, palette)| HistoryEntry {
                        id: id.clone(),
                        palette: palette.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(newest(entries, limit))
    }
}
