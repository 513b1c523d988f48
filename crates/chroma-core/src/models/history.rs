use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::palette::Palette;
use crate::error::CoreError;

/// Store-assigned identifier of a history entry.
///
/// Formed as `{unix_millis:013}-{uuid_v4_simple}`: the millisecond prefix
/// keeps ids roughly time-ordered, the random suffix keeps them unique when
/// several appends land in the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate(now: jiff::Timestamp) -> Self {
        Self(format!(
            "{:013}-{}",
            now.as_millisecond().max(0),
            Uuid::new_v4().simple()
        ))
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let (millis, random) = raw
            .split_once('-')
            .ok_or_else(|| CoreError::InvalidEntryId(raw.to_string()))?;

        let millis_ok = !millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit());
        let random_ok = random.len() == 32 && random.chars().all(|c| c.is_ascii_hexdigit());
        if !millis_ok || !random_ok {
            return Err(CoreError::InvalidEntryId(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A palette as persisted in one user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    #[serde(flatten)]
    pub palette: Palette,
}

impl HistoryEntry {
    /// Newest first; equal timestamps fall back to descending id so the
    /// order is total and stable across reads.
    pub fn newest_first(a: &HistoryEntry, b: &HistoryEntry) -> std::cmp::Ordering {
        b.palette
            .timestamp
            .cmp(&a.palette.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_parse_and_are_distinct() {
        let now = jiff::Timestamp::now();
        let a = EntryId::generate(now);
        let b = EntryId::generate(now);

        assert_ne!(a, b);
        assert_eq!(EntryId::parse(a.as_str()).unwrap(), a);
    }

    #[test]
    fn generated_ids_sort_by_millisecond() {
        let earlier: jiff::Timestamp = "2023-11-14T22:13:20Z".parse().unwrap();
        let later: jiff::Timestamp = "2024-11-14T22:13:20Z".parse().unwrap();

        assert!(EntryId::generate(earlier) < EntryId::generate(later));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(EntryId::parse("").is_err());
        assert!(EntryId::parse("nodash").is_err());
        assert!(EntryId::parse("12x-0123456789abcdef0123456789abcdef").is_err());
        assert!(EntryId::parse("123-short").is_err());
    }

    #[test]
    fn newest_first_orders_by_timestamp_then_id() {
        let t1: jiff::Timestamp = "2024-01-01T00:00:00Z".parse().unwrap();
        let t2: jiff::Timestamp = "2024-01-02T00:00:00Z".parse().unwrap();
        let entry = |id: &str, ts| HistoryEntry {
            id: EntryId::parse(id).unwrap(),
            palette: Palette::new("p", vec!["#000000".into()], "d").with_origin("t", ts),
        };

        let mut entries = vec![
            entry("1-00000000000000000000000000000001", t1),
            entry("2-00000000000000000000000000000002", t2),
            entry("1-00000000000000000000000000000003", t1),
        ];
        entries.sort_by(HistoryEntry::newest_first);

        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "2-00000000000000000000000000000002",
                "1-00000000000000000000000000000003",
                "1-00000000000000000000000000000001",
            ]
        );
    }
}
