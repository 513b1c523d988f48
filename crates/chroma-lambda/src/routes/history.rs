use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use chroma_core::models::history::HistoryEntry;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// History as a JSON object of entry id → palette.
///
/// Keys are written in the order of the entries, newest first. A plain
/// `serde_json::Map` would re-sort them by id.
pub struct HistoryResponse(pub Vec<HistoryEntry>);

impl Serialize for HistoryResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.id, &entry.palette)?;
        }
        map.end()
    }
}

/// `GET /api/history?userId=...`
pub async fn list_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
    let entries = state.palettes.history(query.user_id.as_deref()).await?;
    Ok(Json(HistoryResponse(entries)))
}
