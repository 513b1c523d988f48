//! The generate and history flows.
//!
//! [`PaletteService`] owns the model and the history store and runs one
//! request end to end: validate, prompt, invoke once, normalize, persist,
//! respond. Persistence is best-effort: a palette that was generated but
//! could not be saved is still returned.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use chroma_bedrock::error::{BedrockError, NormalizeError};
use chroma_bedrock::model::PaletteModel;
use chroma_bedrock::{normalize, prompt};
use chroma_core::models::history::{EntryId, HistoryEntry};
use chroma_core::models::palette::Palette;
use chroma_core::shard::ShardKey;
use chroma_storage::error::StorageError;
use chroma_storage::history::HistoryStore;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("missing text input")]
    MissingInput,

    #[error(transparent)]
    Model(#[from] BedrockError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[derive(Clone)]
pub struct PaletteService {
    model: Arc<dyn PaletteModel>,
    store: Arc<dyn HistoryStore>,
    history_limit: usize,
}

impl PaletteService {
    pub fn new(
        model: Arc<dyn PaletteModel>,
        store: Arc<dyn HistoryStore>,
        history_limit: usize,
    ) -> Self {
        Self {
            model,
            store,
            history_limit,
        }
    }

    /// Generate a palette for `text` and record it in the caller's history.
    ///
    /// The returned palette carries only `name`, `colors` and
    /// `description`; the stored copy also has the input text and a
    /// timestamp. Nothing is stored when generation or normalization fails.
    pub async fn generate(
        &self,
        text: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Palette, GenerateError> {
        let text = text
            .filter(|t| !t.trim().is_empty())
            .ok_or(GenerateError::MissingInput)?;

        let messages = prompt::palette_messages(text);
        let payload = self.model.complete(&messages).await?;

        let palette = normalize::normalize_completion(payload.as_ref()).inspect_err(|e| {
            warn!(error = %e, "model output could not be normalized");
        })?;

        let record = palette.clone().with_origin(text, jiff::Timestamp::now());
        let shard = ShardKey::for_user(user_id);
        self.persist(shard, record).await;

        Ok(palette)
    }

    /// Append to the history store on a task of its own.
    ///
    /// The spawned task is not tied to the request future, so the write
    /// finishes even if the caller goes away. It is still awaited here so a
    /// normal request only completes once the write has. Failures are
    /// logged and swallowed.
    async fn persist(&self, shard: ShardKey, record: Palette) -> Option<EntryId> {
        let store = Arc::clone(&self.store);
        let task_shard = shard.clone();
        let task = tokio::spawn(async move { store.append(&task_shard, record).await });

        match task.await {
            Ok(Ok(id)) => {
                info!(user_shard = %shard, entry_id = %id, "palette saved to history");
                Some(id)
            }
            Ok(Err(e)) => {
                warn!(user_shard = %shard, error = %e, "palette generated but not saved");
                None
            }
            Err(e) => {
                error!(user_shard = %shard, error = %e, "history write task failed");
                None
            }
        }
    }

    /// The caller's newest history entries, newest first.
    pub async fn history(&self, user_id: Option<&str>) -> Result<Vec<HistoryEntry>, StorageError> {
        let shard = ShardKey::for_user(user_id);
        self.store.list(&shard, self.history_limit).await
    }
}
