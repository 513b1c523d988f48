use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use chroma_bedrock::error::BedrockError;
use chroma_bedrock::model::PaletteModel;
use chroma_bedrock::prompt::PromptMessage;
use chroma_core::models::history::{EntryId, HistoryEntry};
use chroma_core::models::palette::Palette;
use chroma_core::shard::ShardKey;
use chroma_lambda::generate::PaletteService;
use chroma_lambda::state::AppState;
use chroma_storage::error::StorageError;
use chroma_storage::history::{DEFAULT_HISTORY_LIMIT, HistoryStore, MemoryHistoryStore};

pub const CALM_OCEAN: &str = r##"{"name":"Calm Ocean Dawn","colors":["#0B3D91","#3A7CA5","#81C3D7","#F6D8AE","#FCEFEF"],"description":"Soft blues warming into the first light of morning."}"##;

/// A model that answers every request with the same payload and counts
/// how often it was called.
pub struct StubModel {
    payload: Result<Option<Value>, String>,
    pub calls: AtomicUsize,
}

impl StubModel {
    pub fn replying(payload: Value) -> Self {
        Self {
            payload: Ok(Some(payload)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn silent() -> Self {
        Self {
            payload: Ok(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            payload: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PaletteModel for StubModel {
    async fn complete(&self, _messages: &[PromptMessage]) -> Result<Option<Value>, BedrockError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payload.clone().map_err(BedrockError::Invocation)
    }
}

/// A store whose every operation fails with the given backend status.
pub struct UnavailableStore {
    pub status: u16,
}

#[async_trait]
impl HistoryStore for UnavailableStore {
    async fn append(&self, _shard: &ShardKey, _palette: Palette) -> Result<EntryId, StorageError> {
        Err(StorageError::PutObject {
            status: Some(self.status),
            message: "service unavailable".to_string(),
        })
    }

    async fn list(&self, _shard: &ShardKey, _limit: usize) -> Result<Vec<HistoryEntry>, StorageError> {
        Err(StorageError::ListObjects {
            status: Some(self.status),
            message: "service unavailable".to_string(),
        })
    }
}

pub fn build_app(model: Arc<dyn PaletteModel>, store: Arc<dyn HistoryStore>) -> Router {
    let state = AppState {
        palettes: PaletteService::new(model, store, DEFAULT_HISTORY_LIMIT),
    };
    chroma_lambda::app(state)
}

/// Send a request and return the status, headers, and raw body text.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn memory_store() -> Arc<MemoryHistoryStore> {
    Arc::new(MemoryHistoryStore::new())
}
