use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use chroma_bedrock::model::BedrockPaletteModel;
use chroma_lambda::config::{ServiceConfig, StoreBackend};
use chroma_lambda::generate::PaletteService;
use chroma_lambda::state::AppState;
use chroma_storage::history::{HistoryStore, MemoryHistoryStore, S3HistoryStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServiceConfig::from_env()?;
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let store: Arc<dyn HistoryStore> = match config.store {
        StoreBackend::S3 => {
            let s3 = chroma_storage::client::build_client(&sdk_config, config.s3_endpoint.as_deref());
            Arc::new(S3HistoryStore::new(s3, config.bucket.clone()).with_retention(config.retention()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory history store; entries are lost on restart");
            Arc::new(MemoryHistoryStore::new().with_retention(config.retention()))
        }
    };

    let model = Arc::new(BedrockPaletteModel::from_config(&sdk_config, config.model_id.clone()));

    tracing::info!(
        model_id = %config.model_id,
        store = ?config.store,
        history_limit = config.history_limit,
        retention = ?config.retention_policy,
        "palette service configured"
    );

    let state = AppState {
        palettes: PaletteService::new(model, store, config.history_limit),
    };
    let app = chroma_lambda::app(state);

    match config.local_addr {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!("serving on http://{addr}");
            axum::serve(listener, app).await?;
            Ok(())
        }
        None => lambda_http::run(app).await.map_err(|e| eyre::eyre!(e)),
    }
}
