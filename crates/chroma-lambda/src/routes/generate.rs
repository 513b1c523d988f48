use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use chroma_core::models::palette::Palette;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub text: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// `POST /api/generate`
///
/// A body that is not a JSON object with a string `text` is treated as
/// missing input. The flow runs on its own task so a dropped connection
/// does not cancel the model call or the history write.
pub async fn generate_palette(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Palette>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable generate request body");
            GenerateRequest::default()
        }
    };

    let service = state.palettes.clone();
    let palette = tokio::spawn(async move {
        service
            .generate(request.text.as_deref(), request.user_id.as_deref())
            .await
    })
    .await
    .map_err(|e| ApiError::Internal(format!("generate task failed: {e}")))??;

    Ok(Json(palette))
}
