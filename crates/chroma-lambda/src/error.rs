use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use chroma_bedrock::error::{BedrockError, NormalizeError};
use chroma_storage::error::StorageError;

use crate::generate::GenerateError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    MissingInput,
    ModelInvocation(String),
    EmptyModelOutput,
    MalformedOutput { details: String, raw: String },
    MissingColors { received: serde_json::Value },
    EmptyColors,
    StoreUnavailable { status: StatusCode, details: String },
    InvalidQuery(String),
    NotFound,
    MethodNotAllowed,
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received: Option<serde_json::Value>,
}

impl ErrorBody {
    fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
            raw: None,
            received: None,
        }
    }

    fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingInput => (StatusCode::BAD_REQUEST, ErrorBody::new("Missing text input")),
            ApiError::ModelInvocation(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("AI generation failed").details(msg),
            ),
            ApiError::EmptyModelOutput => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Empty response from AI"),
            ),
            ApiError::MalformedOutput { details, raw } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    raw: Some(raw),
                    ..ErrorBody::new("Failed to parse AI response").details(details)
                },
            ),
            ApiError::MissingColors { received } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    received: Some(received),
                    ..ErrorBody::new("Invalid palette format")
                },
            ),
            ApiError::EmptyColors => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Invalid palette format").details("colors array is empty"),
            ),
            ApiError::StoreUnavailable { status, details } => (
                status,
                ErrorBody::new("History store unavailable").details(details),
            ),
            ApiError::InvalidQuery(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Invalid query").details(msg),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, ErrorBody::new("Not found")),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody::new("Method not allowed"),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<BedrockError> for ApiError {
    fn from(e: BedrockError) -> Self {
        ApiError::ModelInvocation(e.to_string())
    }
}

impl From<NormalizeError> for ApiError {
    fn from(e: NormalizeError) -> Self {
        match e {
            NormalizeError::EmptyModelOutput => ApiError::EmptyModelOutput,
            NormalizeError::MalformedOutput { message, preview } => ApiError::MalformedOutput {
                details: message,
                raw: preview,
            },
            NormalizeError::MissingColors { received } => ApiError::MissingColors { received },
            NormalizeError::EmptyColors => ApiError::EmptyColors,
        }
    }
}

impl From<GenerateError> for ApiError {
    fn from(e: GenerateError) -> Self {
        match e {
            GenerateError::MissingInput => ApiError::MissingInput,
            GenerateError::Model(e) => e.into(),
            GenerateError::Normalize(e) => e.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    /// Storage failures keep the backend's HTTP status when it reported an
    /// error status, and fall back to 503 otherwise.
    fn from(e: StorageError) -> Self {
        let status = e
            .status()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .filter(|code| code.is_client_error() || code.is_server_error())
            .unwrap_or(StatusCode::SERVICE_UNAVAILABLE);

        ApiError::StoreUnavailable {
            status,
            details: e.to_string(),
        }
    }
}
