use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {message}")]
    GetObject { status: Option<u16>, message: String },

    #[error("S3 PutObject error: {message}")]
    PutObject { status: Option<u16>, message: String },

    #[error("S3 DeleteObject error: {message}")]
    DeleteObject { status: Option<u16>, message: String },

    #[error("S3 ListObjects error: {message}")]
    ListObjects { status: Option<u16>, message: String },
}

impl StorageError {
    /// HTTP status reported by the backend, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            StorageError::NotFound { .. } => Some(404),
            StorageError::GetObject { status, .. }
            | StorageError::PutObject { status, .. }
            | StorageError::DeleteObject { status, .. }
            | StorageError::ListObjects { status, .. } => *status,
            StorageError::Serialization(_) => None,
        }
    }
}
