use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid entry id: {0}")]
    InvalidEntryId(String),
}
