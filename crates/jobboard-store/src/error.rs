//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True if the caller supplied bad input rather than the store failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::InvalidId(_) | StoreError::InvalidDocument(_))
    }
}

impl From<jobboard_models::IdError> for StoreError {
    fn from(err: jobboard_models::IdError) -> Self {
        StoreError::InvalidId(err.0)
    }
}
