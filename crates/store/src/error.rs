use thiserror::Error;

use crate::record::ValidationError;

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a record store gateway
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a failure status or could not be reached
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// HTTP transport error
    #[error("record store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a payload we could not understand
    #[error("invalid record store response: {0}")]
    Decode(String),

    /// The draft was rejected before any remote call
    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// True for every failure that callers surface as "store unavailable"
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, StoreError::Validation(_))
    }
}
