//! Remote service errors.

use std::io;
use thiserror::Error;

/// Error reported by a [`PhotoService`](super::PhotoService).
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("photo not found: {0}")]
    PhotoNotFound(String),

    #[error("collection already exists: {0}")]
    CollectionExists(String),

    /// Name the service cannot store (empty, `.`/`..`, or containing `/`).
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RemoteError::CollectionNotFound(_) | RemoteError::PhotoNotFound(_)
        )
    }
}

/// Remote result type.
pub type RemoteResult<T> = Result<T, RemoteError>;
