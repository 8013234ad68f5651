//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// MongoDB duplicate-key error code.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a bid for this (email, job) pair already exists")]
    DuplicateBid,

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid document id: {0}")]
    InvalidId(String),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),
}

impl StoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// True when the underlying driver error is a unique-index violation.
    pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        use mongodb::error::{ErrorKind, WriteFailure};
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == DUPLICATE_KEY_CODE,
            _ => false,
        }
    }

    /// Map a raw driver error, folding unique-index violations into
    /// [`StoreError::DuplicateBid`].
    pub fn from_write(err: mongodb::error::Error) -> Self {
        if Self::is_duplicate_key(&err) {
            StoreError::DuplicateBid
        } else {
            StoreError::Database(err)
        }
    }
}
