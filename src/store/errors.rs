//! Store adapter errors
//!
//! Adapter failures are surfaced to callers as-is: never retried and never
//! translated into validation errors.

use thiserror::Error;

/// Result type for store adapter calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a store adapter
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite driver error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Any other adapter-reported failure
    #[error("Store failure: {0}")]
    Failure(String),
}

impl StoreError {
    /// Create a generic failure
    pub fn failure(msg: impl Into<String>) -> Self {
        Self::Failure(msg.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        "ORM_STORE_FAILURE"
    }
}
