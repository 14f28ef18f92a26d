//! Crate-level error type
//!
//! Subsystem errors pass through unchanged; `code()` preserves the
//! originating subsystem's code.

use thiserror::Error;

use crate::context::WriteAction;
use crate::schema::SchemaError;
use crate::store::StoreError;
use crate::validator::ValidationError;

/// Result type for engine operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Failure of an engine operation
#[derive(Debug, Error)]
pub enum OrmError {
    /// Candidate data failed validation; nothing was written
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Permission gate refused the write; nothing was validated or written
    #[error("Permission denied: {action} on '{table}'")]
    PermissionDenied { action: WriteAction, table: String },

    /// Store adapter failure, surfaced as-is
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl OrmError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            OrmError::Validation(e) => e.code(),
            OrmError::PermissionDenied { .. } => "ORM_PERMISSION_DENIED",
            OrmError::Store(e) => e.code(),
            OrmError::Schema(e) => e.code(),
        }
    }

    /// The validation error, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            OrmError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
