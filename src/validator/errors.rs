//! Validation errors
//!
//! Every variant names the offending column. Validation stops at the first
//! failing column, so exactly one error is reported per attempt.

use serde_json::Value;
use thiserror::Error;

/// Result type for column checks
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Candidate data rejected before any store mutation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Key is not a declared column
    #[error("Unknown column '{column}'")]
    UnknownColumn { column: String },

    /// Column is locked or auto-increment and cannot be supplied by callers
    #[error("Column '{column}' cannot be written")]
    ImmutableColumn { column: String },

    /// Value is longer than the declared length
    #[error("Column '{column}' allows at most {max} characters, got {actual}")]
    LengthExceeded {
        column: String,
        max: u32,
        actual: usize,
    },

    /// Value type does not match the declared type family
    #[error("Column '{column}' expects {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// No row in the referenced table carries the value
    #[error("Column '{column}' references {table}.{target_column} = {value}, which does not exist")]
    ForeignKeyViolation {
        column: String,
        table: String,
        target_column: String,
        value: Value,
    },
}

impl ValidationError {
    /// Column the error is about
    pub fn column(&self) -> &str {
        match self {
            ValidationError::UnknownColumn { column }
            | ValidationError::ImmutableColumn { column }
            | ValidationError::LengthExceeded { column, .. }
            | ValidationError::TypeMismatch { column, .. }
            | ValidationError::ForeignKeyViolation { column, .. } => column,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::UnknownColumn { .. } => "ORM_UNKNOWN_COLUMN",
            ValidationError::ImmutableColumn { .. } => "ORM_IMMUTABLE_COLUMN",
            ValidationError::LengthExceeded { .. } => "ORM_LENGTH_EXCEEDED",
            ValidationError::TypeMismatch { .. } => "ORM_TYPE_MISMATCH",
            ValidationError::ForeignKeyViolation { .. } => "ORM_FOREIGN_KEY_VIOLATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_variant_names_column() {
        let errors = vec![
            ValidationError::UnknownColumn { column: "a".into() },
            ValidationError::ImmutableColumn { column: "a".into() },
            ValidationError::LengthExceeded {
                column: "a".into(),
                max: 3,
                actual: 4,
            },
            ValidationError::TypeMismatch {
                column: "a".into(),
                expected: "int",
                actual: "string",
            },
            ValidationError::ForeignKeyViolation {
                column: "a".into(),
                table: "t".into(),
                target_column: "id".into(),
                value: json!(9),
            },
        ];

        for err in errors {
            assert_eq!(err.column(), "a");
            assert!(err.to_string().contains("'a'"));
            assert!(err.code().starts_with("ORM_"));
        }
    }
}
