//! Schema declaration errors
//!
//! These are raised while a record type's schema is being built, never
//! while data flows through it.

use thiserror::Error;

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors in a schema declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Table name missing
    #[error("Schema table name must not be empty")]
    EmptyTableName,

    /// Table or column name is not a plain identifier
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Column declared twice
    #[error("Column '{0}' is declared more than once")]
    DuplicateColumn(String),

    /// More than one auto-increment column
    #[error("Columns '{first}' and '{second}' are both auto-increment")]
    MultipleAutoIncrement { first: String, second: String },

    /// Foreign key notation is not `table:column`
    #[error("Invalid foreign key '{0}', expected 'table:column'")]
    InvalidForeignKey(String),
}

impl SchemaError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::EmptyTableName => "ORM_SCHEMA_EMPTY_TABLE",
            SchemaError::InvalidIdentifier(_) => "ORM_SCHEMA_INVALID_IDENTIFIER",
            SchemaError::DuplicateColumn(_) => "ORM_SCHEMA_DUPLICATE_COLUMN",
            SchemaError::MultipleAutoIncrement { .. } => "ORM_SCHEMA_MULTIPLE_AUTO_INCREMENT",
            SchemaError::InvalidForeignKey(_) => "ORM_SCHEMA_INVALID_FOREIGN_KEY",
        }
    }
}
