//! Schema registry
//!
//! Static declaration of a record type's columns and their rules. Nothing
//! here does I/O; every other subsystem reads a `Schema` and none mutates it.
//!
//! # Invariants
//!
//! - At most one auto-increment column
//! - Exactly one primary key name (first flagged column, else `id`)
//! - Column and table names are plain identifiers
//! - Immutable once built

mod errors;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use registry::{is_identifier, Schema, SchemaBuilder, FALLBACK_PRIMARY_KEY};
pub use types::{ColumnSpec, ForeignKey, SqlType, TypeFamily, WriteDefault, NOW_MARKER};
