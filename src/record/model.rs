//! Record types
//!
//! A concrete record type implements `Model` to declare its schema and to
//! act as its own factory. The engine builds `Record`s and hands them to
//! `Model::from_record`; nothing is resolved by name at runtime.
//!
//! ```ignore
//! use std::sync::{Arc, OnceLock};
//! use schemaorm::{ColumnSpec, Model, Record, Schema};
//!
//! struct Post(Record);
//!
//! static POSTS: OnceLock<Arc<Schema>> = OnceLock::new();
//!
//! impl Model for Post {
//!     fn schema() -> Arc<Schema> {
//!         POSTS
//!             .get_or_init(|| {
//!                 Arc::new(
//!                     Schema::builder("posts")
//!                         .column(ColumnSpec::int("id").primary_key().auto_increment())
//!                         .column(ColumnSpec::varchar("title", 100))
//!                         .build()
//!                         .expect("static schema"),
//!                 )
//!             })
//!             .clone()
//!     }
//!     fn from_record(record: Record) -> Self { Post(record) }
//!     fn record(&self) -> &Record { &self.0 }
//!     fn record_mut(&mut self) -> &mut Record { &mut self.0 }
//! }
//! ```

use std::sync::Arc;

use super::record::Record;
use crate::schema::Schema;
use crate::store::Row;

/// A record type backed by a schema
pub trait Model: Sized {
    /// Shared schema of this type
    fn schema() -> Arc<Schema>;

    /// Factory: wrap a record of this type
    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Empty instance
    fn create() -> Self {
        Self::from_record(Record::new(Self::schema()))
    }

    /// Instance from caller-supplied data
    fn with_data(data: Row) -> Self {
        Self::from_record(Record::with_data(Self::schema(), data))
    }
}
