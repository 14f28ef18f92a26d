//! schemaorm - a schema-driven object-relational mapping layer
//!
//! A record type declares its table schema once and gets condition
//! compilation, validation, insert-vs-update persistence, fetching and
//! DDL generation from it. The engine is synchronous and works over one
//! caller-supplied store handle.

pub mod cli;
pub mod condition;
pub mod config;
pub mod context;
pub mod ddl;
pub mod errors;
pub mod observability;
pub mod query;
pub mod record;
pub mod repository;
pub mod schema;
pub mod store;
pub mod validator;
pub mod writer;

pub use condition::{compile, Condition, Conditions, Operator};
pub use config::OrmConfig;
pub use context::{MessageSink, OrmContext, PermissionGate, WriteAction};
pub use ddl::Dialect;
pub use errors::{OrmError, OrmResult};
pub use query::{FetchOptions, OrderDirection};
pub use record::{Model, Record};
pub use repository::Repository;
pub use schema::{ColumnSpec, Schema, SqlType};
pub use store::{Row, SqliteStore, Store};
pub use validator::ValidationError;
pub use writer::{SaveAction, WriteResult};
