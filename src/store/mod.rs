//! Store adapter boundary
//!
//! The engine never executes SQL itself. Every statement, and every bound
//! parameter, goes through a `Store`. Calls are blocking; timeouts and
//! cancellation belong to the adapter.

mod errors;
mod sqlite;

pub use errors::{StoreError, StoreResult};
pub use sqlite::SqliteStore;

use serde_json::{Map, Value};

use crate::ddl::Dialect;

/// One row: column label to value, in result order
pub type Row = Map<String, Value>;

/// Named parameters: name (without the leading `:`) to value
pub type Params = Map<String, Value>;

/// Narrow interface to a relational store over one connection
pub trait Store {
    /// Run a SELECT with named parameters and collect every row
    fn query(&self, sql: &str, params: &Params) -> StoreResult<Vec<Row>>;

    /// Insert one row and return the generated key
    fn insert(&self, table: &str, row: &Row) -> StoreResult<i64>;

    /// Update rows matching `where_clause` (body only, no `WHERE`); returns affected count
    fn update(
        &self,
        table: &str,
        row: &Row,
        where_clause: &str,
        where_params: &Params,
    ) -> StoreResult<usize>;

    /// Delete rows matching `where_clause` (body only, no `WHERE`); returns affected count
    fn delete(&self, table: &str, where_clause: &str, where_params: &Params)
        -> StoreResult<usize>;

    /// Execute one or more statements without parameters (DDL)
    fn execute(&self, sql: &str) -> StoreResult<()>;

    /// Whether `table` exists and has a column named `column`
    fn column_exists(&self, table: &str, column: &str) -> StoreResult<bool>;

    /// SQL dialect this store executes
    fn dialect(&self) -> Dialect;
}

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote `table`.`column`
pub fn quote_qualified(table: &str, column: &str) -> String {
    format!("{}.{}", quote_ident(table), quote_ident(column))
}
