//! Query/fetch engine
//!
//! Assembles SELECT statements (foreign-key joins, ordering, pagination)
//! and materializes result rows into records. An empty result is absence,
//! not an error.

mod fetch;
mod options;

pub use fetch::{exists_by_pk, find, find_all, find_by_pk, load, select_statement};
pub use options::{FetchOptions, OrderDirection};
