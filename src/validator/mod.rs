//! Validator
//!
//! Checks a proposed column-to-value map against a schema before any
//! write reaches the store.

mod errors;
mod validator;

pub use errors::{ValidationError, ValidationResult};
pub use validator::{check_column, Validator};
