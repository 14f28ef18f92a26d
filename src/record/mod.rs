//! Records and record types

mod model;
mod record;

pub use model::Model;
pub use record::{is_empty_key, Record};
