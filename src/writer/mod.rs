//! Write preparer and write orchestrator

mod orchestrator;
mod preparer;
mod result;

pub use orchestrator::{delete, insert, save, update};
pub use preparer::{prepare, WriteMode};
pub use result::{RejectReason, SaveAction, WriteResult};
