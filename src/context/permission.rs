//! Permission gate
//!
//! Writes ask the gate before anything else happens. A denial aborts the
//! operation before validation runs.

use std::fmt;

/// Kind of write being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Insert,
    Update,
    Delete,
}

impl WriteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteAction::Insert => "insert",
            WriteAction::Update => "update",
            WriteAction::Delete => "delete",
        }
    }
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External authorization check for writes
pub trait PermissionGate {
    /// Whether `action` on the physical table `table` may proceed
    fn authorize(&self, action: WriteAction, table: &str) -> bool;
}

/// Gate that permits every write
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionGate for AllowAll {
    fn authorize(&self, _action: WriteAction, _table: &str) -> bool {
        true
    }
}

/// Gate that refuses every write
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl PermissionGate for DenyAll {
    fn authorize(&self, _action: WriteAction, _table: &str) -> bool {
        false
    }
}

impl<F> PermissionGate for F
where
    F: Fn(WriteAction, &str) -> bool,
{
    fn authorize(&self, action: WriteAction, table: &str) -> bool {
        self(action, table)
    }
}
