//! Write outcomes

use std::fmt;

use serde_json::Value;

use crate::context::WriteAction;

/// Branch of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Insert,
    Update,
}

impl SaveAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveAction::Insert => "insert",
            SaveAction::Update => "update",
        }
    }

    /// Permission checked before this branch runs
    pub fn write_action(&self) -> WriteAction {
        match self {
            SaveAction::Insert => WriteAction::Insert,
            SaveAction::Update => WriteAction::Update,
        }
    }
}

impl fmt::Display for SaveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a save did nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The caller asked for one branch but the record resolved to the other
    ActionMismatch {
        requested: SaveAction,
        resolved: SaveAction,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ActionMismatch {
                requested,
                resolved,
            } => write!(f, "requested {} but record resolves to {}", requested, resolved),
        }
    }
}

/// Outcome of a save
#[derive(Debug, Clone, PartialEq)]
pub enum WriteResult {
    /// Row inserted; carries the record's primary key
    Inserted(Value),
    Updated,
    /// Nothing changed
    Rejected(RejectReason),
}

impl WriteResult {
    /// Whether the store was written
    pub fn is_written(&self) -> bool {
        !matches!(self, WriteResult::Rejected(_))
    }

    /// Primary key of an inserted row
    pub fn inserted_key(&self) -> Option<&Value> {
        match self {
            WriteResult::Inserted(pk) => Some(pk),
            _ => None,
        }
    }
}
