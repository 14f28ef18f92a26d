//! Observable engine events
//!
//! Events are explicit and typed; the string form is what lands in the
//! `event` field of a log line.

use std::fmt;

/// Observable events emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,

    // Reads
    /// SELECT executed through the store adapter
    QueryExecuted,
    /// A filter condition was malformed and left out of the WHERE clause
    ConditionDropped,
    /// Order column was not an identifier and ordering was skipped
    OrderDropped,

    // Writes
    /// Row inserted
    RecordInserted,
    /// Row updated
    RecordUpdated,
    /// Rows deleted
    RecordDeleted,
    /// Save skipped because the resolved branch did not match the requested one
    SaveSkipped,
    /// Delete skipped because no usable condition remained
    DeleteSkipped,

    // Rejections
    /// Candidate data failed validation
    ValidationFailed,
    /// Permission gate denied a write
    PermissionDenied,
    /// Foreign key target could not be resolved; check skipped
    ForeignKeyUnresolved,
    /// Store adapter reported a failure
    StoreFailed,
    /// Message handed to the logging message sink
    MessageReported,

    // DDL
    /// CREATE TABLE executed
    TableCreated,
    /// DROP TABLE executed
    TableDropped,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::ConditionDropped => "CONDITION_DROPPED",
            Event::OrderDropped => "ORDER_DROPPED",

            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::SaveSkipped => "SAVE_SKIPPED",
            Event::DeleteSkipped => "DELETE_SKIPPED",

            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::PermissionDenied => "PERMISSION_DENIED",
            Event::ForeignKeyUnresolved => "FOREIGN_KEY_UNRESOLVED",
            Event::StoreFailed => "STORE_FAILED",
            Event::MessageReported => "MESSAGE_REPORTED",

            Event::TableCreated => "TABLE_CREATED",
            Event::TableDropped => "TABLE_DROPPED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> super::Severity {
        use super::Severity;
        match self {
            Event::ConditionDropped | Event::OrderDropped => Severity::Trace,
            Event::SaveSkipped | Event::DeleteSkipped | Event::ForeignKeyUnresolved => {
                Severity::Warn
            }
            Event::ValidationFailed | Event::PermissionDenied => Severity::Warn,
            Event::StoreFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
