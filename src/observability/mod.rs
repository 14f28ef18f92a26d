//! Observability for the ORM engine
//!
//! Structured JSON logging and typed lifecycle events. Logging is
//! read-only: it never changes the outcome of an operation.
//!
//! ```ignore
//! use schemaorm::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RecordInserted, &[("table", "cot_posts"), ("pk", "7")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity, LOG_LEVEL_ENV};

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event_with_fields(Event::TableCreated, &[("table", "cot_posts")]);
    }
}
