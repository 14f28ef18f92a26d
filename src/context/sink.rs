//! Message sink
//!
//! Validation and permission failures are reported through one
//! `report(message, severity, context)` call. Where the message surfaces
//! is the sink's business.

use std::sync::Mutex;

use crate::observability::{Event, Logger, Severity};

/// Destination for user-facing failure messages
pub trait MessageSink {
    fn report(&self, message: &str, severity: Severity, context: &str);
}

/// Sink that writes every message through the structured logger
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn report(&self, message: &str, severity: Severity, context: &str) {
        Logger::log(
            severity,
            Event::MessageReported.as_str(),
            &[("message", message), ("context", context)],
        );
    }
}

/// A reported message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message: String,
    pub severity: Severity,
    pub context: String,
}

/// Sink that keeps messages in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<Message>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages reported so far
    pub fn messages(&self) -> Vec<Message> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageSink for MemorySink {
    fn report(&self, message: &str, severity: Severity, context: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Message {
                message: message.to_string(),
                severity,
                context: context.to_string(),
            });
    }
}
