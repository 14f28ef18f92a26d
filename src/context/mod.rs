//! Explicit collaborators for engine operations
//!
//! There is no ambient state: every operation receives an `OrmContext`
//! carrying the store handle, the permission gate, the message sink, the
//! configuration and the current time.

mod permission;
mod sink;

pub use permission::{AllowAll, DenyAll, PermissionGate, WriteAction};
pub use sink::{LogSink, MemorySink, Message, MessageSink};

use crate::config::OrmConfig;
use crate::errors::{OrmError, OrmResult};
use crate::observability::{log_event_with_fields, Event, Severity};
use crate::record::Model;
use crate::repository::Repository;
use crate::schema::Schema;
use crate::store::Store;

static ALLOW_ALL: AllowAll = AllowAll;
static LOG_SINK: LogSink = LogSink;

/// Collaborators for one caller's operations
#[derive(Clone, Copy)]
pub struct OrmContext<'a> {
    store: &'a dyn Store,
    gate: &'a dyn PermissionGate,
    sink: &'a dyn MessageSink,
    config: &'a OrmConfig,
    now: i64,
}

impl<'a> OrmContext<'a> {
    /// Context that allows every write and reports through the logger.
    ///
    /// `now` is the timestamp substituted for `NOW()` write defaults.
    pub fn new(store: &'a dyn Store, config: &'a OrmConfig, now: i64) -> Self {
        Self {
            store,
            gate: &ALLOW_ALL,
            sink: &LOG_SINK,
            config,
            now,
        }
    }

    pub fn with_gate(mut self, gate: &'a dyn PermissionGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn MessageSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn store(&self) -> &'a dyn Store {
        self.store
    }

    pub fn sink(&self) -> &'a dyn MessageSink {
        self.sink
    }

    pub fn config(&self) -> &'a OrmConfig {
        self.config
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    /// Physical table name of a schema
    pub fn table_name(&self, schema: &Schema) -> String {
        self.prefixed(schema.table())
    }

    /// Physical name of any declared table, e.g. a foreign-key target
    pub fn prefixed(&self, table: &str) -> String {
        self.config.table_name(table)
    }

    /// Ask the gate; a denial is reported and returned as an error
    pub fn authorize(&self, action: WriteAction, table: &str) -> OrmResult<()> {
        if self.gate.authorize(action, table) {
            return Ok(());
        }

        self.sink.report(
            &format!("Permission denied: {} on '{}'", action, table),
            Severity::Error,
            table,
        );
        log_event_with_fields(
            Event::PermissionDenied,
            &[("action", action.as_str()), ("table", table)],
        );

        Err(OrmError::PermissionDenied {
            action,
            table: table.to_string(),
        })
    }

    /// Typed facade over the engine for one record type
    pub fn repository<M: Model>(&self) -> Repository<'a, M> {
        Repository::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnSpec;
    use crate::store::SqliteStore;

    fn schema() -> Schema {
        Schema::builder("posts")
            .column(ColumnSpec::int("id").primary_key().auto_increment())
            .build()
            .unwrap()
    }

    #[test]
    fn test_table_name_uses_prefix() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = OrmConfig::with_prefix("cot_");
        let ctx = OrmContext::new(&store, &config, 0);

        assert_eq!(ctx.table_name(&schema()), "cot_posts");
        assert_eq!(ctx.prefixed("categories"), "cot_categories");
    }

    #[test]
    fn test_authorize_default_allows() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 0);

        assert!(ctx.authorize(WriteAction::Insert, "posts").is_ok());
    }

    #[test]
    fn test_authorize_denied_reports() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = OrmConfig::default();
        let sink = MemorySink::new();
        let ctx = OrmContext::new(&store, &config, 0)
            .with_gate(&DenyAll)
            .with_sink(&sink);

        let err = ctx.authorize(WriteAction::Update, "posts").unwrap_err();
        assert_eq!(err.code(), "ORM_PERMISSION_DENIED");

        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Error);
        assert_eq!(messages[0].context, "posts");
    }
}
