//! Record instances
//!
//! A `Record` owns its data map exclusively and shares its `Schema` with
//! every other record of the same type. It is not safe for concurrent
//! mutation; callers hold it exclusively while handling it.

use std::sync::Arc;

use serde_json::Value;

use crate::schema::Schema;
use crate::store::Row;

/// One row of a record type
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    data: Row,
    /// Values fetched from joined foreign-key tables, keyed `column.target_column`
    related: Row,
    /// Columns supplied by the caller since the last load or write, in order
    changed: Vec<String>,
}

impl Record {
    /// Empty record
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            data: Row::new(),
            related: Row::new(),
            changed: Vec::new(),
        }
    }

    /// Record from caller-supplied data; every key counts as caller-supplied.
    ///
    /// Keys are not checked here: undeclared or locked keys are rejected
    /// when the record is saved.
    pub fn with_data(schema: Arc<Schema>, data: Row) -> Self {
        let changed = data.keys().cloned().collect();
        Self {
            schema,
            data,
            related: Row::new(),
            changed,
        }
    }

    /// Record materialized from the store; nothing counts as changed
    pub(crate) fn from_store(schema: Arc<Schema>, data: Row, related: Row) -> Self {
        Self {
            schema,
            data,
            related,
            changed: Vec::new(),
        }
    }

    /// Shared schema of this record type
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Value of a declared, non-hidden column
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.schema.column(key) {
            Some(column) if !column.hidden => self.data.get(key),
            _ => None,
        }
    }

    /// Set a declared, unlocked column. Returns false and leaves the record
    /// untouched otherwise.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> bool {
        match self.schema.column(key) {
            Some(column) if !column.locked => {
                self.data.insert(key.to_string(), value.into());
                if !self.changed.iter().any(|c| c == key) {
                    self.changed.push(key.to_string());
                }
                true
            }
            _ => false,
        }
    }

    /// Outward view: every non-hidden declared column, `null` when unset
    pub fn data(&self) -> Row {
        self.schema
            .columns()
            .iter()
            .filter(|c| !c.hidden)
            .map(|c| {
                let value = self.data.get(&c.name).cloned().unwrap_or(Value::Null);
                (c.name.clone(), value)
            })
            .collect()
    }

    /// Every stored value, hidden columns included
    pub fn raw(&self) -> &Row {
        &self.data
    }

    /// Values fetched through foreign-key joins
    pub fn related(&self) -> &Row {
        &self.related
    }

    /// Columns supplied by the caller since the last load or write
    pub fn changed_columns(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(String::as_str)
    }

    /// Primary key value, if present and not empty
    pub fn primary_key_value(&self) -> Option<&Value> {
        self.data
            .get(self.schema.primary_key())
            .filter(|v| !is_empty_key(v))
    }

    /// Candidate map for an insert: all data, minus an empty primary key
    pub(crate) fn insert_candidate(&self) -> Row {
        let pk = self.schema.primary_key();
        self.data
            .iter()
            .filter(|(k, v)| !(k.as_str() == pk && is_empty_key(v)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Candidate map for an update: caller-supplied columns, minus the primary key
    pub(crate) fn update_candidate(&self) -> Row {
        let pk = self.schema.primary_key();
        self.changed
            .iter()
            .filter(|k| k.as_str() != pk)
            .filter_map(|k| self.data.get(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }

    /// Fold written values back in and clear the change set
    pub(crate) fn apply_written(&mut self, written: Row) {
        for (k, v) in written {
            self.data.insert(k, v);
        }
        self.changed.clear();
    }

    pub(crate) fn set_primary_key_value(&mut self, value: Value) {
        let pk = self.schema.primary_key().to_string();
        self.data.insert(pk, value);
    }

    /// Replace all data with a fresh copy from the store
    pub(crate) fn reload(&mut self, fresh: Record) {
        self.data = fresh.data;
        self.related = fresh.related;
        self.changed.clear();
    }
}

/// Absent-key test used by the insert-vs-update decision: null, `""` and `0`
pub fn is_empty_key(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_i64() == Some(0),
        _ => false,
    }
}
