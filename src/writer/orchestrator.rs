//! Save, insert, update and delete
//!
//! `save` probes the primary key to pick a branch:
//! - key absent or empty: insert
//! - key present, no matching row: insert
//! - key present, row exists: update
//!
//! Each branch runs gate, then validator, then preparer, then the store.
//! A rejection at any step before the store leaves the store untouched.
//! The probe and the write are separate store calls; a concurrent delete
//! in between makes the update affect zero rows.

use std::sync::Arc;

use serde_json::Value;

use super::preparer::{prepare, WriteMode};
use super::result::{RejectReason, SaveAction, WriteResult};
use crate::condition::{compile, param_name, Conditions};
use crate::context::{OrmContext, WriteAction};
use crate::errors::{OrmError, OrmResult};
use crate::observability::{log_event_with_fields, Event};
use crate::query::exists_by_pk;
use crate::record::Record;
use crate::schema::Schema;
use crate::validator::Validator;
use crate::store::{quote_ident, Params, StoreError};

/// Insert or update `record`, optionally restricted to one branch.
///
/// A restricted save whose record resolves to the other branch does
/// nothing and returns `WriteResult::Rejected`.
pub fn save(
    ctx: &OrmContext<'_>,
    record: &mut Record,
    action: Option<SaveAction>,
) -> OrmResult<WriteResult> {
    let schema = Arc::clone(record.schema());
    let table = ctx.table_name(&schema);

    let exists = match record.primary_key_value() {
        Some(pk) => exists_by_pk(ctx, &schema, pk)?,
        None => false,
    };
    let resolved = if exists {
        SaveAction::Update
    } else {
        SaveAction::Insert
    };

    if let Some(requested) = action {
        if requested != resolved {
            log_event_with_fields(
                Event::SaveSkipped,
                &[
                    ("table", &table),
                    ("requested", requested.as_str()),
                    ("resolved", resolved.as_str()),
                ],
            );
            return Ok(WriteResult::Rejected(RejectReason::ActionMismatch {
                requested,
                resolved,
            }));
        }
    }

    ctx.authorize(resolved.write_action(), &table)?;

    match resolved {
        SaveAction::Insert => insert_row(ctx, &schema, &table, record),
        SaveAction::Update => update_row(ctx, &schema, &table, record),
    }
}

/// Save restricted to the insert branch; true if a row was inserted
pub fn insert(ctx: &OrmContext<'_>, record: &mut Record) -> OrmResult<bool> {
    Ok(save(ctx, record, Some(SaveAction::Insert))?.is_written())
}

/// Save restricted to the update branch; true if the update ran
pub fn update(ctx: &OrmContext<'_>, record: &mut Record) -> OrmResult<bool> {
    Ok(save(ctx, record, Some(SaveAction::Update))?.is_written())
}

/// Delete rows matching `conditions` and return the affected count.
///
/// Conditions that compile to nothing delete nothing.
pub fn delete(
    ctx: &OrmContext<'_>,
    schema: &Schema,
    conditions: impl Into<Conditions>,
) -> OrmResult<usize> {
    let table = ctx.table_name(schema);
    ctx.authorize(WriteAction::Delete, &table)?;

    let compiled = compile(conditions);
    if compiled.is_empty() {
        log_event_with_fields(Event::DeleteSkipped, &[("table", &table)]);
        return Ok(0);
    }

    let affected = ctx
        .store()
        .delete(&table, &compiled.body(), compiled.params())
        .map_err(|e| store_failed(&table, e))?;

    log_event_with_fields(
        Event::RecordDeleted,
        &[("table", &table), ("affected", &affected.to_string())],
    );
    Ok(affected)
}

fn insert_row(
    ctx: &OrmContext<'_>,
    schema: &Schema,
    table: &str,
    record: &mut Record,
) -> OrmResult<WriteResult> {
    let candidate = record.insert_candidate();
    Validator::new(schema, ctx).validate(&candidate)?;

    let prepared = prepare(schema, candidate, WriteMode::Insert, ctx.now());
    let generated = ctx
        .store()
        .insert(table, &prepared)
        .map_err(|e| store_failed(table, e))?;

    let pk_is_generated = schema
        .auto_increment_column()
        .is_some_and(|c| c.name == schema.primary_key());
    let pk = match record.primary_key_value() {
        Some(existing) if !pk_is_generated => existing.clone(),
        _ => Value::from(generated),
    };

    record.apply_written(prepared);
    record.set_primary_key_value(pk.clone());

    log_event_with_fields(
        Event::RecordInserted,
        &[("table", table), ("pk", &pk.to_string())],
    );
    Ok(WriteResult::Inserted(pk))
}

fn update_row(
    ctx: &OrmContext<'_>,
    schema: &Schema,
    table: &str,
    record: &mut Record,
) -> OrmResult<WriteResult> {
    let candidate = record.update_candidate();
    Validator::new(schema, ctx).validate(&candidate)?;

    let prepared = prepare(schema, candidate, WriteMode::Update, ctx.now());
    if prepared.is_empty() {
        return Ok(WriteResult::Updated);
    }

    let pk = schema.primary_key();
    let pk_value = record.primary_key_value().cloned().unwrap_or(Value::Null);
    let param = param_name(pk);
    let where_clause = format!("{} = :{}", quote_ident(pk), param);
    let mut where_params = Params::new();
    where_params.insert(param, pk_value.clone());

    let affected = ctx
        .store()
        .update(table, &prepared, &where_clause, &where_params)
        .map_err(|e| store_failed(table, e))?;

    record.apply_written(prepared);

    log_event_with_fields(
        Event::RecordUpdated,
        &[
            ("table", table),
            ("pk", &pk_value.to_string()),
            ("affected", &affected.to_string()),
        ],
    );
    Ok(WriteResult::Updated)
}

fn store_failed(table: &str, err: StoreError) -> OrmError {
    log_event_with_fields(
        Event::StoreFailed,
        &[("table", table), ("error", &err.to_string())],
    );
    OrmError::Store(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrmConfig;
    use crate::context::{DenyAll, MemorySink};
    use crate::schema::ColumnSpec;
    use crate::store::{SqliteStore, Store};
    use serde_json::json;

    fn posts() -> Arc<Schema> {
        Arc::new(
            Schema::builder("posts")
                .column(ColumnSpec::int("id").primary_key().auto_increment())
                .column(ColumnSpec::varchar("title", 20))
                .column(ColumnSpec::int("created").locked().nullable().on_insert("NOW()"))
                .column(ColumnSpec::int("modified").locked().nullable().on_update("NOW()"))
                .build()
                .unwrap(),
        )
    }

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute(
                "CREATE TABLE posts (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, created INTEGER, modified INTEGER)",
            )
            .unwrap();
        store
    }

    fn count(store: &SqliteStore) -> i64 {
        let rows = store
            .query("SELECT COUNT(*) AS n FROM posts", &Params::new())
            .unwrap();
        rows[0]["n"].as_i64().unwrap()
    }

    fn titled(schema: &Arc<Schema>, title: &str) -> Record {
        Record::with_data(
            Arc::clone(schema),
            json!({ "title": title }).as_object().unwrap().clone(),
        )
    }

    #[test]
    fn test_insert_sets_generated_key() {
        let store = store();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 1000);
        let schema = posts();

        let mut record = titled(&schema, "hello");
        let result = save(&ctx, &mut record, None).unwrap();

        assert_eq!(result, WriteResult::Inserted(json!(1)));
        assert_eq!(record.get("id"), Some(&json!(1)));
        assert_eq!(record.get("created"), Some(&json!(1000)));
        assert_eq!(record.changed_columns().count(), 0);
        assert_eq!(count(&store), 1);
    }

    #[test]
    fn test_update_existing_row() {
        let store = store();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 1000);
        let schema = posts();

        let mut record = titled(&schema, "hello");
        save(&ctx, &mut record, None).unwrap();

        let later = OrmContext::new(&store, &config, 2000);
        assert!(record.set("title", "changed"));
        let result = save(&later, &mut record, None).unwrap();

        assert_eq!(result, WriteResult::Updated);
        assert_eq!(count(&store), 1);

        let rows = store
            .query("SELECT title, created, modified FROM posts", &Params::new())
            .unwrap();
        assert_eq!(rows[0]["title"], json!("changed"));
        assert_eq!(rows[0]["created"], json!(1000));
        assert_eq!(rows[0]["modified"], json!(2000));
    }

    #[test]
    fn test_action_mismatch_is_noop() {
        let store = store();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 0);
        let schema = posts();

        let mut record = titled(&schema, "hello");
        assert!(!update(&ctx, &mut record).unwrap());
        assert_eq!(count(&store), 0);

        assert!(insert(&ctx, &mut record).unwrap());
        assert!(!insert(&ctx, &mut record).unwrap());
        assert_eq!(count(&store), 1);
    }

    #[test]
    fn test_validation_failure_writes_nothing() {
        let store = store();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 0);
        let schema = posts();

        let mut record = titled(&schema, "this title is far too long");
        let err = save(&ctx, &mut record, None).unwrap_err();

        assert_eq!(err.code(), "ORM_LENGTH_EXCEEDED");
        assert_eq!(count(&store), 0);
    }

    #[test]
    fn test_permission_denied_before_validation() {
        let store = store();
        let config = OrmConfig::default();
        let sink = MemorySink::new();
        let ctx = OrmContext::new(&store, &config, 0)
            .with_gate(&DenyAll)
            .with_sink(&sink);
        let schema = posts();

        let mut record = titled(&schema, "this title is far too long");
        let err = save(&ctx, &mut record, None).unwrap_err();

        assert_eq!(err.code(), "ORM_PERMISSION_DENIED");
        assert_eq!(sink.len(), 1);
        assert_eq!(count(&store), 0);
    }

    #[test]
    fn test_delete_by_condition() {
        let store = store();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 0);
        let schema = posts();

        for title in ["a", "b", "c"] {
            save(&ctx, &mut titled(&schema, title), None).unwrap();
        }

        assert_eq!(delete(&ctx, &schema, "id >= 2").unwrap(), 2);
        assert_eq!(count(&store), 1);
    }

    #[test]
    fn test_delete_without_usable_condition() {
        let store = store();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 0);
        let schema = posts();

        save(&ctx, &mut titled(&schema, "a"), None).unwrap();

        assert_eq!(delete(&ctx, &schema, "justcolumn").unwrap(), 0);
        assert_eq!(count(&store), 1);
    }

    #[test]
    fn test_store_failure_surfaces() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 0);

        let mut record = titled(&posts(), "a");
        let err = save(&ctx, &mut record, None).unwrap_err();
        assert_eq!(err.code(), "ORM_STORE_FAILURE");
    }
}
