//! SELECT assembly and row materialization
//!
//! Every declared column is selected, hidden ones included; hiding is
//! applied by `Record::data`. Each foreign-key column adds an inner join
//! against its target table, aliased `fk_<column>`, and the joined value is
//! labeled `<column>.<target_column>`.

use std::sync::Arc;

use serde_json::Value;

use super::options::FetchOptions;
use crate::condition::{compile_qualified, param_name, Condition, Conditions};
use crate::context::OrmContext;
use crate::errors::{OrmError, OrmResult};
use crate::observability::{log_event_with_fields, Event};
use crate::record::{is_empty_key, Record};
use crate::schema::Schema;
use crate::store::{quote_ident, quote_qualified, Params, Row};

/// Fetch records matching `conditions`.
///
/// Returns `None` when nothing matched.
pub fn find(
    ctx: &OrmContext<'_>,
    schema: &Arc<Schema>,
    conditions: impl Into<Conditions>,
    options: &FetchOptions,
) -> OrmResult<Option<Vec<Record>>> {
    let table = ctx.table_name(schema);
    let (sql, params) = select_statement(ctx, schema, &table, conditions.into(), options);

    let rows = run_query(ctx, &table, &sql, &params)?;
    if rows.is_empty() {
        return Ok(None);
    }

    let records = rows
        .into_iter()
        .map(|row| materialize(schema, row))
        .collect();
    Ok(Some(records))
}

/// Fetch every record
pub fn find_all(
    ctx: &OrmContext<'_>,
    schema: &Arc<Schema>,
    options: &FetchOptions,
) -> OrmResult<Option<Vec<Record>>> {
    find(ctx, schema, Conditions::none(), options)
}

/// Fetch the record whose primary key equals `value`
pub fn find_by_pk(
    ctx: &OrmContext<'_>,
    schema: &Arc<Schema>,
    value: impl Into<Value>,
) -> OrmResult<Option<Record>> {
    let condition = Condition::eq(schema.primary_key(), value);
    let found = find(ctx, schema, condition, &FetchOptions::new().limit(1))?;
    Ok(found.and_then(|records| records.into_iter().next()))
}

/// Reload a record from the store by its primary key.
///
/// Returns false, leaving the record untouched, if it has no key or the
/// row is gone.
pub fn load(ctx: &OrmContext<'_>, record: &mut Record) -> OrmResult<bool> {
    let pk = match record.primary_key_value() {
        Some(pk) => pk.clone(),
        None => return Ok(false),
    };

    let schema = Arc::clone(record.schema());
    match find_by_pk(ctx, &schema, pk)? {
        Some(fresh) => {
            record.reload(fresh);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Primary-key probe: does a row with this key exist?
///
/// Joins are not applied. Empty keys never exist.
pub fn exists_by_pk(ctx: &OrmContext<'_>, schema: &Schema, value: &Value) -> OrmResult<bool> {
    if is_empty_key(value) {
        return Ok(false);
    }

    let table = ctx.table_name(schema);
    let pk = schema.primary_key();
    let param = param_name(pk);
    let sql = format!(
        "SELECT {pk} FROM {table} WHERE {pk} = :{param} LIMIT 1",
        pk = quote_ident(pk),
        table = quote_ident(&table),
        param = param,
    );

    let mut params = Params::new();
    params.insert(param, value.clone());

    let rows = run_query(ctx, &table, &sql, &params)?;
    Ok(!rows.is_empty())
}

/// Build the SELECT for a fetch
pub fn select_statement(
    ctx: &OrmContext<'_>,
    schema: &Schema,
    table: &str,
    conditions: Conditions,
    options: &FetchOptions,
) -> (String, Params) {
    let mut fields: Vec<String> = schema
        .columns()
        .iter()
        .map(|c| format!("{} AS {}", quote_qualified(table, &c.name), quote_ident(&c.name)))
        .collect();
    let mut joins = Vec::new();

    for column in schema.foreign_key_columns() {
        let Some(fk) = &column.foreign_key else {
            continue;
        };
        let alias = format!("fk_{}", column.name);
        fields.push(format!(
            "{} AS {}",
            quote_qualified(&alias, &fk.column),
            quote_ident(&format!("{}.{}", column.name, fk.column))
        ));
        joins.push(format!(
            "INNER JOIN {} AS {} ON {} = {}",
            quote_ident(&ctx.prefixed(&fk.table)),
            quote_ident(&alias),
            quote_qualified(table, &column.name),
            quote_qualified(&alias, &fk.column)
        ));
    }

    let compiled = compile_qualified(conditions, |column| column_reference(schema, table, column));

    let mut sql = format!("SELECT {} FROM {}", fields.join(", "), quote_ident(table));
    for join in &joins {
        sql.push(' ');
        sql.push_str(join);
    }

    let clause = compiled.clause();
    if !clause.is_empty() {
        sql.push(' ');
        sql.push_str(&clause);
    }

    if let Some(order) = order_clause(schema, table, options) {
        sql.push(' ');
        sql.push_str(&order);
    }

    let limit = options.limit_clause();
    if !limit.is_empty() {
        sql.push(' ');
        sql.push_str(&limit);
    }

    let (_, params) = compiled.into_parts();
    (sql, params)
}

fn order_clause(schema: &Schema, table: &str, options: &FetchOptions) -> Option<String> {
    let (column, direction) = options.order.as_ref()?;

    let Some(target) = column_reference(schema, table, column) else {
        log_event_with_fields(Event::OrderDropped, &[("column", column)]);
        return None;
    };

    Some(format!("ORDER BY {} {}", target, direction))
}

/// Render a column reference against the joined SELECT.
///
/// Declared columns and `<table>.<column>` qualify with the table;
/// `<fk column>.<target>` reads from that column's join alias, the same
/// label `Record::related` uses. Other dotted references resolve to `None`.
fn column_reference(schema: &Schema, table: &str, column: &str) -> Option<String> {
    if schema.contains(column) {
        return Some(quote_qualified(table, column));
    }

    let Some((prefix, target)) = column.split_once('.') else {
        return crate::schema::is_identifier(column).then(|| column.to_string());
    };
    if !crate::schema::is_identifier(prefix) || !crate::schema::is_identifier(target) {
        return None;
    }

    if schema.column(prefix).and_then(|c| c.foreign_key.as_ref()).is_some() {
        return Some(quote_qualified(&format!("fk_{}", prefix), target));
    }
    if prefix == table && schema.contains(target) {
        return Some(quote_qualified(table, target));
    }
    None
}

fn run_query(
    ctx: &OrmContext<'_>,
    table: &str,
    sql: &str,
    params: &Params,
) -> OrmResult<Vec<Row>> {
    match ctx.store().query(sql, params) {
        Ok(rows) => {
            log_event_with_fields(
                Event::QueryExecuted,
                &[("table", table), ("rows", &rows.len().to_string())],
            );
            Ok(rows)
        }
        Err(err) => {
            log_event_with_fields(
                Event::StoreFailed,
                &[("table", table), ("error", &err.to_string())],
            );
            Err(OrmError::Store(err))
        }
    }
}

/// Split a result row into declared columns and joined values
fn materialize(schema: &Arc<Schema>, row: Row) -> Record {
    let mut data = Row::new();
    let mut related = Row::new();

    for (label, value) in row {
        if schema.contains(&label) {
            data.insert(label, value);
        } else {
            related.insert(label, value);
        }
    }

    Record::from_store(Arc::clone(schema), data, related)
}
