//! DDL generator
//!
//! CREATE and DROP TABLE statements derived from the same schema metadata
//! the engine validates against. No schema metadata is persisted besides
//! the generated DDL itself.

mod dialect;
mod generator;

pub use dialect::Dialect;
pub use generator::{create_table_statement, drop_table_statement};

use crate::context::OrmContext;
use crate::errors::{OrmError, OrmResult};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::Schema;

/// Create the schema's table through the context's store.
///
/// The statement is rendered in the store's dialect, not the configured one.
/// Safe to repeat: the statement is guarded with IF NOT EXISTS.
pub fn create_table(ctx: &OrmContext<'_>, schema: &Schema) -> OrmResult<()> {
    let table = ctx.table_name(schema);
    let sql = create_table_statement(schema, &table, ctx.store().dialect());
    run(ctx, &table, &sql)?;
    log_event_with_fields(Event::TableCreated, &[("table", &table)]);
    Ok(())
}

/// Drop the schema's table through the context's store
pub fn drop_table(ctx: &OrmContext<'_>, schema: &Schema) -> OrmResult<()> {
    let table = ctx.table_name(schema);
    run(ctx, &table, &drop_table_statement(&table))?;
    log_event_with_fields(Event::TableDropped, &[("table", &table)]);
    Ok(())
}

fn run(ctx: &OrmContext<'_>, table: &str, sql: &str) -> OrmResult<()> {
    ctx.store().execute(sql).map_err(|err| {
        log_event_with_fields(
            Event::StoreFailed,
            &[("table", table), ("error", &err.to_string())],
        );
        OrmError::Store(err)
    })
}
