//! CLI command implementations
//!
//! `create-table` and `drop-table` only print DDL. `apply` runs it against
//! a SQLite database file through the bundled store adapter, in the store's
//! dialect; the configured dialect only affects printed DDL.

use std::io::Write;
use std::path::Path;

use crate::config::OrmConfig;
use crate::context::OrmContext;
use crate::ddl::{self, Dialect};
use crate::store::SqliteStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_schema, write_sql};

/// Dispatch a parsed command, writing statements to `out`
pub fn run_command<W: Write>(command: Command, out: &mut W) -> CliResult<()> {
    match command {
        Command::CreateTable {
            schema,
            config,
            dialect,
        } => create_table(&schema, config.as_deref(), dialect.as_deref(), out),
        Command::DropTable { schema, config } => drop_table(&schema, config.as_deref(), out),
        Command::Apply {
            schema,
            database,
            config,
            drop,
        } => apply(&schema, &database, config.as_deref(), drop, out),
    }
}

/// Print CREATE TABLE for a schema file
pub fn create_table<W: Write>(
    schema_path: &Path,
    config_path: Option<&Path>,
    dialect: Option<&str>,
    out: &mut W,
) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(name) = dialect {
        config.dialect = name.parse::<Dialect>().map_err(CliError::config_error)?;
    }

    let schema = read_schema(schema_path)?;
    let table = config.table_name(schema.table());
    write_sql(out, &ddl::create_table_statement(&schema, &table, config.dialect))
}

/// Print DROP TABLE for a schema file
pub fn drop_table<W: Write>(
    schema_path: &Path,
    config_path: Option<&Path>,
    out: &mut W,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let schema = read_schema(schema_path)?;
    write_sql(out, &ddl::drop_table_statement(&config.table_name(schema.table())))
}

/// Execute CREATE (or DROP) TABLE against a SQLite database file
pub fn apply<W: Write>(
    schema_path: &Path,
    database: &Path,
    config_path: Option<&Path>,
    drop: bool,
    out: &mut W,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let schema = read_schema(schema_path)?;
    let store = SqliteStore::open(database)?;
    let ctx = OrmContext::new(&store, &config, chrono::Utc::now().timestamp());
    let table = ctx.table_name(&schema);

    if drop {
        ddl::drop_table(&ctx, &schema)?;
        write_sql(out, &format!("dropped {}", table))
    } else {
        ddl::create_table(&ctx, &schema)?;
        write_sql(out, &format!("created {}", table))
    }
}

fn load_config(path: Option<&Path>) -> CliResult<OrmConfig> {
    match path {
        Some(path) => Ok(OrmConfig::load(path)?),
        None => Ok(OrmConfig::default()),
    }
}
