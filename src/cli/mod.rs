//! CLI module for schemaorm
//!
//! Provides command-line access to DDL generation:
//! - create-table: print CREATE TABLE for a schema file
//! - drop-table: print DROP TABLE for a schema file
//! - apply: execute either against a SQLite database

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{apply, create_table, drop_table, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_schema, write_sql};

/// Parse arguments and run the selected command against stdout
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_command(cli.command, &mut out)
}
