//! CLI argument definitions using clap
//!
//! Commands:
//! - schemaorm create-table --schema <path> [--config <path>] [--dialect <name>]
//! - schemaorm drop-table --schema <path> [--config <path>]
//! - schemaorm apply --schema <path> --database <path> [--config <path>] [--drop]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemaorm - generate and apply DDL for JSON-described schemas
#[derive(Parser, Debug)]
#[command(name = "schemaorm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the CREATE TABLE statement for a schema
    CreateTable {
        /// Path to the schema JSON file
        #[arg(long)]
        schema: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured dialect (mysql or sqlite)
        #[arg(long)]
        dialect: Option<String>,
    },

    /// Print the DROP TABLE statement for a schema
    DropTable {
        /// Path to the schema JSON file
        #[arg(long)]
        schema: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create (or drop) a schema's table in a SQLite database file
    Apply {
        /// Path to the schema JSON file
        #[arg(long)]
        schema: PathBuf,

        /// SQLite database file, created if missing
        #[arg(long)]
        database: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Drop the table instead of creating it
        #[arg(long)]
        drop: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_table() {
        let cli = Cli::try_parse_from([
            "schemaorm",
            "create-table",
            "--schema",
            "posts.json",
            "--dialect",
            "sqlite",
        ])
        .unwrap();

        match cli.command {
            Command::CreateTable {
                schema,
                config,
                dialect,
            } => {
                assert_eq!(schema, PathBuf::from("posts.json"));
                assert!(config.is_none());
                assert_eq!(dialect.as_deref(), Some("sqlite"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_apply_drop() {
        let cli = Cli::try_parse_from([
            "schemaorm",
            "apply",
            "--schema",
            "posts.json",
            "--database",
            "app.db",
            "--drop",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::Apply { drop: true, .. }));
    }

    #[test]
    fn test_schema_required() {
        assert!(Cli::try_parse_from(["schemaorm", "drop-table"]).is_err());
    }
}
