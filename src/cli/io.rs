//! File and stdout handling for the CLI
//!
//! Schema files are JSON objects:
//!
//! ```json
//! {
//!   "table": "posts",
//!   "columns": [
//!     { "name": "id", "type": "int", "primary_key": true, "auto_increment": true },
//!     { "name": "title", "type": "varchar", "length": 100 }
//!   ]
//! }
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use super::errors::{CliError, CliResult};
use crate::schema::Schema;

/// Read and validate a schema file
pub fn read_schema(path: &Path) -> CliResult<Schema> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::io_error(format!("Failed to read schema '{}': {}", path.display(), e))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::schema_error(format!("Invalid schema '{}': {}", path.display(), e)))
}

/// Write one SQL statement block followed by a newline
pub fn write_sql<W: Write>(out: &mut W, sql: &str) -> CliResult<()> {
    writeln!(out, "{}", sql)?;
    out.flush()?;
    Ok(())
}
