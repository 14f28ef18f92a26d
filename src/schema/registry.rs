//! Schema of a record type
//!
//! A `Schema` is built once per record type, validated at build time, and
//! shared read-only by every instance of that type.

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::types::ColumnSpec;

/// Primary key name used when no column declares `primary_key`
pub const FALLBACK_PRIMARY_KEY: &str = "id";

/// Ordered column declarations plus the declared (unprefixed) table name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef")]
pub struct Schema {
    table: String,
    columns: Vec<ColumnSpec>,
}

/// Unvalidated wire form of a schema
#[derive(Debug, Deserialize)]
struct SchemaDef {
    table: String,
    columns: Vec<ColumnSpec>,
}

impl TryFrom<SchemaDef> for Schema {
    type Error = SchemaError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        def.columns
            .into_iter()
            .fold(Schema::builder(def.table), |b, c| b.column(c))
            .build()
    }
}

impl Schema {
    /// Start declaring a schema for `table`
    pub fn builder(table: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    /// Declared table name, without deployment prefix
    pub fn table(&self) -> &str {
        &self.table
    }

    /// All columns in declaration order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Filtered column view; locked and hidden columns are left out unless asked for
    pub fn column_view(&self, include_locked: bool, include_hidden: bool) -> Vec<&ColumnSpec> {
        self.columns
            .iter()
            .filter(|c| include_hidden || !c.hidden)
            .filter(|c| include_locked || !c.locked)
            .collect()
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether `name` is a declared column
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Primary key column name: first column flagged `primary_key`, else `id`
    pub fn primary_key(&self) -> &str {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .unwrap_or(FALLBACK_PRIMARY_KEY)
    }

    /// The auto-increment column, if any
    pub fn auto_increment_column(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.auto_increment)
    }

    /// Columns declaring a foreign key
    pub fn foreign_key_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.foreign_key.is_some())
    }
}

/// Builder enforcing schema invariants
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    table: String,
    columns: Vec<ColumnSpec>,
}

impl SchemaBuilder {
    /// Append a column
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Validate and freeze the schema
    pub fn build(self) -> SchemaResult<Schema> {
        let table = self.table.trim().to_string();
        if table.is_empty() {
            return Err(SchemaError::EmptyTableName);
        }
        if !is_identifier(&table) {
            return Err(SchemaError::InvalidIdentifier(table));
        }

        let mut auto_increment: Option<&str> = None;
        for (i, column) in self.columns.iter().enumerate() {
            if !is_identifier(&column.name) {
                return Err(SchemaError::InvalidIdentifier(column.name.clone()));
            }
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
            if let Some(fk) = &column.foreign_key {
                if !is_identifier(&fk.table) || !is_identifier(&fk.column) {
                    return Err(SchemaError::InvalidForeignKey(fk.to_string()));
                }
            }
            if column.auto_increment {
                if let Some(first) = auto_increment {
                    return Err(SchemaError::MultipleAutoIncrement {
                        first: first.to_string(),
                        second: column.name.clone(),
                    });
                }
                auto_increment = Some(column.name.as_str());
            }
        }

        Ok(Schema {
            table,
            columns: self.columns,
        })
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
