//! CREATE/DROP TABLE generation
//!
//! Column text is the upper-cased type keyword with its optional length,
//! then the nullability, default and auto-increment clauses. Key clauses
//! are collected separately and follow the column list. Both statements
//! are guarded with IF [NOT] EXISTS.

use serde_json::Value;

use super::dialect::Dialect;
use crate::schema::{ColumnSpec, Schema};
use crate::store::quote_ident;

/// CREATE TABLE text for `schema` under the physical name `table`.
///
/// For SQLite, index statements follow the table, separated by `;`.
pub fn create_table_statement(schema: &Schema, table: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::MySql => mysql_create(schema, table),
        Dialect::Sqlite => sqlite_create(schema, table),
    }
}

/// DROP TABLE text for the physical name `table`
pub fn drop_table_statement(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

fn mysql_create(schema: &Schema, table: &str) -> String {
    let mut definitions = Vec::new();
    let mut keys = Vec::new();
    let mut primary = Vec::new();

    for column in schema.column_view(true, true) {
        let mut props = Vec::new();
        if let Some(attributes) = &column.attributes {
            props.push(attributes.clone());
        }
        props.push(nullability(column).to_string());
        if let Some(default) = &column.default_value {
            props.push(format!("DEFAULT {}", default_literal(default)));
        }
        if column.auto_increment {
            props.push("AUTO_INCREMENT".to_string());
        }

        definitions.push(format!(
            "{} {} {}",
            quote_ident(&column.name),
            type_text(column),
            props.join(" ")
        ));

        let name = quote_ident(&column.name);
        if column.primary_key {
            primary.push(name.clone());
        }
        if column.indexed {
            keys.push(format!(
                "KEY {} ({})",
                quote_ident(&format!("i_{}", column.name)),
                name
            ));
        }
        if column.unique {
            keys.push(format!(
                "UNIQUE KEY {} ({})",
                quote_ident(&format!("u_{}", column.name)),
                name
            ));
        }
    }

    if !primary.is_empty() {
        definitions.push(format!("PRIMARY KEY ({})", primary.join(", ")));
    }
    definitions.extend(keys);

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({}) DEFAULT CHARSET=utf8 COLLATE=utf8_unicode_ci",
        quote_ident(table),
        definitions.join(", ")
    )
}

fn sqlite_create(schema: &Schema, table: &str) -> String {
    let mut definitions = Vec::new();
    let mut constraints = Vec::new();
    let mut indexes = Vec::new();
    let mut primary = Vec::new();

    for column in schema.column_view(true, true) {
        let name = quote_ident(&column.name);

        // SQLite only generates keys for an INTEGER PRIMARY KEY column
        if column.auto_increment && column.primary_key {
            definitions.push(format!(
                "{} INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT",
                name
            ));
        } else {
            let mut text = format!("{} {} {}", name, type_text(column), nullability(column));
            if let Some(default) = &column.default_value {
                text.push_str(&format!(" DEFAULT {}", default_literal(default)));
            }
            definitions.push(text);

            if column.primary_key {
                primary.push(name.clone());
            }
        }

        if column.unique {
            constraints.push(format!("UNIQUE ({})", name));
        }
        if column.indexed {
            indexes.push(format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quote_ident(&format!("i_{}_{}", table, column.name)),
                quote_ident(table),
                name
            ));
        }
    }

    if !primary.is_empty() {
        definitions.push(format!("PRIMARY KEY ({})", primary.join(", ")));
    }
    definitions.extend(constraints);

    let mut statements = vec![format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(table),
        definitions.join(", ")
    )];
    statements.extend(indexes);
    statements.join(";\n")
}

fn type_text(column: &ColumnSpec) -> String {
    let keyword = column.sql_type.keyword().to_uppercase();
    match column.length {
        Some(length) => format!("{}({})", keyword, length),
        None => keyword,
    }
}

fn nullability(column: &ColumnSpec) -> &'static str {
    if column.nullable {
        "NULL"
    } else {
        "NOT NULL"
    }
}

/// Single-quoted literal with embedded quotes doubled
fn default_literal(value: &Value) -> String {
    let text = match value {
        Value::Null => return "NULL".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        other => other.to_string(),
    };
    format!("'{}'", text.replace('\'', "''"))
}
