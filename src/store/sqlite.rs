//! SQLite store adapter
//!
//! Binds named parameters (`:name`) and maps SQLite values to JSON values:
//! integers, reals, text and NULL map directly; blobs are base64 text.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, ToSql};
use serde_json::{Number, Value};

use super::errors::StoreResult;
use crate::ddl::Dialect;
use super::{quote_ident, Params, Row, Store};

/// Store adapter over a single SQLite connection
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    fn run(&self, sql: &str, params: &[(String, SqlValue)]) -> StoreResult<usize> {
        let bound = borrow_params(params);
        Ok(self.conn.execute(sql, bound.as_slice())?)
    }
}

impl Store for SqliteStore {
    fn query(&self, sql: &str, params: &Params) -> StoreResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql.trim())?;
        let labels: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let named = named_params(params.iter());
        let bound = borrow_params(&named);
        let mut rows = stmt.query(bound.as_slice())?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = Row::new();
            for (i, label) in labels.iter().enumerate() {
                map.insert(label.clone(), from_sql(row.get_ref(i)?));
            }
            out.push(map);
        }
        Ok(out)
    }

    fn insert(&self, table: &str, row: &Row) -> StoreResult<i64> {
        let sql = if row.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table))
        } else {
            let columns: Vec<String> = row.keys().map(|k| quote_ident(k)).collect();
            let slots: Vec<String> = (0..row.len()).map(|i| format!(":v{}", i)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(table),
                columns.join(", "),
                slots.join(", ")
            )
        };

        let params: Vec<(String, SqlValue)> = row
            .values()
            .enumerate()
            .map(|(i, v)| (format!(":v{}", i), to_sql(v)))
            .collect();
        self.run(&sql, &params)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(
        &self,
        table: &str,
        row: &Row,
        where_clause: &str,
        where_params: &Params,
    ) -> StoreResult<usize> {
        // SET slots use a reserved prefix so they never collide with WHERE names
        let assignments: Vec<String> = row
            .keys()
            .enumerate()
            .map(|(i, k)| format!("{} = :__set{}", quote_ident(k), i))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            quote_ident(table),
            assignments.join(", "),
            where_clause
        );

        let mut params: Vec<(String, SqlValue)> = row
            .values()
            .enumerate()
            .map(|(i, v)| (format!(":__set{}", i), to_sql(v)))
            .collect();
        params.extend(named_params(where_params.iter()));
        self.run(&sql, &params)
    }

    fn delete(
        &self,
        table: &str,
        where_clause: &str,
        where_params: &Params,
    ) -> StoreResult<usize> {
        let sql = format!("DELETE FROM {} WHERE {}", quote_ident(table), where_clause);
        self.run(&sql, &named_params(where_params.iter()))
    }

    fn execute(&self, sql: &str) -> StoreResult<()> {
        Ok(self.conn.execute_batch(sql)?)
    }

    fn column_exists(&self, table: &str, column: &str) -> StoreResult<bool> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
        let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
        for name in names {
            if name? == column {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }
}

fn named_params<'a>(params: impl Iterator<Item = (&'a String, &'a Value)>) -> Vec<(String, SqlValue)> {
    params
        .map(|(name, value)| (format!(":{}", name), to_sql(value)))
        .collect()
}

fn borrow_params(params: &[(String, SqlValue)]) -> Vec<(&str, &dyn ToSql)> {
    params
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}

/// JSON value to SQLite value
fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// SQLite value to JSON value
fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(STANDARD.encode(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with_table() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute(
                "CREATE TABLE `items` (`id` INTEGER PRIMARY KEY AUTOINCREMENT, `name` TEXT, `price` REAL)",
            )
            .unwrap();
        store
    }

    fn row(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_insert_returns_generated_key() {
        let store = store_with_table();
        let first = store.insert("items", &row(json!({"name": "a"}))).unwrap();
        let second = store.insert("items", &row(json!({"name": "b"}))).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_query_named_params_and_types() {
        let store = store_with_table();
        store
            .insert("items", &row(json!({"name": "pen", "price": 1.5})))
            .unwrap();

        let mut params = Params::new();
        params.insert("name".into(), json!("pen"));
        let rows = store
            .query("SELECT * FROM `items` WHERE `name` = :name", &params)
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!(1));
        assert_eq!(rows[0]["name"], json!("pen"));
        assert_eq!(rows[0]["price"], json!(1.5));
    }

    #[test]
    fn test_update_and_delete_counts() {
        let store = store_with_table();
        store.insert("items", &row(json!({"name": "a"}))).unwrap();
        store.insert("items", &row(json!({"name": "b"}))).unwrap();

        let mut params = Params::new();
        params.insert("id".into(), json!(2));
        let updated = store
            .update("items", &row(json!({"name": "z"})), "`id` = :id", &params)
            .unwrap();
        assert_eq!(updated, 1);

        let rows = store.query("SELECT `name` FROM `items` WHERE `id` = :id", &params).unwrap();
        assert_eq!(rows[0]["name"], json!("z"));

        let deleted = store.delete("items", "`id` = :id", &params).unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.delete("items", "`id` = :id", &params).unwrap(), 0);
    }

    #[test]
    fn test_insert_default_values() {
        let store = store_with_table();
        let id = store.insert("items", &Row::new()).unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_column_exists() {
        let store = store_with_table();
        assert!(store.column_exists("items", "name").unwrap());
        assert!(!store.column_exists("items", "nope").unwrap());
        assert!(!store.column_exists("missing_table", "id").unwrap());
    }

    #[test]
    fn test_blob_as_base64() {
        let store = SqliteStore::open_in_memory().unwrap();
        let rows = store.query("SELECT x'00ff' AS b", &Params::new()).unwrap();
        assert_eq!(rows[0]["b"], json!("AP8="));
    }

    #[test]
    fn test_failure_surfaces() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.query("SELECT * FROM nowhere", &Params::new()).unwrap_err();
        assert_eq!(err.code(), "ORM_STORE_FAILURE");
    }
}
