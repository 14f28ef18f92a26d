//! Candidate data validation
//!
//! Keys are checked in map order. For each key:
//! 1. it must be a declared column
//! 2. the column must not be locked or auto-increment
//! 3. the value must fit the declared length (Unicode code points)
//! 4. the value must match the declared type family
//! 5. a foreign-key value must exist in the referenced table
//!
//! Steps 1-4 are pure. Step 5 probes the store; if the referenced column
//! cannot be found the check is skipped with a warning.

use serde_json::Value;

use super::errors::{ValidationError, ValidationResult};
use crate::context::OrmContext;
use crate::errors::OrmResult;
use crate::observability::{log_event_with_fields, Event, Severity};
use crate::schema::{ColumnSpec, Schema, TypeFamily};
use crate::store::{quote_ident, Params, Row};

/// Validates candidate maps for one schema
pub struct Validator<'s, 'a> {
    schema: &'s Schema,
    ctx: &'s OrmContext<'a>,
}

impl<'s, 'a> Validator<'s, 'a> {
    pub fn new(schema: &'s Schema, ctx: &'s OrmContext<'a>) -> Self {
        Self { schema, ctx }
    }

    /// Validate every key of `candidate`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// `OrmError::Validation` for a rejected value, `OrmError::Store` if a
    /// foreign-key probe fails in the adapter.
    pub fn validate(&self, candidate: &Row) -> OrmResult<()> {
        for (key, value) in candidate {
            let column = match check_column(self.schema, key, value) {
                Ok(column) => column,
                Err(err) => return Err(self.reject(err).into()),
            };

            if let Err(err) = self.check_foreign_key(column, value)? {
                return Err(self.reject(err).into());
            }
        }

        Ok(())
    }

    /// Existence probe against the referenced table.
    ///
    /// Outer `Err` is a store failure; inner `Err` is a violation.
    fn check_foreign_key(
        &self,
        column: &ColumnSpec,
        value: &Value,
    ) -> OrmResult<ValidationResult<()>> {
        let fk = match &column.foreign_key {
            Some(fk) => fk,
            None => return Ok(Ok(())),
        };
        if value.is_null() {
            return Ok(Ok(()));
        }

        let store = self.ctx.store();
        let target_table = self.ctx.prefixed(&fk.table);

        if !store.column_exists(&target_table, &fk.column)? {
            self.ctx.sink().report(
                &format!(
                    "Foreign key target {}.{} not found; check skipped",
                    target_table, fk.column
                ),
                Severity::Warn,
                &column.name,
            );
            log_event_with_fields(
                Event::ForeignKeyUnresolved,
                &[
                    ("column", &column.name),
                    ("target", &format!("{}.{}", target_table, fk.column)),
                ],
            );
            return Ok(Ok(()));
        }

        let sql = format!(
            "SELECT {col} FROM {table} WHERE {col} = :value LIMIT 1",
            col = quote_ident(&fk.column),
            table = quote_ident(&target_table),
        );
        let mut params = Params::new();
        params.insert("value".to_string(), value.clone());

        let rows = store.query(&sql, &params)?;
        if rows.is_empty() {
            return Ok(Err(ValidationError::ForeignKeyViolation {
                column: column.name.clone(),
                table: target_table,
                target_column: fk.column.clone(),
                value: value.clone(),
            }));
        }

        Ok(Ok(()))
    }

    fn reject(&self, err: ValidationError) -> ValidationError {
        self.ctx
            .sink()
            .report(&err.to_string(), Severity::Error, err.column());
        log_event_with_fields(
            Event::ValidationFailed,
            &[
                ("table", self.schema.table()),
                ("column", err.column()),
                ("code", err.code()),
            ],
        );
        err
    }
}

/// Local checks for one key (declared, mutable, length, type).
///
/// Returns the column declaration on success.
pub fn check_column<'s>(
    schema: &'s Schema,
    key: &str,
    value: &Value,
) -> ValidationResult<&'s ColumnSpec> {
    let column = schema
        .column(key)
        .ok_or_else(|| ValidationError::UnknownColumn {
            column: key.to_string(),
        })?;

    if column.is_immutable() {
        return Err(ValidationError::ImmutableColumn {
            column: key.to_string(),
        });
    }

    if let Some(max) = column.length {
        if let Some(actual) = char_length(value) {
            if actual > max as usize {
                return Err(ValidationError::LengthExceeded {
                    column: key.to_string(),
                    max,
                    actual,
                });
            }
        }
    }

    check_type(column, value)?;

    Ok(column)
}

fn check_type(column: &ColumnSpec, value: &Value) -> ValidationResult<()> {
    let family = column.sql_type.family();
    if family == TypeFamily::Unchecked {
        return Ok(());
    }
    if value.is_null() && column.nullable {
        return Ok(());
    }

    let matches = match family {
        TypeFamily::Integer => value.is_i64() || value.is_u64(),
        TypeFamily::Text => value.is_string(),
        TypeFamily::Float => value.is_f64(),
        TypeFamily::Unchecked => true,
    };

    if matches {
        Ok(())
    } else {
        Err(ValidationError::TypeMismatch {
            column: column.name.clone(),
            expected: family.expected(),
            actual: json_type_name(value),
        })
    }
}

/// Character count of scalar values; `None` for everything else
fn char_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Number(n) => Some(n.to_string().chars().count()),
        _ => None,
    }
}

/// Returns the type name of a JSON value
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrmConfig;
    use crate::context::MemorySink;
    use crate::errors::OrmError;
    use crate::schema::SqlType;
    use crate::store::{SqliteStore, Store};
    use serde_json::json;

    fn posts() -> Schema {
        Schema::builder("posts")
            .column(ColumnSpec::int("id").primary_key().auto_increment())
            .column(ColumnSpec::varchar("name", 10))
            .column(ColumnSpec::int("views").nullable())
            .column(ColumnSpec::float("rating"))
            .column(ColumnSpec::new("published", SqlType::Date))
            .column(ColumnSpec::int("author").locked())
            .build()
            .unwrap()
    }

    fn row(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_unknown_column() {
        let err = check_column(&posts(), "nope", &json!(1)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownColumn {
                column: "nope".into()
            }
        );
    }

    #[test]
    fn test_immutable_columns() {
        let schema = posts();
        let err = check_column(&schema, "id", &json!(1)).unwrap_err();
        assert_eq!(err.code(), "ORM_IMMUTABLE_COLUMN");

        let err = check_column(&schema, "author", &json!(1)).unwrap_err();
        assert_eq!(err.column(), "author");
    }

    #[test]
    fn test_length_counts_code_points() {
        let schema = posts();
        assert!(check_column(&schema, "name", &json!("éééééééééé")).is_ok());

        let err = check_column(&schema, "name", &json!("abcdefghijk")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LengthExceeded {
                column: "name".into(),
                max: 10,
                actual: 11,
            }
        );
    }

    #[test]
    fn test_type_families() {
        let schema = posts();
        assert!(check_column(&schema, "views", &json!(3)).is_ok());
        assert!(check_column(&schema, "rating", &json!(4.5)).is_ok());
        assert!(check_column(&schema, "published", &json!("2024-01-01")).is_ok());
        assert!(check_column(&schema, "published", &json!(12)).is_ok());

        let err = check_column(&schema, "views", &json!("3")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                column: "views".into(),
                expected: "int",
                actual: "string",
            }
        );

        let err = check_column(&schema, "name", &json!(5)).unwrap_err();
        assert_eq!(err.code(), "ORM_TYPE_MISMATCH");

        let err = check_column(&schema, "rating", &json!(4)).unwrap_err();
        assert_eq!(err.code(), "ORM_TYPE_MISMATCH");
    }

    #[test]
    fn test_null_respects_nullable() {
        let schema = posts();
        assert!(check_column(&schema, "views", &Value::Null).is_ok());
        let err = check_column(&schema, "name", &Value::Null).unwrap_err();
        assert_eq!(err.code(), "ORM_TYPE_MISMATCH");
    }

    #[test]
    fn test_validate_short_circuits_and_reports() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = OrmConfig::default();
        let sink = MemorySink::new();
        let ctx = OrmContext::new(&store, &config, 0).with_sink(&sink);
        let schema = posts();

        let candidate = row(json!({"name": "abcdefghijkl", "nope": 1}));
        let err = Validator::new(&schema, &ctx).validate(&candidate).unwrap_err();

        match err {
            OrmError::Validation(ValidationError::LengthExceeded { column, .. }) => {
                assert_eq!(column, "name")
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.messages()[0].context, "name");
    }

    fn with_categories() -> (SqliteStore, Schema) {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute("CREATE TABLE categories (id INTEGER PRIMARY KEY, name TEXT)")
            .unwrap();
        store
            .execute("INSERT INTO categories (id, name) VALUES (1, 'news')")
            .unwrap();

        let schema = Schema::builder("posts")
            .column(ColumnSpec::int("id").primary_key().auto_increment())
            .column(ColumnSpec::int("category").foreign_key("categories", "id"))
            .build()
            .unwrap();
        (store, schema)
    }

    #[test]
    fn test_foreign_key_existing() {
        let (store, schema) = with_categories();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 0);

        let candidate = row(json!({"category": 1}));
        assert!(Validator::new(&schema, &ctx).validate(&candidate).is_ok());
    }

    #[test]
    fn test_foreign_key_violation() {
        let (store, schema) = with_categories();
        let config = OrmConfig::default();
        let ctx = OrmContext::new(&store, &config, 0);

        let candidate = row(json!({"category": 99}));
        let err = Validator::new(&schema, &ctx).validate(&candidate).unwrap_err();
        assert_eq!(err.code(), "ORM_FOREIGN_KEY_VIOLATION");
        assert_eq!(err.as_validation().map(|e| e.column()), Some("category"));
    }

    #[test]
    fn test_foreign_key_unresolved_is_skipped() {
        let (store, schema) = with_categories();
        // The prefix makes the target `x_categories`, which does not exist
        let config = OrmConfig::with_prefix("x_");
        let sink = MemorySink::new();
        let ctx = OrmContext::new(&store, &config, 0).with_sink(&sink);

        let candidate = row(json!({"category": 99}));
        assert!(Validator::new(&schema, &ctx).validate(&candidate).is_ok());

        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Warn);
        assert_eq!(messages[0].context, "category");
    }
}
