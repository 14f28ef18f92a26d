//! Write preparation
//!
//! Pure transform applied after validation: columns absent from the data
//! receive their declared `on_insert` or `on_update` value. `NOW()` in a
//! declared value resolves to the caller-supplied timestamp.

use crate::schema::Schema;
use crate::store::Row;

/// Which write-time defaults apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Insert,
    Update,
}

/// Inject write-time defaults for every column not present in `data`
pub fn prepare(schema: &Schema, mut data: Row, mode: WriteMode, now: i64) -> Row {
    for column in schema.columns() {
        if data.contains_key(&column.name) {
            continue;
        }

        let declared = match mode {
            WriteMode::Insert => column.on_insert.as_ref(),
            WriteMode::Update => column.on_update.as_ref(),
        };

        if let Some(default) = declared {
            data.insert(column.name.clone(), default.resolve(now));
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnSpec;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::builder("posts")
            .column(ColumnSpec::int("id").primary_key().auto_increment())
            .column(ColumnSpec::varchar("title", 100))
            .column(ColumnSpec::int("created").locked().on_insert("NOW()"))
            .column(ColumnSpec::int("modified").locked().on_insert("NOW()").on_update("NOW()"))
            .column(ColumnSpec::varchar("status", 10).on_insert("draft"))
            .column(ColumnSpec::varchar("note", 40).on_update("edited at NOW()"))
            .build()
            .unwrap()
    }

    fn row(value: serde_json::Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_insert_defaults() {
        let prepared = prepare(&schema(), row(json!({"title": "a"})), WriteMode::Insert, 1700000000);

        assert_eq!(prepared["title"], json!("a"));
        assert_eq!(prepared["created"], json!(1700000000));
        assert_eq!(prepared["modified"], json!(1700000000));
        assert_eq!(prepared["status"], json!("draft"));
        assert!(!prepared.contains_key("note"));
        assert!(!prepared.contains_key("id"));
    }

    #[test]
    fn test_update_defaults() {
        let prepared = prepare(&schema(), row(json!({"title": "b"})), WriteMode::Update, 42);

        assert_eq!(prepared["modified"], json!(42));
        assert_eq!(prepared["note"], json!("edited at 42"));
        assert!(!prepared.contains_key("created"));
        assert!(!prepared.contains_key("status"));
    }

    #[test]
    fn test_present_values_win() {
        let prepared = prepare(
            &schema(),
            row(json!({"status": "live"})),
            WriteMode::Insert,
            1,
        );
        assert_eq!(prepared["status"], json!("live"));
    }
}
