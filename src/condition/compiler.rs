//! WHERE clause compilation
//!
//! Conditions are AND-ed together; each value is bound under its column's
//! parameter name. Two conditions on the same column share one parameter,
//! so the later value wins.

use super::parser::Conditions;
use crate::observability::{log_event_with_fields, Event};
use crate::store::Params;

/// Compiled WHERE clause plus its bound parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledWhere {
    predicates: Vec<String>,
    params: Params,
}

impl CompiledWhere {
    /// `WHERE p1 AND p2 ...`, or empty when nothing survived
    pub fn clause(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.body())
        }
    }

    /// Predicates without the `WHERE` keyword
    pub fn body(&self) -> String {
        self.predicates.join(" AND ")
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// `(clause, params)`
    pub fn into_parts(self) -> (String, Params) {
        (self.clause(), self.params)
    }
}

/// Compile conditions with columns rendered as written
pub fn compile(conditions: impl Into<Conditions>) -> CompiledWhere {
    compile_qualified(conditions, |column| Some(column.to_string()))
}

/// Compile conditions, rendering each column through `qualify`.
///
/// A condition whose column `qualify` cannot render is dropped like any
/// malformed condition.
pub fn compile_qualified<F>(conditions: impl Into<Conditions>, qualify: F) -> CompiledWhere
where
    F: Fn(&str) -> Option<String>,
{
    let conditions = conditions.into();
    let mut compiled = CompiledWhere::default();

    for raw in conditions.iter() {
        let condition = match raw.resolve() {
            Some(c) => c,
            None => {
                log_event_with_fields(Event::ConditionDropped, &[("condition", &raw.to_string())]);
                continue;
            }
        };

        let Some(column) = qualify(&condition.column) else {
            log_event_with_fields(Event::ConditionDropped, &[("condition", &raw.to_string())]);
            continue;
        };

        let param = condition.param_name();
        compiled
            .predicates
            .push(format!("{} {} :{}", column, condition.operator, param));
        compiled.params.insert(param, condition.value);
    }

    compiled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use serde_json::json;

    #[test]
    fn test_single_condition() {
        let (clause, params) = compile("col > 5").into_parts();
        assert_eq!(clause, "WHERE col > :col");
        assert_eq!(params["col"], json!(5));
        assert!(params["col"].is_i64());
    }

    #[test]
    fn test_malformed_yields_nothing() {
        let (clause, params) = compile("justcolumn").into_parts();
        assert_eq!(clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_multiple_and() {
        let compiled = compile(vec!["a = 1", "bogus", "b <= 'x'"]);
        assert_eq!(compiled.clause(), "WHERE a = :a AND b <= :b");
        assert_eq!(compiled.params().len(), 2);
        assert_eq!(compiled.params()["b"], json!("x"));
    }

    #[test]
    fn test_same_column_last_value_wins() {
        let compiled = compile(vec!["n > 1", "n < 9"]);
        assert_eq!(compiled.clause(), "WHERE n > :n AND n < :n");
        assert_eq!(compiled.params().len(), 1);
        assert_eq!(compiled.params()["n"], json!(9));
    }

    #[test]
    fn test_qualified() {
        let compiled = compile_qualified(Condition::eq("id", 3), |c| Some(format!("`t`.`{}`", c)));
        assert_eq!(compiled.body(), "`t`.`id` = :id");
    }

    #[test]
    fn test_unqualifiable_column_dropped() {
        let compiled = compile_qualified(vec!["a = 1", "x.b = 2"], |c| {
            (!c.contains('.')).then(|| c.to_string())
        });
        assert_eq!(compiled.clause(), "WHERE a = :a");
        assert!(!compiled.params().contains_key("x_b"));
    }

    #[test]
    fn test_empty_input() {
        let compiled = compile(Vec::<String>::new());
        assert!(compiled.is_empty());
        assert_eq!(compiled.clause(), "");
    }
}
