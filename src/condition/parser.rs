//! Filter condition parsing
//!
//! A free-text condition has the shape `<column><operator run><value>`,
//! where the operator run is one or more of `<`, `>`, `=` and space. The
//! first match wins. Anything that does not yield a column, a known
//! operator and a non-empty value parses to `None`: malformed text means
//! "no filter", never an error.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

static CONDITION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn condition_pattern() -> &'static Regex {
    CONDITION_PATTERN
        .get_or_init(|| Regex::new(r"(.+?)([<>= ]+)(.+)").expect("condition pattern compiles"))
}

/// Comparison operators accepted in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    /// SQL text of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }

    /// Parses an operator run; inner spacing is ignored (`"> ="` is `>=`)
    pub fn parse(run: &str) -> Option<Self> {
        let compact: String = run.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "=" => Some(Operator::Eq),
            "<>" => Some(Operator::Ne),
            "<" => Some(Operator::Lt),
            ">" => Some(Operator::Gt),
            "<=" => Some(Operator::Le),
            ">=" => Some(Operator::Ge),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `column operator value` predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Equality condition
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Operator::Eq, value)
    }

    /// Parse a free-text condition such as `"views >= 10"` or `"name = 'Ann'"`
    pub fn parse(expr: &str) -> Option<Self> {
        let caps = condition_pattern().captures(expr)?;

        let column = caps.get(1)?.as_str().trim();
        let operator_run = caps.get(2)?.as_str().trim();
        let raw_value = caps
            .get(3)?
            .as_str()
            .trim()
            .trim_matches(|c: char| matches!(c, '\'' | '"' | '`'));

        if column.is_empty() || operator_run.is_empty() || raw_value.is_empty() {
            return None;
        }
        if !is_column_reference(column) {
            return None;
        }

        let operator = Operator::parse(operator_run)?;
        Some(Self::new(column, operator, coerce_value(raw_value)))
    }

    /// Name the value is bound under
    pub fn param_name(&self) -> String {
        param_name(&self.column)
    }

    /// Whether the column can be placed in SQL text
    pub fn is_well_formed(&self) -> bool {
        is_column_reference(&self.column)
    }
}

/// Numeric-looking text becomes an integer; everything else stays a string.
///
/// Integral floats (`"5.0"`, `"1e3"`) count as numeric.
pub fn coerce_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            return Value::from(f as i64);
        }
    }
    Value::String(raw.to_string())
}

/// Bind-parameter name for a column; non-word characters become `_`
pub fn param_name(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// `ident` or `ident.ident`
fn is_column_reference(column: &str) -> bool {
    let parts: Vec<&str> = column.split('.').collect();
    parts.len() <= 2 && parts.iter().all(|p| crate::schema::is_identifier(p))
}

/// Condition as supplied by a caller: free text or already structured
#[derive(Debug, Clone, PartialEq)]
pub enum RawCondition {
    Text(String),
    Structured(Condition),
}

impl RawCondition {
    /// Resolve to a usable condition, or `None` if malformed
    pub fn resolve(&self) -> Option<Condition> {
        match self {
            RawCondition::Text(text) => Condition::parse(text),
            RawCondition::Structured(c) if c.is_well_formed() => Some(c.clone()),
            RawCondition::Structured(_) => None,
        }
    }
}

impl fmt::Display for RawCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCondition::Text(text) => f.write_str(text),
            RawCondition::Structured(c) => write!(f, "{} {} {}", c.column, c.operator, c.value),
        }
    }
}

impl From<&str> for RawCondition {
    fn from(s: &str) -> Self {
        RawCondition::Text(s.to_string())
    }
}

impl From<String> for RawCondition {
    fn from(s: String) -> Self {
        RawCondition::Text(s)
    }
}

impl From<Condition> for RawCondition {
    fn from(c: Condition) -> Self {
        RawCondition::Structured(c)
    }
}

/// One or many conditions, combined with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions(Vec<RawCondition>);

impl Conditions {
    /// No conditions
    pub fn none() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: impl Into<RawCondition>) -> Self {
        self.0.push(condition.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawCondition> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Conditions {
    fn from(s: &str) -> Self {
        Conditions(vec![s.into()])
    }
}

impl From<String> for Conditions {
    fn from(s: String) -> Self {
        Conditions(vec![s.into()])
    }
}

impl From<Condition> for Conditions {
    fn from(c: Condition) -> Self {
        Conditions(vec![c.into()])
    }
}

impl<T: Into<RawCondition>> From<Vec<T>> for Conditions {
    fn from(items: Vec<T>) -> Self {
        Conditions(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawCondition>, const N: usize> From<[T; N]> for Conditions {
    fn from(items: [T; N]) -> Self {
        Conditions(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawCondition> + Clone> From<&[T]> for Conditions {
    fn from(items: &[T]) -> Self {
        Conditions(items.iter().cloned().map(Into::into).collect())
    }
}
