//! Column declarations
//!
//! A `ColumnSpec` is the strongly-typed description of one storage column:
//! its SQL type, constraints, key roles and the values injected at write
//! time. Every flag is explicit; an absent flag is `false`, never "unset".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::SchemaError;

/// Marker substituted with the caller-supplied current time
pub const NOW_MARKER: &str = "NOW()";

/// Declared SQL column type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SqlType {
    Int,
    Integer,
    TinyInt,
    SmallInt,
    MediumInt,
    BigInt,
    Char,
    VarChar,
    Text,
    Decimal,
    Float,
    Double,
    Date,
    DateTime,
    Timestamp,
    Blob,
    Bool,
    /// Any other type keyword, emitted verbatim (upper-cased) and never type-checked
    Other(String),
}

/// Value family a column type accepts on write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    /// Integer values only
    Integer,
    /// String values only
    Text,
    /// Floating-point values only
    Float,
    /// No type check
    Unchecked,
}

impl TypeFamily {
    /// Name used in type mismatch messages
    pub fn expected(&self) -> &'static str {
        match self {
            TypeFamily::Integer => "int",
            TypeFamily::Text => "string",
            TypeFamily::Float => "float",
            TypeFamily::Unchecked => "any",
        }
    }
}

impl SqlType {
    /// Lower-case type keyword
    pub fn keyword(&self) -> &str {
        match self {
            SqlType::Int => "int",
            SqlType::Integer => "integer",
            SqlType::TinyInt => "tinyint",
            SqlType::SmallInt => "smallint",
            SqlType::MediumInt => "mediumint",
            SqlType::BigInt => "bigint",
            SqlType::Char => "char",
            SqlType::VarChar => "varchar",
            SqlType::Text => "text",
            SqlType::Decimal => "decimal",
            SqlType::Float => "float",
            SqlType::Double => "double",
            SqlType::Date => "date",
            SqlType::DateTime => "datetime",
            SqlType::Timestamp => "timestamp",
            SqlType::Blob => "blob",
            SqlType::Bool => "bool",
            SqlType::Other(name) => name,
        }
    }

    /// Returns the value family checked on write
    pub fn family(&self) -> TypeFamily {
        match self {
            SqlType::Int
            | SqlType::Integer
            | SqlType::TinyInt
            | SqlType::SmallInt
            | SqlType::MediumInt
            | SqlType::BigInt => TypeFamily::Integer,
            SqlType::Char | SqlType::VarChar | SqlType::Text => TypeFamily::Text,
            SqlType::Decimal | SqlType::Float | SqlType::Double => TypeFamily::Float,
            _ => TypeFamily::Unchecked,
        }
    }
}

impl FromStr for SqlType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Ok(match lowered.as_str() {
            "int" => SqlType::Int,
            "integer" => SqlType::Integer,
            "tinyint" => SqlType::TinyInt,
            "smallint" => SqlType::SmallInt,
            "mediumint" => SqlType::MediumInt,
            "bigint" => SqlType::BigInt,
            "char" => SqlType::Char,
            "varchar" => SqlType::VarChar,
            "text" => SqlType::Text,
            "decimal" => SqlType::Decimal,
            "float" => SqlType::Float,
            "double" => SqlType::Double,
            "date" => SqlType::Date,
            "datetime" => SqlType::DateTime,
            "timestamp" => SqlType::Timestamp,
            "blob" => SqlType::Blob,
            "bool" | "boolean" => SqlType::Bool,
            _ => SqlType::Other(lowered),
        })
    }
}

impl From<String> for SqlType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<SqlType> for String {
    fn from(t: SqlType) -> Self {
        t.keyword().to_string()
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword().to_ascii_uppercase())
    }
}

/// Reference from a column to a column of another table.
///
/// The table name is the declared (unprefixed) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

impl ForeignKey {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl FromStr for ForeignKey {
    type Err = SchemaError;

    /// Parses the `table:column` notation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split(':').collect::<Vec<_>>().as_slice() {
            [table, column] if !table.trim().is_empty() && !column.trim().is_empty() => {
                Ok(ForeignKey::new(table.trim(), column.trim()))
            }
            _ => Err(SchemaError::InvalidForeignKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for ForeignKey {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ForeignKey> for String {
    fn from(fk: ForeignKey) -> Self {
        fk.to_string()
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table, self.column)
    }
}

/// Value injected into a write when the caller did not supply one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum WriteDefault {
    /// The caller-supplied current time, as an integer timestamp
    Now,
    /// A literal; string literals have every `NOW()` replaced by the timestamp text
    Literal(Value),
}

impl WriteDefault {
    /// Resolves the default against the current time
    pub fn resolve(&self, now: i64) -> Value {
        match self {
            WriteDefault::Now => Value::from(now),
            WriteDefault::Literal(Value::String(s)) if s.contains(NOW_MARKER) => {
                Value::String(s.replace(NOW_MARKER, &now.to_string()))
            }
            WriteDefault::Literal(v) => v.clone(),
        }
    }
}

impl From<Value> for WriteDefault {
    fn from(v: Value) -> Self {
        match v {
            Value::String(ref s) if s.trim() == NOW_MARKER => WriteDefault::Now,
            other => WriteDefault::Literal(other),
        }
    }
}

impl From<WriteDefault> for Value {
    fn from(d: WriteDefault) -> Self {
        match d {
            WriteDefault::Now => Value::String(NOW_MARKER.to_string()),
            WriteDefault::Literal(v) => v,
        }
    }
}

/// Declaration of a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: SqlType,
    /// Maximum length in characters; also emitted as the DDL type length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub auto_increment: bool,
    /// Writable only by the engine (write defaults), never by caller data
    #[serde(default)]
    pub locked: bool,
    /// Stored and fetched, but left out of outward data views
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_insert: Option<WriteDefault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<WriteDefault>,
    /// Raw column attributes such as `UNSIGNED`, emitted verbatim in DDL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<String>,
}

impl ColumnSpec {
    /// Create a column with every flag off
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            length: None,
            nullable: false,
            default_value: None,
            primary_key: false,
            auto_increment: false,
            locked: false,
            hidden: false,
            indexed: false,
            unique: false,
            foreign_key: None,
            on_insert: None,
            on_update: None,
            attributes: None,
        }
    }

    /// `INT` column
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, SqlType::Int)
    }

    /// `VARCHAR(length)` column
    pub fn varchar(name: impl Into<String>, length: u32) -> Self {
        Self::new(name, SqlType::VarChar).length(length)
    }

    /// `TEXT` column
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, SqlType::Text)
    }

    /// `FLOAT` column
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, SqlType::Float)
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn foreign_key(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey::new(table, column));
        self
    }

    pub fn on_insert(mut self, value: impl Into<Value>) -> Self {
        self.on_insert = Some(WriteDefault::from(value.into()));
        self
    }

    pub fn on_update(mut self, value: impl Into<Value>) -> Self {
        self.on_update = Some(WriteDefault::from(value.into()));
        self
    }

    pub fn attributes(mut self, attributes: impl Into<String>) -> Self {
        self.attributes = Some(attributes.into());
        self
    }

    /// Whether caller data may never set this column
    pub fn is_immutable(&self) -> bool {
        self.locked || self.auto_increment
    }
}
