//! SQL dialects for generated DDL

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target dialect of CREATE TABLE text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL/MariaDB: `AUTO_INCREMENT`, inline `KEY`/`UNIQUE KEY`, utf8 table options
    #[default]
    MySql,
    /// SQLite: `AUTOINCREMENT` primary key, separate `CREATE INDEX` statements
    Sqlite,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(format!("unknown dialect '{}' (expected mysql or sqlite)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("mysql".parse::<Dialect>(), Ok(Dialect::MySql));
        assert_eq!("SQLite".parse::<Dialect>(), Ok(Dialect::Sqlite));
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Dialect::Sqlite).unwrap(), "\"sqlite\"");
        let d: Dialect = serde_json::from_str("\"mysql\"").unwrap();
        assert_eq!(d, Dialect::MySql);
    }
}
