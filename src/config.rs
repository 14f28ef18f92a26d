//! Engine configuration
//!
//! Loaded from a JSON file. Every field is optional:
//!
//! ```json
//! { "table_prefix": "cot_", "dialect": "mysql" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ddl::Dialect;
use crate::observability::{log_event_with_fields, Event};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "ORM_CONFIG_IO",
            ConfigError::Parse(_) => "ORM_CONFIG_PARSE",
            ConfigError::Invalid(_) => "ORM_CONFIG_INVALID",
        }
    }
}

/// Deployment-wide engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrmConfig {
    /// Prepended to every schema table name to form the physical table name
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,

    /// SQL dialect for printed DDL; stores execute DDL in their own dialect
    #[serde(default)]
    pub dialect: Dialect,
}

fn default_table_prefix() -> String {
    String::new()
}

impl Default for OrmConfig {
    fn default() -> Self {
        Self {
            table_prefix: default_table_prefix(),
            dialect: Dialect::default(),
        }
    }
}

impl OrmConfig {
    /// Config with a table prefix and default dialect
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&content)?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("path", &path.display().to_string()),
                ("dialect", config.dialect.as_str()),
            ],
        );

        Ok(config)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: OrmConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The prefix must be usable as the start of an identifier
    pub fn validate(&self) -> ConfigResult<()> {
        let prefix = &self.table_prefix;
        if prefix.is_empty() {
            return Ok(());
        }

        let valid_start = prefix
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        let valid_rest = prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_start || !valid_rest {
            return Err(ConfigError::Invalid(format!(
                "table_prefix '{}' must be an identifier fragment",
                prefix
            )));
        }

        Ok(())
    }

    /// Physical table name for a declared table name
    pub fn table_name(&self, table: &str) -> String {
        format!("{}{}", self.table_prefix, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = OrmConfig::from_json("{}").unwrap();
        assert_eq!(config.table_prefix, "");
        assert_eq!(config.dialect, Dialect::MySql);
        assert_eq!(config, OrmConfig::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let config = OrmConfig::from_json(r#"{"table_prefix":"cot_","dialect":"sqlite"}"#).unwrap();
        assert_eq!(config.table_prefix, "cot_");
        assert_eq!(config.dialect, Dialect::Sqlite);
        assert_eq!(config.table_name("posts"), "cot_posts");
    }

    #[test]
    fn test_invalid_prefix() {
        let err = OrmConfig::from_json(r#"{"table_prefix":"bad-prefix"}"#).unwrap_err();
        assert_eq!(err.code(), "ORM_CONFIG_INVALID");

        let err = OrmConfig::from_json(r#"{"table_prefix":"9x"}"#).unwrap_err();
        assert_eq!(err.code(), "ORM_CONFIG_INVALID");
    }

    #[test]
    fn test_invalid_json() {
        let err = OrmConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.code(), "ORM_CONFIG_PARSE");
    }

    #[test]
    fn test_unknown_dialect_rejected() {
        assert!(OrmConfig::from_json(r#"{"dialect":"oracle"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"table_prefix":"app_"}}"#).unwrap();

        let config = OrmConfig::load(file.path()).unwrap();
        assert_eq!(config.table_prefix, "app_");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OrmConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.code(), "ORM_CONFIG_IO");
    }
}
