//! Connection configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::transpiler::Dialect;

/// Environment variable overriding `database_url`.
pub const DATABASE_URL_ENV: &str = "SQLWEAVE_DATABASE_URL";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Prefix prepended to every `{table}` placeholder at execution time
    #[serde(default)]
    pub table_prefix: String,

    /// SQL dialect; derived from the URL scheme when absent
    #[serde(default)]
    pub dialect: Option<Dialect>,

    /// Pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            table_prefix: String::new(),
            dialect: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default location: `<config dir>/sqlweave/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sqlweave").join("config.toml"))
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> QueryResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    /// The environment override is applied last.
    pub fn load(path: Option<&Path>) -> QueryResult<Self> {
        let config = match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_toml(&std::fs::read_to_string(&path)?)?,
                _ => Self::default(),
            },
        };
        Ok(config.with_env_override(std::env::var(DATABASE_URL_ENV).ok()))
    }

    fn with_env_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.database_url = url;
        }
        self
    }

    /// The configured dialect, or the one implied by the URL scheme.
    pub fn resolved_dialect(&self) -> Dialect {
        self.dialect
            .unwrap_or_else(|| Dialect::from_url(&self.database_url))
    }

    pub fn validate(&self) -> QueryResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(QueryError::Config("database_url is empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(QueryError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database URL
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    /// Set the table prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.table_prefix = prefix.into();
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = Some(dialect);
        self
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.config.max_connections = n;
        self
    }

    /// Build the configuration
    pub fn build(self) -> QueryResult<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_defaults() {
        let config = Config::from_toml(r#"database_url = "postgres://localhost/moodle""#).unwrap();
        assert_eq!(config.table_prefix, "");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.resolved_dialect(), Dialect::Postgres);
    }

    #[test]
    fn test_from_toml_full() {
        let config = Config::from_toml(
            r#"
            database_url = "mysql://root@localhost/moodle"
            table_prefix = "mdl_"
            dialect = "generic"
            max_connections = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.table_prefix, "mdl_");
        assert_eq!(config.resolved_dialect(), Dialect::Generic);
    }

    #[test]
    fn test_bad_toml() {
        let err = Config::from_toml("database_url = ").unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }

    #[test]
    fn test_env_override() {
        let config = Config::default().with_env_override(Some("sqlite://x.db".into()));
        assert_eq!(config.database_url, "sqlite://x.db");
        let config = Config::default().with_env_override(Some("  ".into()));
        assert_eq!(config.database_url, "sqlite::memory:");
    }

    #[test]
    fn test_builder_validates() {
        let config = Config::builder().database("sqlite::memory:").prefix("mdl_").build().unwrap();
        assert_eq!(config.table_prefix, "mdl_");
        assert!(Config::builder().max_connections(0).build().is_err());
    }
}
