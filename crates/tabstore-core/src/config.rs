//! Store configuration, usually read from `tabstore.yml`.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of rows per bulk insert statement.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Table store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Database schema holding the managed tables (DuckDB `main` when unset)
    #[serde(default)]
    pub schema: Option<String>,

    /// Prefix prepended to every logical table name
    #[serde(default)]
    pub prefix: String,

    /// Maximum rows per `INSERT` statement
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Wrap each write in its own transaction
    #[serde(default)]
    pub atomic_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            schema: None,
            prefix: String::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            atomic_writes: false,
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl StoreConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> CoreResult<Self> {
        let config: StoreConfig =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.batch_size == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "batch_size must be at least 1".to_string(),
            });
        }
        if matches!(self.schema.as_deref(), Some("")) {
            return Err(CoreError::ConfigInvalid {
                message: "schema cannot be empty; omit it to use the default schema".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
