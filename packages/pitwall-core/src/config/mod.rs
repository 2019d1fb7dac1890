//! Runtime configuration
//!
//! Loaded from a versioned YAML file, then adjusted by environment
//! variables:
//!
//! | variable | overrides |
//! |---|---|
//! | `PITWALL_ENV` | `environment` |
//! | `PITWALL_STORE_BACKEND` | `store.backend` |
//! | `PITWALL_STORE_PATH` | `store.path` |
//! | `PITWALL_LOG` | `logging.filter` |
//!
//! ```yaml
//! version: 1
//! environment: production
//! store:
//!   backend: sqlite
//!   path: /var/lib/pitwall/pitwall.db
//! logging:
//!   filter: pitwall_core=debug,info
//! ```

pub mod error;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use pitwall_storage::{CollectionStore, InMemoryCollectionStore, SqliteCollectionStore};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use error::{ConfigError, ConfigResult};

pub const SUPPORTED_VERSIONS: &[u32] = &[1];

pub const ENV_ENVIRONMENT: &str = "PITWALL_ENV";
pub const ENV_STORE_BACKEND: &str = "PITWALL_STORE_BACKEND";
pub const ENV_STORE_PATH: &str = "PITWALL_STORE_PATH";
pub const ENV_LOG: &str = "PITWALL_LOG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue {
                field: "environment".to_string(),
                value: s.to_string(),
                expected: "development, production".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "sqlite" => Ok(StoreBackend::Sqlite),
            _ => Err(ConfigError::InvalidValue {
                field: "store.backend".to_string(),
                value: s.to_string(),
                expected: "memory, sqlite".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Database file; required for `sqlite`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PitwallConfig {
    /// Schema version; 0 means the field was missing
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for PitwallConfig {
    fn default() -> Self {
        Self {
            version: 1,
            environment: Environment::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PitwallConfig {
    /// Parse and validate a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: PitwallConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// File (or defaults when `path` is `None`) plus environment overrides
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (variable name → value), then revalidate
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        if let Some(value) = lookup(ENV_ENVIRONMENT) {
            self.environment = value.parse()?;
        }
        if let Some(value) = lookup(ENV_STORE_BACKEND) {
            self.store.backend = value.parse()?;
        }
        if let Some(value) = lookup(ENV_STORE_PATH) {
            self.store.path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup(ENV_LOG) {
            self.logging.filter = value;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.version == 0 {
            return Err(ConfigError::MissingVersion);
        }
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }
        if self.store.backend == StoreBackend::Sqlite && self.store.path.is_none() {
            return Err(ConfigError::Invalid(
                "store.backend 'sqlite' requires store.path".to_string(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "logging.filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Open the configured store adapter
    pub fn open_store(&self) -> pitwall_storage::Result<Arc<dyn CollectionStore>> {
        info!(
            backend = %self.store.backend,
            environment = ?self.environment,
            "opening collection store"
        );
        match (self.store.backend, &self.store.path) {
            (StoreBackend::Sqlite, Some(path)) => Ok(Arc::new(SqliteCollectionStore::open(path)?)),
            (StoreBackend::Sqlite, None) => Err(pitwall_storage::StorageError::config(
                "store.backend 'sqlite' requires store.path",
            )),
            (StoreBackend::Memory, _) => Ok(Arc::new(InMemoryCollectionStore::new())),
        }
    }
}
