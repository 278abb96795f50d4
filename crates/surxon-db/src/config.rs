//! # Catalog Configuration
//!
//! Storage and catalog settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     SURXON_DB_PATH=/var/lib/surxon/catalog.db                           │
//! │     SURXON_PAGE_SIZE=50                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/surxon-catalog/surxon.toml (Linux)                        │
//! │     ~/Library/Application Support/com.surxon.catalog/surxon.toml        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "./surxon.db"
//! max_connections = 5
//! run_migrations = true
//!
//! [catalog]
//! default_page_size = 20
//! max_page_size = 100
//! max_code_attempts = 32
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use surxon_core::{DEFAULT_MAX_CODE_ATTEMPTS, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path. Created if missing.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./surxon.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// Settings the repositories read at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Product code samples before giving up on an insert.
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_max_code_attempts() -> u32 {
    DEFAULT_MAX_CODE_ATTEMPTS
}

impl CatalogSettings {
    /// Pulls every value into its usable range: at least one code attempt,
    /// page sizes of at least 1 with the default no larger than the max.
    pub fn clamped(self) -> Self {
        let max_page_size = self.max_page_size.max(1);
        CatalogSettings {
            default_page_size: self.default_page_size.clamp(1, max_page_size),
            max_page_size,
            max_code_attempts: self.max_code_attempts.max(1),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_code_attempts: default_max_code_attempts(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl CatalogConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`surxon.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load catalog config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        let catalog = &self.catalog;
        if catalog.max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "max_page_size must be greater than 0".into(),
            ));
        }
        if catalog.default_page_size == 0 || catalog.default_page_size > catalog.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "default_page_size must be between 1 and {}",
                catalog.max_page_size
            )));
        }
        if catalog.max_code_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_code_attempts must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("SURXON_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(n) = env_u32("SURXON_MAX_CONNECTIONS") {
            self.database.max_connections = n;
        }

        if let Some(n) = env_u32("SURXON_PAGE_SIZE") {
            self.catalog.default_page_size = n;
        }

        if let Some(n) = env_u32("SURXON_MAX_PAGE_SIZE") {
            self.catalog.max_page_size = n;
        }

        if let Some(n) = env_u32("SURXON_MAX_CODE_ATTEMPTS") {
            self.catalog.max_code_attempts = n;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "surxon", "catalog")
            .map(|dirs| dirs.config_dir().join("surxon.toml"))
    }
}

fn env_u32(key: &str) -> Option<u32> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<u32>() {
        Ok(n) => {
            debug!(key, value = n, "Overriding setting from environment");
            Some(n)
        }
        Err(_) => {
            warn!(key, value = %raw, "Ignoring non-numeric environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.catalog.default_page_size, 20);
        assert_eq!(config.catalog.max_page_size, 100);
        assert_eq!(config.catalog.max_code_attempts, 32);
        assert!(config.database.run_migrations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CatalogConfig::from_toml(
            r#"
            [catalog]
            default_page_size = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.default_page_size, 50);
        assert_eq!(config.catalog.max_page_size, 100);
        assert_eq!(config.database, DatabaseSettings::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CatalogConfig::default();
        config.catalog.default_page_size = 500;
        assert!(config.validate().is_err());

        let mut config = CatalogConfig::default();
        config.catalog.max_code_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = CatalogConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = CatalogConfig::default().to_toml().unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[catalog]"));
    }
}
