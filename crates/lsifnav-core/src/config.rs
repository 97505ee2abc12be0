//! Range store configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default sled page cache size in bytes.
pub const DEFAULT_CACHE_CAPACITY: u64 = 64 * 1024 * 1024;

/// Default number of buffered range writes before a batch is applied.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Settings for the disk-backed range store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory for the database. `None` uses a temporary directory that is
    /// removed when the store is dropped.
    pub path: Option<PathBuf>,

    /// Page cache size in bytes.
    pub cache_capacity: u64,

    /// Buffered writes per batch. Zero writes through immediately.
    pub batch_size: usize,

    /// Background flush interval. `None` flushes only on close.
    pub flush_every_ms: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            flush_every_ms: None,
        }
    }
}

impl StoreConfig {
    /// A temporary store with default settings.
    pub fn temporary() -> Self {
        Self::default()
    }

    /// A persistent store at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Whether the backing files outlive the store.
    pub fn is_temporary(&self) -> bool {
        self.path.is_none()
    }

    /// Loads a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        debug!("Loaded store config from {}", path.display());
        Ok(config)
    }

    /// Writes this config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"batch_size": 5}"#).unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert!(config.is_temporary());
    }

    #[test]
    fn test_save_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = StoreConfig {
            flush_every_ms: Some(500),
            ..StoreConfig::at(dir.path().join("db"))
        };

        config.save(&path).unwrap();
        assert_eq!(StoreConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{").unwrap();

        assert!(matches!(
            StoreConfig::load(&path),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            StoreConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
