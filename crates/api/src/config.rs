//! Store configuration via `keystash.toml`
//!
//! Selects the backend and the traversal rule. Relative backend paths are
//! resolved against the directory holding the config file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use keystash_core::{Error, KeyValueStore, PresenceCheck, Result};
use keystash_storage::{FileStore, MemoryStore};
use tracing::info;

use crate::store::PathStore;

/// Config file name conventionally placed next to the data.
pub const CONFIG_FILE_NAME: &str = "keystash.toml";

/// Which backend `open` builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process map, gone when the process exits
    #[default]
    Memory,
    /// JSON file at `path`
    File,
}

/// Store configuration loaded from `keystash.toml`.
///
/// # Example
///
/// ```toml
/// backend = "file"
/// path = "data/store.json"
/// quota_bytes = 5242880
/// presence = "defined"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StoreConfig {
    /// Backend: `"memory"` (default) or `"file"`.
    #[serde(default)]
    pub backend: BackendKind,
    /// Data file for the `"file"` backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Reject writes once keys plus values exceed this many bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<usize>,
    /// Traversal rule: `"defined"` (default) or `"truthy"`.
    #[serde(default)]
    pub presence: PresenceCheck,
}

impl StoreConfig {
    /// Config for an in-memory store with defaults
    pub fn memory() -> Self {
        Self::default()
    }

    /// Config for a file-backed store at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::File,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Check cross-field requirements.
    ///
    /// # Errors
    ///
    /// Returns an error if the file backend has no path.
    pub fn validate(&self) -> Result<()> {
        if self.backend == BackendKind::File && self.path.is_none() {
            return Err(Error::Config(
                "backend \"file\" requires a `path`".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Keystash store configuration
#
# Backend: "memory" (default) or "file"
#   "memory" = in-process map, lost on exit
#   "file"   = JSON file at `path`, survives restarts
backend = "memory"

# Data file for the "file" backend, relative to this config file.
# path = "store.json"

# Reject writes once keys plus values exceed this many bytes (default: none).
# quota_bytes = 5242880

# Traversal rule for dotted keys: "defined" (default) or "truthy"
#   "defined" = a member counts as found if it exists
#   "truthy"  = 0, false, "" and null also count as missing
presence = "defined"
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid config TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// A relative `path` is resolved against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config: StoreConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        if let (Some(data), Some(dir)) = (config.path.as_mut(), path.parent()) {
            if data.is_relative() {
                *data = dir.join(&*data);
            }
        }
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Build the configured backend and wrap it in a [`PathStore`]
///
/// # Errors
///
/// Returns an error if the config is invalid or the file backend cannot be
/// opened.
pub fn open(config: &StoreConfig) -> Result<PathStore<Box<dyn KeyValueStore>>> {
    config.validate()?;
    let backend: Box<dyn KeyValueStore> = match config.backend {
        BackendKind::Memory => Box::new(match config.quota_bytes {
            Some(quota) => MemoryStore::with_quota(quota),
            None => MemoryStore::new(),
        }),
        BackendKind::File => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| Error::Config("backend \"file\" requires a `path`".to_string()))?;
            Box::new(FileStore::open_with_quota(path, config.quota_bytes)?)
        }
    };
    info!(backend = ?config.backend, presence = ?config.presence, "opened keystash");
    Ok(PathStore::with_presence(backend, config.presence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystash_core::Value;
    use tempfile::TempDir;

    #[test]
    fn test_default_toml_parses_to_default() {
        let config = StoreConfig::from_toml_str(StoreConfig::default_toml()).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = StoreConfig::from_toml_str(
            r#"
backend = "file"
path = "/var/lib/app/store.json"
quota_bytes = 1024
presence = "truthy"
"#,
        )
        .unwrap();
        assert_eq!(config.backend, BackendKind::File);
        assert_eq!(config.path, Some(PathBuf::from("/var/lib/app/store.json")));
        assert_eq!(config.quota_bytes, Some(1024));
        assert_eq!(config.presence, PresenceCheck::Truthy);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = StoreConfig::from_toml_str("backend = \"redis\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_file_backend_requires_path() {
        let err = StoreConfig::from_toml_str("backend = \"file\"").unwrap_err();
        assert!(err.to_string().contains("requires a `path`"));
    }

    #[test]
    fn test_from_file_resolves_relative_path() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "backend = \"file\"\npath = \"data/store.json\"\n").unwrap();

        let config = StoreConfig::from_file(&config_path).unwrap();
        assert_eq!(config.path, Some(dir.path().join("data/store.json")));
    }

    #[test]
    fn test_write_default_if_missing_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "presence = \"truthy\"\n").unwrap();

        StoreConfig::write_default_if_missing(&config_path).unwrap();
        let config = StoreConfig::from_file(&config_path).unwrap();
        assert_eq!(config.presence, PresenceCheck::Truthy);
    }

    #[test]
    fn test_write_to_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        let mut config = StoreConfig::file(dir.path().join("store.json"));
        config.quota_bytes = Some(64);

        config.write_to_file(&config_path).unwrap();
        assert_eq!(StoreConfig::from_file(&config_path).unwrap(), config);
    }

    #[test]
    fn test_open_memory_with_quota() {
        let mut config = StoreConfig::memory();
        config.quota_bytes = Some(8);
        let store = open(&config).unwrap();
        store.set("k", "1234").unwrap();
        assert!(matches!(
            store.set("k", "123456789").unwrap_err(),
            Error::QuotaExceeded { .. }
        ));
        assert_eq!(store.get("k").unwrap(), Some(Value::Int(1234)));
    }

    #[test]
    fn test_open_file_backend_persists() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::file(dir.path().join("store.json"));
        {
            let store = open(&config).unwrap();
            store.set("prefs", Value::from(serde_json::json!({"theme": "dark"}))).unwrap();
        }
        let store = open(&config).unwrap();
        assert_eq!(store.get("prefs.theme").unwrap(), Some(Value::from("dark")));
    }
}
