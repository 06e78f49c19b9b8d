//! Tracker preferences stored in `config.json`.
//!
//! A missing or unreadable file yields defaults; the tracker must start even
//! when the config is broken.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PeginError, Result};
use crate::storage::StorageConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeginConfig {
    /// Session store location. Defaults to `<root>/session.json`.
    #[serde(default)]
    pub store_file: Option<String>,
}

impl PeginConfig {
    pub fn resolve_store_file(&self, storage: &StorageConfig) -> PathBuf {
        match &self.store_file {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => storage.store_file(),
        }
    }
}

/// Loads the config, returning defaults if the file doesn't exist or can't be parsed.
pub fn load_config(storage: &StorageConfig) -> PeginConfig {
    let path = storage.config_file();
    let Ok(content) = fs_err::read_to_string(&path) else {
        return PeginConfig::default();
    };
    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Ignoring malformed config");
            PeginConfig::default()
        }
    }
}

pub fn save_config(storage: &StorageConfig, config: &PeginConfig) -> Result<()> {
    let path = storage.config_file();
    let content =
        serde_json::to_string_pretty(config).map_err(|err| PeginError::ConfigMalformed {
            path: path.clone(),
            details: err.to_string(),
        })?;
    fs_err::create_dir_all(storage.root()).map_err(|source| PeginError::Io {
        context: "Failed to create storage root".to_string(),
        source,
    })?;
    fs_err::write(&path, content).map_err(|source| PeginError::Io {
        context: "Failed to write config".to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        let config = load_config(&storage);
        assert_eq!(config, PeginConfig::default());
        assert_eq!(config.resolve_store_file(&storage), storage.store_file());
    }

    #[test]
    fn test_malformed_config_is_default() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        std::fs::write(storage.config_file(), "not json").unwrap();
        assert_eq!(load_config(&storage), PeginConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().join("pegin"));
        let config = PeginConfig {
            store_file: Some("/var/lib/pegin/session.json".to_string()),
        };

        save_config(&storage, &config).unwrap();

        let loaded = load_config(&storage);
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.resolve_store_file(&storage),
            PathBuf::from("/var/lib/pegin/session.json")
        );
    }

    #[test]
    fn test_blank_store_file_falls_back() {
        let storage = StorageConfig::with_root(PathBuf::from("/root/.pegin"));
        let config = PeginConfig {
            store_file: Some("  ".to_string()),
        };
        assert_eq!(
            config.resolve_store_file(&storage),
            PathBuf::from("/root/.pegin/session.json")
        );
    }
}
