//! Storage configuration and path management.
//!
//! All file locations used by the tracker are decided here so tests can point
//! everything at a temp directory with [`StorageConfig::with_root`].
//!
//! Production code uses [`StorageConfig::from_env`]: `$PEGIN_HOME` when set,
//! `~/.pegin` otherwise.

use std::path::{Path, PathBuf};

use crate::error::{PeginError, Result};

/// Overrides the storage root.
pub const PEGIN_HOME_ENV: &str = "PEGIN_HOME";

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all tracker data (default: ~/.pegin)
    root: PathBuf,
}

impl StorageConfig {
    /// Resolves the root from `$PEGIN_HOME`, falling back to `~/.pegin`.
    pub fn from_env() -> Result<Self> {
        if let Some(root) = std::env::var_os(PEGIN_HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }
        let home = dirs::home_dir().ok_or(PeginError::HomeDirNotFound)?;
        Ok(Self::with_root(home.join(".pegin")))
    }

    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to session.json (persisted session keys).
    pub fn store_file(&self) -> PathBuf {
        self.root.join("session.json")
    }

    /// Path to config.json (tracker preferences).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Path to logs/ directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Ensures the root directory and standard subdirectories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs_err::create_dir_all(&self.root)?;
        fs_err::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
