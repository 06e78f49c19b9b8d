//! Key/value persistence for session fields.
//!
//! The tracker only needs string `get`/`set` under seven fixed keys, so any
//! client-side store (browser cookies, app preferences, a JSON file) can sit
//! behind [`KeyValueStore`].
//!
//! # File Format
//!
//! [`FileStore`] keeps the same flat key space inside a versioned JSON file:
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "sessionID": "s1",
//!     "currentState": "PeginSessionStateWaitingForBTC"
//!   }
//! }
//! ```
//!
//! # Defensive Design
//!
//! - Missing file, empty file, corrupt JSON or an unknown version all load as
//!   an empty store. Missing keys then simply mean "no session".
//!
//! # Atomic Writes
//!
//! All writes of one transition go through [`KeyValueStore::set_many`].
//! `FileStore` applies them with a single temp file + rename, so a crash never
//! leaves a half-written transition on disk.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{PeginError, Result};

/// Storage keys. These are part of the wire format.
pub mod keys {
    pub const SESSION_ID: &str = "sessionID";
    pub const ESCROW_ADDRESS: &str = "escrowAddress";
    pub const ESCROW_SCRIPT: &str = "escrowScript";
    pub const CURRENT_STATE: &str = "currentState";
    pub const REDEEM_ADDRESS: &str = "redeemAddress";
    pub const PLASMA_BRIDGE_PKEY: &str = "plasmaBridgePKey";
    pub const REDEEM_TEMPLATE: &str = "redeemTemplate";

    pub const ALL: [&str; 7] = [
        SESSION_ID,
        ESCROW_ADDRESS,
        ESCROW_SCRIPT,
        CURRENT_STATE,
        REDEEM_ADDRESS,
        PLASMA_BRIDGE_PKEY,
        REDEEM_TEMPLATE,
    ];
}

const STORE_FILE_VERSION: u32 = 1;

/// String key/value store holding the persisted session fields.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Applies the writes of one transition, in order.
    ///
    /// The default writes keys one at a time and may stop part-way on error.
    /// Implementations that can commit several keys at once should override it.
    fn set_many(&mut self, writes: &[(&str, String)]) -> Result<()> {
        for (key, value) in writes {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// In-process store. Used by tests and by hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The on-disk JSON structure for the store file.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// Schema version. We only load files with version == 1.
    version: u32,
    entries: BTreeMap<String, String>,
}

/// JSON-file-backed store.
#[derive(Debug)]
pub struct FileStore {
    entries: BTreeMap<String, String>,
    file_path: PathBuf,
}

impl FileStore {
    /// Opens the store at `file_path`, starting empty when there is nothing usable there.
    pub fn open(file_path: &Path) -> Result<Self> {
        let empty = FileStore {
            entries: BTreeMap::new(),
            file_path: file_path.to_path_buf(),
        };

        if !file_path.exists() {
            return Ok(empty);
        }

        let content = fs_err::read_to_string(file_path).map_err(|source| PeginError::Io {
            context: "Failed to read session store".to_string(),
            source,
        })?;

        if content.trim().is_empty() {
            warn!(path = %file_path.display(), "Empty session store, starting empty");
            return Ok(empty);
        }

        match serde_json::from_str::<StoreFile>(&content) {
            Ok(store_file) if store_file.version == STORE_FILE_VERSION => Ok(FileStore {
                entries: store_file.entries,
                file_path: file_path.to_path_buf(),
            }),
            Ok(store_file) => {
                warn!(
                    path = %file_path.display(),
                    version = store_file.version,
                    expected = STORE_FILE_VERSION,
                    "Unsupported session store version, starting empty"
                );
                Ok(empty)
            }
            Err(err) => {
                warn!(
                    path = %file_path.display(),
                    error = %err,
                    "Failed to parse session store, starting empty"
                );
                Ok(empty)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn write_failed(&self, details: String) -> PeginError {
        PeginError::StoreWriteFailed {
            path: self.file_path.clone(),
            details,
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let store_file = StoreFile {
            version: STORE_FILE_VERSION,
            entries: entries.clone(),
        };

        let content = serde_json::to_string_pretty(&store_file).map_err(|source| {
            PeginError::Json {
                context: "Failed to serialize session store".to_string(),
                source,
            }
        })?;

        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| self.write_failed("store path has no parent directory".to_string()))?;
        fs_err::create_dir_all(parent_dir).map_err(|e| self.write_failed(e.to_string()))?;

        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .map_err(|e| self.write_failed(format!("temp file error: {}", e)))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| self.write_failed(format!("failed to write temp file: {}", e)))?;
        temp_file
            .flush()
            .map_err(|e| self.write_failed(format!("failed to flush temp file: {}", e)))?;
        temp_file
            .persist(&self.file_path)
            .map_err(|e| self.write_failed(e.error.to_string()))?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value.to_string())])
    }

    fn set_many(&mut self, writes: &[(&str, String)]) -> Result<()> {
        let mut next = self.entries.clone();
        for (key, value) in writes {
            next.insert((*key).to_string(), value.clone());
        }
        self.save(&next)?;
        debug!(path = %self.file_path.display(), keys = writes.len(), "Session store committed");
        self.entries = next;
        Ok(())
    }
}
