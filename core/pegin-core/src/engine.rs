//! PeginEngine - the entry point for UI clients.
//!
//! Wraps a [`SessionTracker`] over the file-backed store so Swift/Kotlin/Python
//! hosts can drive the pegin flow without touching storage details. Every
//! transition returns the new record; that return value is the published state
//! for FFI clients.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use pegin_core::PeginEngine;
//!
//! let engine = PeginEngine::new().expect("Failed to initialize");
//! let record = engine.current();
//! if !record.is_set {
//!     let record = engine.session_started(response)?;
//! }
//! ```

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::config::load_config;
use crate::error::{PeginFfiError, Result};
use crate::observer::SessionObserver;
use crate::record::{SessionRecord, StartSessionResponse};
use crate::storage::StorageConfig;
use crate::store::FileStore;
use crate::tracker::SessionTracker;

#[derive(uniffi::Object)]
pub struct PeginEngine {
    storage: StorageConfig,
    tracker: Mutex<SessionTracker<FileStore>>,
}

impl PeginEngine {
    /// Creates an engine over a custom storage root and restores any stored session.
    ///
    /// Used for testing with temp directories.
    /// Not exposed to FFI - use `new()` for external clients.
    pub fn with_storage(storage: StorageConfig) -> Result<Self> {
        let config = load_config(&storage);
        let store_file = config.resolve_store_file(&storage);
        debug!(path = %store_file.display(), "Opening session store");

        let mut tracker = SessionTracker::new(FileStore::open(&store_file)?);
        tracker.rehydrate();

        Ok(Self {
            storage,
            tracker: Mutex::new(tracker),
        })
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Registers a Rust-side observer for subsequent transitions.
    pub fn subscribe<O: SessionObserver + 'static>(&self, observer: O) {
        self.tracker().subscribe(observer);
    }

    fn tracker(&self) -> MutexGuard<'_, SessionTracker<FileStore>> {
        // The record is swapped whole, so a poisoned tracker is still consistent.
        self.tracker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn run<F>(&self, transition: F) -> std::result::Result<SessionRecord, PeginFfiError>
    where
        F: FnOnce(&mut SessionTracker<FileStore>) -> Result<&SessionRecord>,
    {
        let mut tracker = self.tracker();
        transition(&mut *tracker)
            .map(SessionRecord::clone)
            .map_err(PeginFfiError::from)
    }
}

#[uniffi::export]
impl PeginEngine {
    /// Creates an engine using `$PEGIN_HOME` or `~/.pegin/`.
    #[uniffi::constructor]
    pub fn new() -> std::result::Result<Self, PeginFfiError> {
        let storage = StorageConfig::from_env()?;
        Self::with_storage(storage).map_err(PeginFfiError::from)
    }

    /// Path to the session store as a string.
    pub fn store_path(&self) -> String {
        self.tracker().store().path().to_string_lossy().to_string()
    }

    pub fn current(&self) -> SessionRecord {
        self.tracker().current().clone()
    }

    /// Restores the stored session if none is in memory.
    pub fn rehydrate(&self) -> SessionRecord {
        self.tracker().rehydrate().clone()
    }

    pub fn session_started(
        &self,
        response: StartSessionResponse,
    ) -> std::result::Result<SessionRecord, PeginFfiError> {
        self.run(|tracker| tracker.session_started(response))
    }

    pub fn btc_arrived(&self) -> std::result::Result<SessionRecord, PeginFfiError> {
        self.run(|tracker| tracker.btc_arrived())
    }

    pub fn minting_btc(&self) -> std::result::Result<SessionRecord, PeginFfiError> {
        self.run(|tracker| tracker.minting_btc())
    }

    pub fn time_out_minting_btc(&self) -> std::result::Result<SessionRecord, PeginFfiError> {
        self.run(|tracker| tracker.time_out_minting_btc())
    }

    pub fn time_out_btc_not_sent(&self) -> std::result::Result<SessionRecord, PeginFfiError> {
        self.run(|tracker| tracker.time_out_btc_not_sent())
    }

    pub fn minted_btc(
        &self,
        address: String,
        plasma_bridge_pkey: String,
        redeem_template: String,
    ) -> std::result::Result<SessionRecord, PeginFfiError> {
        self.run(|tracker| tracker.minted_btc(&address, &plasma_bridge_pkey, &redeem_template))
    }

    pub fn claimed_tbtc(&self) -> std::result::Result<SessionRecord, PeginFfiError> {
        self.run(|tracker| tracker.claimed_tbtc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SessionState;
    use crate::config::{save_config, PeginConfig};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn response() -> StartSessionResponse {
        StartSessionResponse {
            session_id: "s1".to_string(),
            escrow_address: "addr1".to_string(),
            script: "scr1".to_string(),
        }
    }

    #[test]
    fn test_fresh_engine_has_no_session() {
        let temp = TempDir::new().unwrap();
        let engine = PeginEngine::with_storage(StorageConfig::with_root(temp.path().to_path_buf()))
            .unwrap();
        assert!(!engine.current().is_set);
        assert!(engine.store_path().ends_with("session.json"));
    }

    #[test]
    fn test_engine_restores_session_on_reopen() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());

        let engine = PeginEngine::with_storage(storage.clone()).unwrap();
        engine.session_started(response()).unwrap();
        engine.btc_arrived().unwrap();
        let minted = engine
            .minted_btc("rAddr".to_string(), "pKey".to_string(), "tmpl".to_string())
            .unwrap();
        drop(engine);

        let reopened = PeginEngine::with_storage(storage).unwrap();
        assert_eq!(reopened.current(), minted);
        assert_eq!(reopened.current().current_state, SessionState::WaitingForRedemption);
    }

    #[test]
    fn test_engine_honors_store_file_override() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().join("root"));
        let custom = temp.path().join("elsewhere").join("store.json");
        save_config(
            &storage,
            &PeginConfig {
                store_file: Some(custom.to_string_lossy().to_string()),
            },
        )
        .unwrap();

        let engine = PeginEngine::with_storage(storage).unwrap();
        engine.session_started(response()).unwrap();

        assert!(custom.exists());
        assert_eq!(engine.store_path(), custom.to_string_lossy());
    }

    #[test]
    fn test_engine_notifies_rust_observers() {
        let temp = TempDir::new().unwrap();
        let engine = PeginEngine::with_storage(StorageConfig::with_root(temp.path().to_path_buf()))
            .unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.subscribe(move |record: &SessionRecord| {
            sink.lock().unwrap().push(record.current_state);
        });

        engine.session_started(response()).unwrap();
        engine.time_out_btc_not_sent().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![SessionState::SessionStarted, SessionState::TimeOutBTCNotSent]
        );
    }
}
