//! # pegin-core
//!
//! Session tracking for the BTC pegin flow: a user deposits BTC into an escrow
//! address, tBTC is minted, and the user later redeems and claims it. This crate
//! records where a single session is in that flow and keeps it durable across
//! restarts so the client can be closed and reopened without losing progress.
//!
//! ## Design Principles
//!
//! - **Recorder, not referee**: External signals (BTC observed, minting done,
//!   timeouts) are pushed in by the caller. Nothing here talks to a chain.
//! - **Pure transitions**: [`transition::apply`] maps `(record, event)` to a new
//!   record. Persistence and publishing happen in [`SessionTracker`].
//! - **Graceful degradation**: Unknown state tokens decode to `InitialState`,
//!   missing keys mean "no session". Neither is an error.
//! - **Wire compatible**: Seven string keys, one token per state.
//! - **FFI-ready**: UniFFI annotations enable Swift, Kotlin, Python bindings.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pegin_core::{MemoryStore, SessionTracker, StartSessionResponse};
//!
//! let mut tracker = SessionTracker::new(MemoryStore::new());
//! tracker.subscribe(|record: &pegin_core::SessionRecord| println!("{:?}", record.current_state));
//! tracker.rehydrate();
//! tracker.session_started(StartSessionResponse {
//!     session_id: "s1".into(),
//!     escrow_address: "addr1".into(),
//!     script: "scr1".into(),
//! })?;
//! tracker.btc_arrived()?;
//! ```

// UniFFI scaffolding for Swift/Kotlin/Python bindings
uniffi::setup_scaffolding!();

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod observer;
pub mod persist;
pub mod record;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod transition;

pub use codec::{decode, encode, SessionState};
pub use config::{load_config, save_config, PeginConfig};
pub use engine::PeginEngine;
pub use error::{PeginError, PeginFfiError, Result};
pub use observer::SessionObserver;
pub use persist::{rehydrate, PersistedSession};
pub use record::{RedeemDetails, SessionRecord, StartSessionResponse};
pub use storage::StorageConfig;
pub use store::{keys, FileStore, KeyValueStore, MemoryStore};
pub use tracker::SessionTracker;
pub use transition::SessionEvent;
