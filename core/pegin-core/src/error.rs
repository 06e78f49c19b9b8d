//! Error types for pegin-core operations.
//! `PeginError` carries full context for Rust callers; `PeginFfiError` is the
//! coarse form handed across the UniFFI boundary.
//!
//! Decoding and rehydration never produce errors; only the storage backends
//! and configuration I/O do.

use std::path::PathBuf;

/// Error surfaced to Swift/Kotlin/Python hosts.
///
/// Hosts only need to tell a missing/broken setup apart from a failed
/// store write, so the rich [`PeginError`] is folded into two variants
/// carrying its rendered message.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PeginFfiError {
    #[error("{message}")]
    Setup { message: String },

    #[error("{message}")]
    Store { message: String },
}

impl From<PeginError> for PeginFfiError {
    fn from(err: PeginError) -> Self {
        let message = err.to_string();
        match err {
            PeginError::HomeDirNotFound | PeginError::ConfigMalformed { .. } => {
                PeginFfiError::Setup { message }
            }
            PeginError::StoreWriteFailed { .. }
            | PeginError::Io { .. }
            | PeginError::Json { .. } => PeginFfiError::Store { message },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Internal Error (for Rust-only use)
// ═══════════════════════════════════════════════════════════════════════════════

/// All errors that can occur in pegin-core operations.
///
/// For FFI boundaries, use `PeginFfiError` instead.
#[derive(Debug, thiserror::Error)]
pub enum PeginError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Store Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Session store write failed: {path}: {details}")]
    StoreWriteFailed { path: PathBuf, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using PeginError.
pub type Result<T> = std::result::Result<T, PeginError>;

// The CLI reports errors as plain strings.
impl From<PeginError> for String {
    fn from(err: PeginError) -> String {
        err.to_string()
    }
}
