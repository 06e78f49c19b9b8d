//! Rehydration of a session from the key/value store.
//!
//! All-or-nothing: a session is rebuilt only when all seven keys are present.
//! A partially written store never yields a partial session.

use tracing::debug;

use crate::codec::decode;
use crate::record::SessionRecord;
use crate::store::{keys, KeyValueStore};

/// The persisted form of a session. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub session_id: Option<String>,
    pub escrow_address: Option<String>,
    pub escrow_script: Option<String>,
    pub current_state: Option<String>,
    pub redeem_address: Option<String>,
    pub plasma_bridge_pkey: Option<String>,
    pub redeem_template: Option<String>,
}

impl PersistedSession {
    pub fn read<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        PersistedSession {
            session_id: store.get(keys::SESSION_ID),
            escrow_address: store.get(keys::ESCROW_ADDRESS),
            escrow_script: store.get(keys::ESCROW_SCRIPT),
            current_state: store.get(keys::CURRENT_STATE),
            redeem_address: store.get(keys::REDEEM_ADDRESS),
            plasma_bridge_pkey: store.get(keys::PLASMA_BRIDGE_PKEY),
            redeem_template: store.get(keys::REDEEM_TEMPLATE),
        }
    }

    /// Keys absent from the store, in key order.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        [
            (keys::SESSION_ID, &self.session_id),
            (keys::ESCROW_ADDRESS, &self.escrow_address),
            (keys::ESCROW_SCRIPT, &self.escrow_script),
            (keys::CURRENT_STATE, &self.current_state),
            (keys::REDEEM_ADDRESS, &self.redeem_address),
            (keys::PLASMA_BRIDGE_PKEY, &self.plasma_bridge_pkey),
            (keys::REDEEM_TEMPLATE, &self.redeem_template),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key)
        .collect()
    }

    /// Redeem fields are taken verbatim whatever the decoded state is.
    pub fn into_record(self) -> Option<SessionRecord> {
        let PersistedSession {
            session_id: Some(session_id),
            escrow_address: Some(escrow_address),
            escrow_script: Some(escrow_script),
            current_state: Some(current_state),
            redeem_address: Some(redeem_address),
            plasma_bridge_pkey: Some(plasma_bridge_pkey),
            redeem_template: Some(redeem_template),
        } = self
        else {
            return None;
        };

        Some(SessionRecord {
            is_set: true,
            session_id,
            escrow_address,
            escrow_script,
            current_state: decode(&current_state),
            redeem_address,
            plasma_bridge_pkey,
            redeem_template,
        })
    }
}

/// Rebuilds the session from `store` when `current` is unset.
///
/// Returns `None` when a session is already in memory or any key is missing.
pub fn rehydrate<S: KeyValueStore + ?Sized>(
    current: &SessionRecord,
    store: &S,
) -> Option<SessionRecord> {
    if current.is_set {
        return None;
    }

    let persisted = PersistedSession::read(store);
    let missing = persisted.missing_keys();
    if !missing.is_empty() {
        debug!(missing = ?missing, "No complete session in store");
        return None;
    }

    persisted.into_record()
}
