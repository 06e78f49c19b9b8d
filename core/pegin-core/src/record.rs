//! Session data shared by the tracker, the store and every client.

use serde::{Deserialize, Serialize};

use crate::codec::SessionState;

/// Everything a client knows about the current pegin session.
///
/// Always a total structure: fields that are not meaningful yet hold empty
/// strings. `is_set == false` is the only representation of "no session".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct SessionRecord {
    pub is_set: bool,
    pub session_id: String,
    pub escrow_address: String,
    pub escrow_script: String,
    pub current_state: SessionState,
    pub redeem_address: String,
    pub plasma_bridge_pkey: String,
    pub redeem_template: String,
}

impl SessionRecord {
    pub fn unset() -> Self {
        SessionRecord {
            is_set: false,
            session_id: String::new(),
            escrow_address: String::new(),
            escrow_script: String::new(),
            current_state: SessionState::InitialState,
            redeem_address: String::new(),
            plasma_bridge_pkey: String::new(),
            redeem_template: String::new(),
        }
    }

    /// The redeem-side fields, if `minted_btc` has populated them.
    pub fn redeem_details(&self) -> Option<RedeemDetails> {
        if self.redeem_address.is_empty()
            && self.plasma_bridge_pkey.is_empty()
            && self.redeem_template.is_empty()
        {
            return None;
        }
        Some(RedeemDetails {
            address: self.redeem_address.clone(),
            plasma_bridge_pkey: self.plasma_bridge_pkey.clone(),
            redeem_template: self.redeem_template.clone(),
        })
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        SessionRecord::unset()
    }
}

/// Reply from the session-initiation service.
///
/// Field names on the wire follow the service's JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct StartSessionResponse {
    #[serde(rename = "sessionID")]
    pub session_id: String,
    #[serde(rename = "escrowAddress")]
    pub escrow_address: String,
    pub script: String,
}

/// Redemption data delivered once tBTC has been minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct RedeemDetails {
    pub address: String,
    #[serde(rename = "plasmaBridgePKey")]
    pub plasma_bridge_pkey: String,
    #[serde(rename = "redeemTemplate")]
    pub redeem_template: String,
}
