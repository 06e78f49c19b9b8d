//! Maps pegin events to session records.
//!
//! ```text
//! Started            any                  -> SessionStarted
//! BtcArrived         SessionStarted       -> MintingTBTC
//! Minting            MintingTBTC          -> MintingTBTC
//! MintingTimedOut    MintingTBTC          -> TimeOutMintingTBTC
//! BtcNotSentTimedOut SessionStarted       -> TimeOutBTCNotSent
//! Minted             MintingTBTC          -> WaitingForRedemption
//! Claimed            WaitingForRedemption -> WaitingForClaim
//! ```
//!
//! The source column is what callers are expected to be in. It is not enforced:
//! the caller owns the decision that an event happened.

use std::fmt;

use crate::codec::SessionState;
use crate::record::{RedeemDetails, SessionRecord, StartSessionResponse};
use crate::store::keys;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started(StartSessionResponse),
    BtcArrived,
    Minting,
    MintingTimedOut,
    BtcNotSentTimedOut,
    Minted(RedeemDetails),
    Claimed,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Started(_) => "session_started",
            SessionEvent::BtcArrived => "btc_arrived",
            SessionEvent::Minting => "minting_btc",
            SessionEvent::MintingTimedOut => "time_out_minting_btc",
            SessionEvent::BtcNotSentTimedOut => "time_out_btc_not_sent",
            SessionEvent::Minted(_) => "minted_btc",
            SessionEvent::Claimed => "claimed_tbtc",
        }
    }

    pub fn target(&self) -> SessionState {
        match self {
            SessionEvent::Started(_) => SessionState::SessionStarted,
            SessionEvent::BtcArrived | SessionEvent::Minting => SessionState::MintingTBTC,
            SessionEvent::MintingTimedOut => SessionState::TimeOutMintingTBTC,
            SessionEvent::BtcNotSentTimedOut => SessionState::TimeOutBTCNotSent,
            SessionEvent::Minted(_) => SessionState::WaitingForRedemption,
            SessionEvent::Claimed => SessionState::WaitingForClaim,
        }
    }

    /// Whether `from` is a state this event normally follows.
    pub fn is_expected_from(&self, from: SessionState) -> bool {
        match self {
            SessionEvent::Started(_) => true,
            SessionEvent::BtcArrived | SessionEvent::BtcNotSentTimedOut => {
                from == SessionState::SessionStarted
            }
            SessionEvent::Minting | SessionEvent::MintingTimedOut | SessionEvent::Minted(_) => {
                from == SessionState::MintingTBTC
            }
            SessionEvent::Claimed => from == SessionState::WaitingForRedemption,
        }
    }

    /// Store writes for this event, given the record it produced.
    ///
    /// Only the keys the event changes are written. Resetting redeem fields is
    /// a change to the record, not to storage.
    pub fn writes(&self, next: &SessionRecord) -> Vec<(&'static str, String)> {
        let state = (keys::CURRENT_STATE, next.current_state.as_token().to_string());
        match self {
            SessionEvent::Started(_) => vec![
                (keys::SESSION_ID, next.session_id.clone()),
                (keys::ESCROW_ADDRESS, next.escrow_address.clone()),
                (keys::ESCROW_SCRIPT, next.escrow_script.clone()),
                state,
            ],
            SessionEvent::Minted(_) => vec![
                state,
                (keys::REDEEM_ADDRESS, next.redeem_address.clone()),
                (keys::PLASMA_BRIDGE_PKEY, next.plasma_bridge_pkey.clone()),
                (keys::REDEEM_TEMPLATE, next.redeem_template.clone()),
            ],
            SessionEvent::BtcArrived
            | SessionEvent::Minting
            | SessionEvent::MintingTimedOut
            | SessionEvent::BtcNotSentTimedOut
            | SessionEvent::Claimed => vec![state],
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn apply(current: &SessionRecord, event: &SessionEvent) -> SessionRecord {
    match event {
        SessionEvent::Started(response) => SessionRecord {
            is_set: true,
            session_id: response.session_id.clone(),
            escrow_address: response.escrow_address.clone(),
            escrow_script: response.script.clone(),
            current_state: SessionState::SessionStarted,
            redeem_address: String::new(),
            plasma_bridge_pkey: String::new(),
            redeem_template: String::new(),
        },
        SessionEvent::BtcArrived
        | SessionEvent::Minting
        | SessionEvent::MintingTimedOut
        | SessionEvent::BtcNotSentTimedOut => with_redeem(
            current,
            event.target(),
            String::new(),
            String::new(),
            String::new(),
        ),
        SessionEvent::Minted(details) => with_redeem(
            current,
            event.target(),
            details.address.clone(),
            details.plasma_bridge_pkey.clone(),
            details.redeem_template.clone(),
        ),
        SessionEvent::Claimed => with_redeem(
            current,
            event.target(),
            current.redeem_address.clone(),
            current.plasma_bridge_pkey.clone(),
            current.redeem_template.clone(),
        ),
    }
}

fn with_redeem(
    current: &SessionRecord,
    state: SessionState,
    redeem_address: String,
    plasma_bridge_pkey: String,
    redeem_template: String,
) -> SessionRecord {
    SessionRecord {
        is_set: true,
        session_id: current.session_id.clone(),
        escrow_address: current.escrow_address.clone(),
        escrow_script: current.escrow_script.clone(),
        current_state: state,
        redeem_address,
        plasma_bridge_pkey,
        redeem_template,
    }
}
