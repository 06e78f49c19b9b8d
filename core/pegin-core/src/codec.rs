//! State tokens as they appear in the session store.
//!
//! The token strings are a wire format: they are persisted and must keep
//! decoding after a reload, so they never change.
//!
//! ```text
//! InitialState                       <-> InitialState
//! PeginSessionStateWaitingForBTC     <-> SessionStarted
//! PeginSessionStateMintingTBTC       <-> MintingTBTC
//! PeginSessionWaitingForRedemption   <-> WaitingForRedemption
//! PeginSessionWaitingForClaim        <-> WaitingForClaim
//! PeginSessionTimeOutBTCNotSent      <-> TimeOutBTCNotSent
//! PeginSessionTimeOutMintingTBTC     <-> TimeOutMintingTBTC
//! ```
//!
//! "BTC arrived" and "minting in progress" share `PeginSessionStateMintingTBTC`.
//! There is no separate token for BTC having just arrived.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const INITIAL_STATE: &str = "InitialState";
pub const WAITING_FOR_BTC: &str = "PeginSessionStateWaitingForBTC";
pub const MINTING_TBTC: &str = "PeginSessionStateMintingTBTC";
pub const WAITING_FOR_REDEMPTION: &str = "PeginSessionWaitingForRedemption";
pub const WAITING_FOR_CLAIM: &str = "PeginSessionWaitingForClaim";
pub const TIME_OUT_BTC_NOT_SENT: &str = "PeginSessionTimeOutBTCNotSent";
pub const TIME_OUT_MINTING_TBTC: &str = "PeginSessionTimeOutMintingTBTC";

/// Where a pegin session is in its lifecycle.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum,
)]
pub enum SessionState {
    #[default]
    InitialState,
    SessionStarted,
    TimeOutBTCNotSent,
    MintingTBTC,
    TimeOutMintingTBTC,
    WaitingForRedemption,
    WaitingForClaim,
}

impl SessionState {
    pub const ALL: [SessionState; 7] = [
        SessionState::InitialState,
        SessionState::SessionStarted,
        SessionState::TimeOutBTCNotSent,
        SessionState::MintingTBTC,
        SessionState::TimeOutMintingTBTC,
        SessionState::WaitingForRedemption,
        SessionState::WaitingForClaim,
    ];

    pub fn as_token(&self) -> &'static str {
        match self {
            SessionState::InitialState => INITIAL_STATE,
            SessionState::SessionStarted => WAITING_FOR_BTC,
            SessionState::MintingTBTC => MINTING_TBTC,
            SessionState::WaitingForRedemption => WAITING_FOR_REDEMPTION,
            SessionState::WaitingForClaim => WAITING_FOR_CLAIM,
            SessionState::TimeOutBTCNotSent => TIME_OUT_BTC_NOT_SENT,
            SessionState::TimeOutMintingTBTC => TIME_OUT_MINTING_TBTC,
        }
    }

    /// Strict lookup. Use [`decode`] when reading from storage.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            INITIAL_STATE => Some(SessionState::InitialState),
            WAITING_FOR_BTC => Some(SessionState::SessionStarted),
            MINTING_TBTC => Some(SessionState::MintingTBTC),
            WAITING_FOR_REDEMPTION => Some(SessionState::WaitingForRedemption),
            WAITING_FOR_CLAIM => Some(SessionState::WaitingForClaim),
            TIME_OUT_BTC_NOT_SENT => Some(SessionState::TimeOutBTCNotSent),
            TIME_OUT_MINTING_TBTC => Some(SessionState::TimeOutMintingTBTC),
            _ => None,
        }
    }

    /// No transition leaves these states; further progress is a new session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::TimeOutBTCNotSent
                | SessionState::TimeOutMintingTBTC
                | SessionState::WaitingForClaim
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Decodes a stored token. Unknown or corrupted tokens fall back to `InitialState`.
pub fn decode(token: &str) -> SessionState {
    SessionState::from_token(token).unwrap_or_default()
}

pub fn encode(state: SessionState) -> &'static str {
    state.as_token()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_state_round_trips_through_its_token() {
        for state in SessionState::ALL {
            assert_eq!(decode(encode(state)), state, "token {}", encode(state));
        }
    }

    #[test]
    fn test_token_table_is_exact() {
        assert_eq!(decode("InitialState"), SessionState::InitialState);
        assert_eq!(
            decode("PeginSessionStateWaitingForBTC"),
            SessionState::SessionStarted
        );
        assert_eq!(
            decode("PeginSessionStateMintingTBTC"),
            SessionState::MintingTBTC
        );
        assert_eq!(
            decode("PeginSessionWaitingForRedemption"),
            SessionState::WaitingForRedemption
        );
        assert_eq!(
            decode("PeginSessionWaitingForClaim"),
            SessionState::WaitingForClaim
        );
        assert_eq!(
            decode("PeginSessionTimeOutBTCNotSent"),
            SessionState::TimeOutBTCNotSent
        );
        assert_eq!(
            decode("PeginSessionTimeOutMintingTBTC"),
            SessionState::TimeOutMintingTBTC
        );
    }

    #[test]
    fn test_unknown_tokens_decode_to_initial_state() {
        for token in [
            "",
            " ",
            "SessionStarted",
            "MintingTBTC",
            "peginsessionstatemintingtbtc",
            "PeginSessionStateMintingTBTC ",
            "{\"corrupt\":true}",
        ] {
            assert_eq!(decode(token), SessionState::InitialState, "{:?}", token);
        }
    }

    #[test]
    fn test_default_state_is_initial() {
        assert_eq!(SessionState::default(), SessionState::InitialState);
        assert_eq!(encode(SessionState::default()), INITIAL_STATE);
    }

    #[test]
    fn test_from_token_is_strict() {
        assert_eq!(SessionState::from_token("garbage"), None);
        assert_eq!(
            SessionState::from_token(MINTING_TBTC),
            Some(SessionState::MintingTBTC)
        );
    }

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = SessionState::ALL
            .into_iter()
            .filter(SessionState::is_terminal)
            .collect();
        assert_eq!(
            terminal,
            vec![
                SessionState::TimeOutBTCNotSent,
                SessionState::TimeOutMintingTBTC,
                SessionState::WaitingForClaim,
            ]
        );
    }

    #[test]
    fn test_display_is_token() {
        assert_eq!(
            SessionState::WaitingForClaim.to_string(),
            "PeginSessionWaitingForClaim"
        );
    }
}
