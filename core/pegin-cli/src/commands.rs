//! Runs one CLI command against the file-backed session store.

use std::io::Read;
use std::path::Path;

use pegin_core::{FileStore, SessionRecord, SessionTracker, StartSessionResponse};

use crate::Commands;

pub fn run<R: Read>(command: &Commands, store_path: &Path, input: R) -> Result<SessionRecord, String> {
    let store = FileStore::open(store_path).map_err(String::from)?;
    let mut tracker = SessionTracker::new(store);
    tracker.rehydrate();

    if !tracker.current().is_set && !matches!(command, Commands::Show | Commands::Start) {
        tracing::warn!(command = ?command, path = %store_path.display(), "No complete stored session");
        return Err(format!(
            "no complete stored session in {}",
            store_path.display()
        ));
    }

    let record = match command {
        Commands::Show => return Ok(tracker.current().clone()),
        Commands::Start => {
            let response = read_start_response(input)?;
            tracker.session_started(response)
        }
        Commands::BtcArrived => tracker.btc_arrived(),
        Commands::Minting => tracker.minting_btc(),
        Commands::TimeoutMinting => tracker.time_out_minting_btc(),
        Commands::TimeoutBtcNotSent => tracker.time_out_btc_not_sent(),
        Commands::Minted {
            address,
            pkey,
            template,
        } => tracker.minted_btc(address, pkey, template),
        Commands::Claimed => tracker.claimed_tbtc(),
    };

    record.map(SessionRecord::clone).map_err(String::from)
}

fn read_start_response<R: Read>(mut input: R) -> Result<StartSessionResponse, String> {
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .map_err(|e| format!("Failed to read stdin: {}", e))?;

    if raw.trim().is_empty() {
        return Err("Expected StartSessionResponse JSON on stdin".to_string());
    }

    serde_json::from_str(&raw).map_err(|e| format!("Failed to parse StartSessionResponse: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegin_core::{encode, keys, KeyValueStore, SessionState};
    use std::io::empty;
    use tempfile::tempdir;

    const START_JSON: &[u8] = br#"{"sessionID":"s1","escrowAddress":"addr1","script":"scr1"}"#;

    #[test]
    fn test_show_on_empty_store() {
        let temp = tempdir().unwrap();
        let record = run(&Commands::Show, &temp.path().join("s.json"), empty()).unwrap();
        assert!(!record.is_set);
    }

    fn seed_session(path: &Path, state: SessionState) {
        let mut store = FileStore::open(path).unwrap();
        store
            .set_many(&[
                (keys::SESSION_ID, "s1".to_string()),
                (keys::ESCROW_ADDRESS, "addr1".to_string()),
                (keys::ESCROW_SCRIPT, "scr1".to_string()),
                (keys::CURRENT_STATE, encode(state).to_string()),
                (keys::REDEEM_ADDRESS, String::new()),
                (keys::PLASMA_BRIDGE_PKEY, String::new()),
                (keys::REDEEM_TEMPLATE, String::new()),
            ])
            .unwrap();
    }

    #[test]
    fn test_transition_without_stored_session_fails() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("s.json");

        let record = run(&Commands::Start, &path, START_JSON).unwrap();
        assert_eq!(record.current_state, SessionState::SessionStarted);

        // Only the start keys are stored, so the session cannot be restored.
        let err = run(&Commands::BtcArrived, &path, empty()).unwrap_err();
        assert!(err.starts_with("no complete stored session"));

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(keys::SESSION_ID).as_deref(), Some("s1"));
        assert_eq!(
            store.get(keys::CURRENT_STATE).as_deref(),
            Some(encode(SessionState::SessionStarted))
        );
    }

    #[test]
    fn test_every_transition_requires_a_stored_session() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("s.json");
        let transitions = [
            Commands::BtcArrived,
            Commands::Minting,
            Commands::TimeoutMinting,
            Commands::TimeoutBtcNotSent,
            Commands::Minted {
                address: "rAddr".to_string(),
                pkey: "pKey".to_string(),
                template: "tmpl".to_string(),
            },
            Commands::Claimed,
        ];

        for command in &transitions {
            assert!(run(command, &path, empty()).is_err(), "{:?}", command);
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_commands_share_state_through_store() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("s.json");
        seed_session(&path, SessionState::SessionStarted);

        let record = run(&Commands::BtcArrived, &path, empty()).unwrap();
        assert_eq!(record.current_state, SessionState::MintingTBTC);
        assert_eq!(record.session_id, "s1");

        let record = run(
            &Commands::Minted {
                address: "rAddr".to_string(),
                pkey: "pKey".to_string(),
                template: "tmpl".to_string(),
            },
            &path,
            empty(),
        )
        .unwrap();
        assert_eq!(record.current_state, SessionState::WaitingForRedemption);
        assert_eq!(record.escrow_address, "addr1");

        let record = run(&Commands::Show, &path, empty()).unwrap();
        assert!(record.is_set);
        assert_eq!(record.session_id, "s1");
        assert_eq!(record.current_state, SessionState::WaitingForRedemption);

        let record = run(&Commands::Claimed, &path, empty()).unwrap();
        assert_eq!(record.current_state, SessionState::WaitingForClaim);
        assert_eq!(record.redeem_address, "rAddr");
    }

    #[test]
    fn test_start_requires_input() {
        let temp = tempdir().unwrap();
        let err = run(&Commands::Start, &temp.path().join("s.json"), empty()).unwrap_err();
        assert!(err.contains("StartSessionResponse"));
    }

    #[test]
    fn test_start_rejects_malformed_input() {
        let temp = tempdir().unwrap();
        let err = run(&Commands::Start, &temp.path().join("s.json"), &b"{\"sessionID\":1}"[..])
            .unwrap_err();
        assert!(err.starts_with("Failed to parse StartSessionResponse"));
    }
}
