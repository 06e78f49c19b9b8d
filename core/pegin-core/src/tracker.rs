//! The session tracker: one mutable record, persisted and published on every transition.
//!
//! ```text
//! caller event → transition::apply → store.set_many → observers → current record
//!    (signal)       (pure)             (writes)        (publish)     (swap)
//! ```
//!
//! A failed store write stops the transition before publishing, so observers
//! and the in-memory record never run ahead of what was persisted.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::observer::SessionObserver;
use crate::persist;
use crate::record::{RedeemDetails, SessionRecord, StartSessionResponse};
use crate::store::KeyValueStore;
use crate::transition::{self, SessionEvent};

pub struct SessionTracker<S: KeyValueStore> {
    store: S,
    current: SessionRecord,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<S: KeyValueStore> SessionTracker<S> {
    /// Starts with an unset record. Call [`SessionTracker::rehydrate`] to pick up a stored session.
    pub fn new(store: S) -> Self {
        SessionTracker {
            store,
            current: SessionRecord::unset(),
            observers: Vec::new(),
        }
    }

    pub fn subscribe<O: SessionObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub fn current(&self) -> &SessionRecord {
        &self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Restores the stored session if none is in memory yet.
    ///
    /// Publishes only when a complete session was found.
    pub fn rehydrate(&mut self) -> &SessionRecord {
        if let Some(record) = persist::rehydrate(&self.current, &self.store) {
            info!(
                session_id = %record.session_id,
                state = %record.current_state,
                "Session restored from store"
            );
            self.publish(&record);
            self.current = record;
        }
        &self.current
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<&SessionRecord> {
        let from = self.current.current_state;
        if !event.is_expected_from(from) {
            warn!(
                event = %event,
                from = %from,
                to = %event.target(),
                "Transition from unexpected state"
            );
        }

        let next = transition::apply(&self.current, &event);
        self.store.set_many(&event.writes(&next))?;

        debug!(
            event = %event,
            from = %from,
            to = %next.current_state,
            session_id = %next.session_id,
            "Session transition"
        );

        self.publish(&next);
        self.current = next;
        Ok(&self.current)
    }

    pub fn session_started(&mut self, response: StartSessionResponse) -> Result<&SessionRecord> {
        self.apply(SessionEvent::Started(response))
    }

    pub fn btc_arrived(&mut self) -> Result<&SessionRecord> {
        self.apply(SessionEvent::BtcArrived)
    }

    pub fn minting_btc(&mut self) -> Result<&SessionRecord> {
        self.apply(SessionEvent::Minting)
    }

    pub fn time_out_minting_btc(&mut self) -> Result<&SessionRecord> {
        self.apply(SessionEvent::MintingTimedOut)
    }

    pub fn time_out_btc_not_sent(&mut self) -> Result<&SessionRecord> {
        self.apply(SessionEvent::BtcNotSentTimedOut)
    }

    pub fn minted_btc(
        &mut self,
        address: &str,
        plasma_bridge_pkey: &str,
        redeem_template: &str,
    ) -> Result<&SessionRecord> {
        self.apply(SessionEvent::Minted(RedeemDetails {
            address: address.to_string(),
            plasma_bridge_pkey: plasma_bridge_pkey.to_string(),
            redeem_template: redeem_template.to_string(),
        }))
    }

    pub fn claimed_tbtc(&mut self) -> Result<&SessionRecord> {
        self.apply(SessionEvent::Claimed)
    }

    fn publish(&self, record: &SessionRecord) {
        for observer in &self.observers {
            observer.publish(record);
        }
    }
}
