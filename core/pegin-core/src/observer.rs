//! Observer hookup for whatever renders session state.

use crate::record::SessionRecord;

/// Receives the full record after every transition.
///
/// Called once per transition, after the store writes for it have completed.
/// Each call replaces whatever the observer held before.
pub trait SessionObserver: Send + Sync {
    fn publish(&self, record: &SessionRecord);
}

impl<F> SessionObserver for F
where
    F: Fn(&SessionRecord) + Send + Sync,
{
    fn publish(&self, record: &SessionRecord) {
        self(record)
    }
}
