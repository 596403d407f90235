//! Authoritative collection holder with change notification.

use crate::model::schedule::ScheduleCollection;
use crate::store::reducer::{reduce, ScheduleAction};
use log::debug;
use tokio::sync::watch;

/// Owns the current collection; the only place state changes happen.
///
/// Subscribers receive the full collection after every `dispatch`.
pub struct ScheduleStore {
    state: ScheduleCollection,
    notifier: watch::Sender<ScheduleCollection>,
}

impl ScheduleStore {
    /// Creates a store holding `initial`.
    pub fn new(initial: ScheduleCollection) -> Self {
        let (notifier, _) = watch::channel(initial.clone());
        Self {
            state: initial,
            notifier,
        }
    }

    /// Current committed collection.
    pub fn state(&self) -> &ScheduleCollection {
        &self.state
    }

    /// Applies `action`, publishes the result and returns it.
    pub fn dispatch(&mut self, action: ScheduleAction) -> &ScheduleCollection {
        let action_name = action.name();
        let previous_len = self.state.len();
        self.state = reduce(&self.state, action);
        // send_replace succeeds even with no live receivers
        self.notifier.send_replace(self.state.clone());
        debug!(
            "event=store_dispatch module=store status=ok action={} len_before={} len_after={}",
            action_name,
            previous_len,
            self.state.len()
        );
        &self.state
    }

    /// Returns a receiver that observes every committed collection.
    pub fn subscribe(&self) -> watch::Receiver<ScheduleCollection> {
        self.notifier.subscribe()
    }
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new(ScheduleCollection::new())
    }
}

#[cfg(test)]
mod tests {
    use super::ScheduleStore;
    use crate::model::schedule::{DaySlots, ScheduleEntry};
    use crate::model::time::Weekday;
    use crate::store::ScheduleAction;

    fn entry(id: &str) -> ScheduleEntry {
        ScheduleEntry::new(
            id,
            "Alice",
            vec![DaySlots::new(Weekday::Mon, vec!["09:00-10:00".parse().unwrap()]).unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn dispatch_updates_state_and_notifies() {
        let mut store = ScheduleStore::default();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.dispatch(ScheduleAction::Add(entry("1")));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
        assert_eq!(store.state().len(), 1);

        store.dispatch(ScheduleAction::Delete("1".to_string()));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn noop_transitions_still_notify() {
        let mut store = ScheduleStore::default();
        let mut rx = store.subscribe();
        store.dispatch(ScheduleAction::Delete("missing".to_string()));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }
}
