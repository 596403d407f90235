//! Pure schedule state transitions.
//!
//! # Invariants
//! - `reduce` never mutates its input and has no side effects.
//! - Unknown ids make `Update`/`Delete` a no-op, not an error.
//! - Overlap and uniqueness checks happen before dispatch, not here.

use crate::model::schedule::{ScheduleCollection, ScheduleEntry, ScheduleId};

/// State transition request for the schedule collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleAction {
    /// Replace the whole collection (hydrate from storage, bulk edits).
    ReplaceAll(ScheduleCollection),
    /// Append an entry whose id is not in the collection yet.
    Add(ScheduleEntry),
    /// Replace the entry with the same id, keeping its position.
    Update(ScheduleEntry),
    /// Remove the entry with this id.
    Delete(ScheduleId),
}

impl ScheduleAction {
    /// Stable action name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplaceAll(_) => "replace_all",
            Self::Add(_) => "add",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Computes the next collection for `action`.
pub fn reduce(collection: &ScheduleCollection, action: ScheduleAction) -> ScheduleCollection {
    match action {
        ScheduleAction::ReplaceAll(next) => next,
        ScheduleAction::Add(entry) => {
            let mut entries = collection.entries().to_vec();
            entries.push(entry);
            ScheduleCollection::from_trusted(entries)
        }
        ScheduleAction::Update(entry) => ScheduleCollection::from_trusted(
            collection
                .iter()
                .map(|existing| {
                    if existing.id() == entry.id() {
                        entry.clone()
                    } else {
                        existing.clone()
                    }
                })
                .collect(),
        ),
        ScheduleAction::Delete(id) => ScheduleCollection::from_trusted(
            collection
                .iter()
                .filter(|existing| existing.id() != id)
                .cloned()
                .collect(),
        ),
    }
}
