//! In-progress schedule staging.
//!
//! A draft is what the user is editing before confirming. It may hold days
//! whose slot list was emptied again; those days are dropped on commit.
//! Slot mutation goes through `ScheduleService`, which validates first.

use crate::model::schedule::{ScheduleEntry, ScheduleId};
use crate::model::time::{TimeSlot, Weekday};

#[derive(Debug, Clone, PartialEq, Eq)]
struct DraftDay {
    day: Weekday,
    slots: Vec<TimeSlot>,
}

/// Mutable working copy of a schedule being added or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftSchedule {
    participant: String,
    days: Vec<DraftDay>,
    editing_id: Option<ScheduleId>,
}

impl DraftSchedule {
    /// Creates an empty draft for a new schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a draft pre-filled from a committed entry, targeting its id.
    pub fn from_entry(entry: &ScheduleEntry) -> Self {
        Self {
            participant: entry.participant().to_string(),
            days: entry
                .time_slots()
                .iter()
                .map(|day_slots| DraftDay {
                    day: day_slots.day(),
                    slots: day_slots.slots().to_vec(),
                })
                .collect(),
            editing_id: Some(entry.id().to_string()),
        }
    }

    pub fn participant(&self) -> &str {
        &self.participant
    }

    pub fn set_participant(&mut self, participant: impl Into<String>) {
        self.participant = participant.into();
    }

    /// Id of the committed entry this draft will replace, if editing.
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Working slots of `day`; empty when the day was never touched.
    pub fn slots(&self, day: Weekday) -> &[TimeSlot] {
        self.days
            .iter()
            .find(|entry| entry.day == day)
            .map(|entry| entry.slots.as_slice())
            .unwrap_or(&[])
    }

    /// Days in first-touched order with their working slots.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[TimeSlot])> {
        self.days
            .iter()
            .map(|entry| (entry.day, entry.slots.as_slice()))
    }

    /// Whether any day currently holds at least one slot.
    pub fn has_slots(&self) -> bool {
        self.days.iter().any(|entry| !entry.slots.is_empty())
    }

    /// Appends without validation; callers must check overlap first.
    pub(crate) fn push_slot(&mut self, day: Weekday, slot: TimeSlot) {
        match self.days.iter_mut().find(|entry| entry.day == day) {
            Some(entry) => entry.slots.push(slot),
            None => self.days.push(DraftDay {
                day,
                slots: vec![slot],
            }),
        }
    }

    /// Removes the slot at `index` of `day`, keeping the remaining order.
    pub(crate) fn remove_slot(&mut self, day: Weekday, index: usize) -> Option<TimeSlot> {
        let entry = self.days.iter_mut().find(|entry| entry.day == day)?;
        if index >= entry.slots.len() {
            return None;
        }
        Some(entry.slots.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::DraftSchedule;
    use crate::model::schedule::{DaySlots, ScheduleEntry};
    use crate::model::time::{TimeSlot, Weekday};

    fn slot(value: &str) -> TimeSlot {
        value.parse().expect("valid slot")
    }

    #[test]
    fn push_keeps_first_touched_day_order() {
        let mut draft = DraftSchedule::new();
        draft.push_slot(Weekday::Fri, slot("09:00-10:00"));
        draft.push_slot(Weekday::Mon, slot("09:00-10:00"));
        draft.push_slot(Weekday::Fri, slot("11:00-12:00"));

        let days: Vec<_> = draft.days().map(|(day, slots)| (day, slots.len())).collect();
        assert_eq!(days, vec![(Weekday::Fri, 2), (Weekday::Mon, 1)]);
    }

    #[test]
    fn remove_out_of_range_returns_none() {
        let mut draft = DraftSchedule::new();
        assert!(draft.remove_slot(Weekday::Mon, 0).is_none());
        draft.push_slot(Weekday::Mon, slot("09:00-10:00"));
        assert!(draft.remove_slot(Weekday::Mon, 1).is_none());
        assert_eq!(draft.remove_slot(Weekday::Mon, 0), Some(slot("09:00-10:00")));
        assert!(!draft.has_slots());
        assert!(draft.slots(Weekday::Mon).is_empty());
    }

    #[test]
    fn from_entry_targets_entry_id() {
        let entry = ScheduleEntry::new(
            "42",
            "Alice",
            vec![DaySlots::new(Weekday::Sun, vec![slot("20:00-21:00")]).unwrap()],
        )
        .unwrap();
        let draft = DraftSchedule::from_entry(&entry);
        assert_eq!(draft.editing_id(), Some("42"));
        assert_eq!(draft.participant(), "Alice");
        assert_eq!(draft.slots(Weekday::Sun), &[slot("20:00-21:00")]);
    }
}
