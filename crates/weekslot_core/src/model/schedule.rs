//! Committed schedule records.
//!
//! # Responsibility
//! - Define the persisted shape of one participant's weekly schedule.
//! - Define the ordered collection that is persisted as a single unit.
//!
//! # Invariants
//! - `id` is stable for the lifetime of an entry and unique in a collection.
//! - Entries are never mutated in place; updates replace them wholesale.
//! - Decoding runs the same checks as the constructors.

use crate::model::error::ValidationError;
use crate::model::time::{weekday_name, TimeSlot, Weekday};
use crate::validator::first_overlapping_pair;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use uuid::Uuid;

/// Identifier of one schedule entry.
///
/// Freshly created entries use UUID v4 text; ids read from storage may be
/// any non-empty string.
pub type ScheduleId = String;

/// Generates a new unique schedule id.
pub fn new_schedule_id() -> ScheduleId {
    Uuid::new_v4().to_string()
}

/// Non-empty, non-overlapping slots for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDaySlots")]
pub struct DaySlots {
    #[serde(with = "weekday_name")]
    day: Weekday,
    slots: Vec<TimeSlot>,
}

#[derive(Deserialize)]
struct RawDaySlots {
    #[serde(with = "weekday_name")]
    day: Weekday,
    slots: Vec<TimeSlot>,
}

impl DaySlots {
    /// Creates a day entry, keeping slot order as given.
    pub fn new(day: Weekday, slots: Vec<TimeSlot>) -> Result<Self, ValidationError> {
        if slots.is_empty() {
            return Err(ValidationError::EmptyDay(day));
        }
        if let Some((first, second)) = first_overlapping_pair(&slots) {
            return Err(ValidationError::OverlappingSlots {
                day,
                first: *first,
                second: *second,
            });
        }
        Ok(Self { day, slots })
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }
}

impl TryFrom<RawDaySlots> for DaySlots {
    type Error = ValidationError;

    fn try_from(value: RawDaySlots) -> Result<Self, Self::Error> {
        Self::new(value.day, value.slots)
    }
}

/// One participant's committed weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScheduleEntry", rename_all = "camelCase")]
pub struct ScheduleEntry {
    id: ScheduleId,
    participant: String,
    time_slots: Vec<DaySlots>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScheduleEntry {
    id: ScheduleId,
    participant: String,
    time_slots: Vec<DaySlots>,
}

impl ScheduleEntry {
    /// Creates an entry with a caller-provided id.
    ///
    /// # Errors
    /// - Blank `id` or `participant`.
    /// - Empty `time_slots` or a day listed twice.
    pub fn new(
        id: impl Into<ScheduleId>,
        participant: impl Into<String>,
        time_slots: Vec<DaySlots>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        let participant = participant.into();

        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if participant.trim().is_empty() {
            return Err(ValidationError::EmptyParticipant);
        }
        if time_slots.is_empty() {
            return Err(ValidationError::NoDays);
        }
        let mut seen = HashSet::with_capacity(time_slots.len());
        for day_slots in &time_slots {
            if !seen.insert(day_slots.day()) {
                return Err(ValidationError::DuplicateDay(day_slots.day()));
            }
        }

        Ok(Self {
            id,
            participant,
            time_slots,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn participant(&self) -> &str {
        &self.participant
    }

    /// Day entries in insertion order.
    pub fn time_slots(&self) -> &[DaySlots] {
        &self.time_slots
    }

    /// Slots scheduled on `day`, if any.
    pub fn slots_for(&self, day: Weekday) -> Option<&[TimeSlot]> {
        self.time_slots
            .iter()
            .find(|entry| entry.day() == day)
            .map(DaySlots::slots)
    }

    /// Total number of slots across all days.
    pub fn slot_count(&self) -> usize {
        self.time_slots.iter().map(|entry| entry.slots().len()).sum()
    }
}

impl TryFrom<RawScheduleEntry> for ScheduleEntry {
    type Error = ValidationError;

    fn try_from(value: RawScheduleEntry) -> Result<Self, Self::Error> {
        Self::new(value.id, value.participant, value.time_slots)
    }
}

/// Ordered schedule entries keyed by unique id.
///
/// Serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<ScheduleEntry>")]
pub struct ScheduleCollection {
    entries: Vec<ScheduleEntry>,
}

impl ScheduleCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection, rejecting duplicate ids.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id()) {
                return Err(ValidationError::DuplicateId(entry.id().to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// Wraps entries whose id uniqueness is guaranteed by the caller.
    pub(crate) fn from_trusted(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn into_entries(self) -> Vec<ScheduleEntry> {
        self.entries
    }
}

impl TryFrom<Vec<ScheduleEntry>> for ScheduleCollection {
    type Error = ValidationError;

    fn try_from(value: Vec<ScheduleEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(value)
    }
}

impl Serialize for ScheduleCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a ScheduleCollection {
    type Item = &'a ScheduleEntry;
    type IntoIter = std::slice::Iter<'a, ScheduleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{new_schedule_id, DaySlots, ScheduleCollection, ScheduleEntry};
    use crate::model::error::ValidationError;
    use crate::model::time::{TimeSlot, Weekday};

    fn slot(value: &str) -> TimeSlot {
        value.parse().expect("valid slot")
    }

    fn monday() -> DaySlots {
        DaySlots::new(Weekday::Mon, vec![slot("09:00-10:00")]).unwrap()
    }

    #[test]
    fn day_slots_reject_empty_and_overlapping() {
        assert_eq!(
            DaySlots::new(Weekday::Tue, vec![]).unwrap_err(),
            ValidationError::EmptyDay(Weekday::Tue)
        );
        let err = DaySlots::new(
            Weekday::Tue,
            vec![slot("09:00-10:00"), slot("10:00-11:00"), slot("10:30-12:00")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::OverlappingSlots {
                day: Weekday::Tue,
                first: slot("10:00-11:00"),
                second: slot("10:30-12:00"),
            }
        );
    }

    #[test]
    fn entry_rejects_blank_fields_and_duplicate_days() {
        assert_eq!(
            ScheduleEntry::new("  ", "Alice", vec![monday()]).unwrap_err(),
            ValidationError::EmptyId
        );
        assert_eq!(
            ScheduleEntry::new("1", " ", vec![monday()]).unwrap_err(),
            ValidationError::EmptyParticipant
        );
        assert_eq!(
            ScheduleEntry::new("1", "Alice", vec![]).unwrap_err(),
            ValidationError::NoDays
        );
        assert_eq!(
            ScheduleEntry::new("1", "Alice", vec![monday(), monday()]).unwrap_err(),
            ValidationError::DuplicateDay(Weekday::Mon)
        );
    }

    #[test]
    fn entry_lookup_helpers() {
        let tuesday = DaySlots::new(
            Weekday::Tue,
            vec![slot("08:00-09:00"), slot("18:00-19:00")],
        )
        .unwrap();
        let entry = ScheduleEntry::new("1", "Alice", vec![monday(), tuesday]).unwrap();
        assert_eq!(entry.slot_count(), 3);
        assert_eq!(entry.slots_for(Weekday::Tue).map(<[_]>::len), Some(2));
        assert!(entry.slots_for(Weekday::Sun).is_none());
    }

    #[test]
    fn collection_rejects_duplicate_ids() {
        let a = ScheduleEntry::new("same", "Alice", vec![monday()]).unwrap();
        let b = ScheduleEntry::new("same", "Bob", vec![monday()]).unwrap();
        assert_eq!(
            ScheduleCollection::from_entries(vec![a, b]).unwrap_err(),
            ValidationError::DuplicateId("same".to_string())
        );
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(new_schedule_id(), new_schedule_id());
    }
}
