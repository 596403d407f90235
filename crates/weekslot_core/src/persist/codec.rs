//! JSON encoding of the persisted collection.
//!
//! Layout: an array of `{ id, participant, timeSlots: [{ day, slots:
//! [{ startTime, endTime }] }] }`, times as `HH:MM` text.
//!
//! Older writers left days with an empty `slots` list behind after the last
//! slot of a day was removed. Decoding drops those days, and drops entries
//! left without any day, instead of rejecting the whole snapshot.

use crate::model::error::ValidationError;
use crate::model::schedule::{DaySlots, ScheduleCollection, ScheduleEntry, ScheduleId};
use crate::model::time::{weekday_name, TimeSlot, Weekday};
use crate::persist::error::PersistError;
use log::warn;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    id: ScheduleId,
    participant: String,
    time_slots: Vec<StoredDay>,
}

#[derive(Deserialize)]
struct StoredDay {
    #[serde(with = "weekday_name")]
    day: Weekday,
    slots: Vec<TimeSlot>,
}

fn decode_err(err: ValidationError) -> PersistError {
    PersistError::Decode(err.to_string())
}

/// Encodes the full collection for a snapshot write.
pub fn encode_collection(collection: &ScheduleCollection) -> Result<String, PersistError> {
    serde_json::to_string(collection).map_err(|err| PersistError::Encode(err.to_string()))
}

/// Decodes a stored snapshot, enforcing every model invariant.
///
/// Empty days are dropped first; any remaining violation rejects the
/// snapshot.
pub fn decode_collection(raw: &str) -> Result<ScheduleCollection, PersistError> {
    let stored: Vec<StoredEntry> =
        serde_json::from_str(raw).map_err(|err| PersistError::Decode(err.to_string()))?;

    let mut dropped_days = 0usize;
    let mut dropped_entries = Vec::new();
    let mut entries = Vec::with_capacity(stored.len());
    for entry in stored {
        let mut days = Vec::with_capacity(entry.time_slots.len());
        for day in entry.time_slots {
            if day.slots.is_empty() {
                dropped_days += 1;
                continue;
            }
            days.push(DaySlots::new(day.day, day.slots).map_err(decode_err)?);
        }
        if days.is_empty() {
            dropped_entries.push(entry.id);
            continue;
        }
        entries.push(ScheduleEntry::new(entry.id, entry.participant, days).map_err(decode_err)?);
    }

    if dropped_days > 0 || !dropped_entries.is_empty() {
        warn!(
            "event=decode_normalize module=persist status=dropped empty_days={} \
             entries_without_days={} ids={}",
            dropped_days,
            dropped_entries.len(),
            dropped_entries.join(",")
        );
    }
    ScheduleCollection::from_entries(entries).map_err(decode_err)
}

#[cfg(test)]
mod tests {
    use super::{decode_collection, encode_collection};
    use crate::model::time::Weekday;
    use crate::persist::error::PersistError;

    const LEGACY: &str = r#"[
        {"id":"1700000000000","participant":"Alice","timeSlots":[
            {"day":"Monday","slots":[{"startTime":"09:00 AM","endTime":"10:30 AM"}]},
            {"day":"Friday","slots":[{"startTime":"06:00 PM","endTime":"07:00 PM"}]}
        ]}
    ]"#;

    #[test]
    fn decodes_locale_formatted_times_and_reencodes_as_24h() {
        let collection = decode_collection(LEGACY).unwrap();
        let entry = collection.get("1700000000000").unwrap();
        assert_eq!(entry.participant(), "Alice");
        let friday = entry.slots_for(Weekday::Fri).unwrap();
        assert_eq!(friday[0].to_string(), "18:00-19:00");

        let encoded: serde_json::Value =
            serde_json::from_str(&encode_collection(&collection).unwrap()).unwrap();
        assert_eq!(
            encoded[0]["timeSlots"][0],
            serde_json::json!({
                "day": "Monday",
                "slots": [{"startTime": "09:00", "endTime": "10:30"}]
            })
        );
        assert_eq!(decode_collection(&encoded.to_string()).unwrap(), collection);
    }

    #[test]
    fn rejects_corrupt_and_invariant_breaking_payloads() {
        let cases = [
            "not json",
            r#"{"id":"1"}"#,
            r#"[{"id":"1","participant":"A","timeSlots":[{"day":"Someday","slots":[]}]}]"#,
            r#"[{"id":"1","participant":"A","timeSlots":[{"day":"Monday","slots":[
                {"startTime":"09:00","endTime":"10:00"},{"startTime":"09:30","endTime":"11:00"}]}]}]"#,
            r#"[{"id":"1","participant":"A","timeSlots":[{"day":"Monday","slots":[{"startTime":"09:00","endTime":"10:00"}]}]},
                {"id":"1","participant":"B","timeSlots":[{"day":"Monday","slots":[{"startTime":"09:00","endTime":"10:00"}]}]}]"#,
        ];
        for raw in cases {
            assert!(
                matches!(decode_collection(raw), Err(PersistError::Decode(_))),
                "payload should be rejected: {raw}"
            );
        }
    }

    #[test]
    fn empty_days_are_dropped_instead_of_rejecting_the_snapshot() {
        let raw = r#"[
            {"id":"1","participant":"Alice","timeSlots":[
                {"day":"Monday","slots":[{"startTime":"09:00","endTime":"10:00"}]},
                {"day":"Tuesday","slots":[]}]},
            {"id":"2","participant":"Bob","timeSlots":[{"day":"Sunday","slots":[]}]},
            {"id":"3","participant":"Cleo","timeSlots":[
                {"day":"Friday","slots":[{"startTime":"18:00","endTime":"19:00"}]}]}
        ]"#;

        let collection = decode_collection(raw).unwrap();
        let ids: Vec<&str> = collection.iter().map(|entry| entry.id()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        let alice = collection.get("1").unwrap();
        assert_eq!(alice.time_slots().len(), 1);
        assert!(alice.slots_for(Weekday::Tue).is_none());
    }

    #[test]
    fn empty_array_is_an_empty_collection() {
        assert!(decode_collection("[]").unwrap().is_empty());
        assert_eq!(encode_collection(&Default::default()).unwrap(), "[]");
    }
}
