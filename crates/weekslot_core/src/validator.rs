//! Time-slot overlap rules.
//!
//! # Invariants
//! - Slots are half-open: touching at a shared boundary is not an overlap.
//! - Functions here are pure and never allocate.

use crate::model::time::TimeSlot;

/// Returns whether two slots share more than a boundary point.
pub fn overlaps(a: &TimeSlot, b: &TimeSlot) -> bool {
    a.start() < b.end() && b.start() < a.end()
}

/// Returns whether `candidate` may join `existing` without overlapping.
///
/// An identical slot is rejected because it overlaps itself.
pub fn can_insert(existing: &[TimeSlot], candidate: &TimeSlot) -> bool {
    candidate.start() < candidate.end() && find_overlap(existing, candidate).is_none()
}

/// Returns the first slot in `existing` that intersects `candidate`.
pub fn find_overlap<'a>(existing: &'a [TimeSlot], candidate: &TimeSlot) -> Option<&'a TimeSlot> {
    existing.iter().find(|slot| overlaps(slot, candidate))
}

/// Returns the first pair `(earlier, later)` of intersecting slots, by position.
pub fn first_overlapping_pair(slots: &[TimeSlot]) -> Option<(&TimeSlot, &TimeSlot)> {
    slots.iter().enumerate().find_map(|(index, later)| {
        find_overlap(&slots[..index], later).map(|earlier| (earlier, later))
    })
}

#[cfg(test)]
mod tests {
    use super::{can_insert, find_overlap, first_overlapping_pair, overlaps};
    use crate::model::time::TimeSlot;

    fn slot(value: &str) -> TimeSlot {
        value.parse().expect("valid slot")
    }

    #[test]
    fn touching_boundaries_do_not_overlap() {
        assert!(!overlaps(&slot("09:00-10:00"), &slot("10:00-11:00")));
        assert!(!overlaps(&slot("10:00-11:00"), &slot("09:00-10:00")));
        assert!(!overlaps(&slot("08:00-09:00"), &slot("13:00-14:00")));
    }

    #[test]
    fn intersecting_intervals_overlap_both_ways() {
        let cases = [
            ("09:00-10:00", "09:30-10:30"),
            ("09:00-12:00", "10:00-11:00"),
            ("09:00-10:00", "09:00-10:00"),
            ("09:00-09:01", "08:00-23:00"),
        ];
        for (a, b) in cases {
            assert!(overlaps(&slot(a), &slot(b)), "{a} vs {b}");
            assert!(overlaps(&slot(b), &slot(a)), "{b} vs {a}");
        }
    }

    #[test]
    fn empty_day_accepts_any_valid_slot() {
        assert!(can_insert(&[], &slot("00:00-23:59")));
    }

    #[test]
    fn identical_slot_is_rejected() {
        let existing = [slot("09:00-10:00")];
        assert!(!can_insert(&existing, &slot("09:00-10:00")));
    }

    #[test]
    fn reports_conflicting_slot() {
        let existing = [slot("08:00-09:00"), slot("12:00-13:00")];
        assert_eq!(
            find_overlap(&existing, &slot("12:30-14:00")),
            Some(&existing[1])
        );
        assert!(can_insert(&existing, &slot("09:00-12:00")));
    }

    #[test]
    fn finds_first_overlapping_pair() {
        let slots = [slot("08:00-09:00"), slot("10:00-11:00"), slot("08:30-08:45")];
        assert_eq!(first_overlapping_pair(&slots), Some((&slots[0], &slots[2])));
        assert_eq!(first_overlapping_pair(&slots[..2]), None);
    }
}
