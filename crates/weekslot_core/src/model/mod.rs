//! Schedule domain model.
//!
//! # Responsibility
//! - Define canonical data structures for weekly participant schedules.
//! - Enforce structural invariants at construction and decode time.
//!
//! # Invariants
//! - A `TimeSlot` always satisfies `start < end`.
//! - A `DaySlots` is never empty and never holds overlapping slots.
//! - A `ScheduleEntry` never repeats a day; a `ScheduleCollection` never
//!   repeats an id.
//! - `DraftSchedule` is staging only; nothing in it is committed until the
//!   service turns it into a `ScheduleEntry`.

pub mod draft;
pub mod error;
pub mod schedule;
pub mod time;
