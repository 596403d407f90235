//! Model-level validation errors.

use crate::model::schedule::ScheduleId;
use crate::model::time::{day_name, TimeOfDay, TimeSlot, Weekday};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Violation of a model invariant.
///
/// Returned by constructors and by serde decoding, so corrupt persisted
/// data is rejected with the same messages as bad user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Time string could not be parsed into a wall-clock minute.
    InvalidTime(String),
    /// Day name is not one of the seven weekdays.
    UnknownDay(String),
    /// Slot whose start is not strictly before its end.
    InvalidInterval { start: TimeOfDay, end: TimeOfDay },
    /// Day entry without any slot.
    EmptyDay(Weekday),
    /// Two slots of the same day intersect.
    OverlappingSlots {
        day: Weekday,
        first: TimeSlot,
        second: TimeSlot,
    },
    /// Schedule id is blank.
    EmptyId,
    /// Participant name is blank.
    EmptyParticipant,
    /// Schedule has no day with slots.
    NoDays,
    /// Same day listed twice in one schedule.
    DuplicateDay(Weekday),
    /// Same schedule id listed twice in one collection.
    DuplicateId(ScheduleId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTime(value) => write!(f, "invalid time of day: `{value}`"),
            Self::UnknownDay(value) => write!(f, "unknown weekday: `{value}`"),
            Self::InvalidInterval { start, end } => {
                write!(f, "slot end ({end}) must be after slot start ({start})")
            }
            Self::EmptyDay(day) => write!(f, "{} has no time slots", day_name(*day)),
            Self::OverlappingSlots { day, first, second } => {
                write!(f, "{} slots overlap: {first} and {second}", day_name(*day))
            }
            Self::EmptyId => write!(f, "schedule id cannot be empty"),
            Self::EmptyParticipant => write!(f, "participant cannot be empty"),
            Self::NoDays => write!(f, "schedule must contain at least one day"),
            Self::DuplicateDay(day) => write!(f, "{} listed more than once", day_name(*day)),
            Self::DuplicateId(id) => write!(f, "duplicate schedule id: {id}"),
        }
    }
}

impl Error for ValidationError {}
