//! Wall-clock time values, weekdays and time slots.
//!
//! # Responsibility
//! - Represent times with minute precision independent of any locale.
//! - Accept locale-formatted `hour:minute` strings on input.
//!
//! # Invariants
//! - `TimeOfDay` always has zero seconds.
//! - `TimeSlot` always satisfies `start < end` (half-open interval).

use crate::model::error::ValidationError;
use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use chrono::Weekday;

// Trailing AM/PM marker in any of "pm", " PM", "p.m.", "\u{202f}PM".
static MERIDIEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*([ap])\.?\s*m\.?$").expect("valid meridiem regex"));

const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"];

/// Wall-clock time with minute precision.
///
/// Serialized as zero-padded 24h `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Number of minutes in one day.
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Builds a time from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Result<Self, ValidationError> {
        NaiveTime::from_num_seconds_from_midnight_opt(u32::from(minutes) * 60, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTime(format!("{minutes} minutes")))
    }

    pub fn minutes(self) -> u16 {
        (self.0.num_seconds_from_midnight() / 60) as u16
    }

    /// Parses `HH:MM` (24h) or `h:MM AM/PM` (12h) text.
    ///
    /// Seconds are accepted and dropped.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let normalized = MERIDIEM_RE.replace(value.trim(), " ${1}M");
        TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(&normalized, format).ok())
            .map(Self::from)
            .ok_or_else(|| ValidationError::InvalidTime(value.to_string()))
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Truncates to the minute.
    fn from(value: NaiveTime) -> Self {
        let minute = value
            .with_second(0)
            .and_then(|time| time.with_nanosecond(0))
            .unwrap_or(value);
        Self(minute)
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// English name of `day`, as persisted.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses a full day name or its three-letter abbreviation, case-insensitive.
pub fn parse_weekday(value: &str) -> Result<Weekday, ValidationError> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| ValidationError::UnknownDay(value.to_string()))
}

/// Serde adapter writing weekdays as full English names.
pub(crate) mod weekday_name {
    use super::{day_name, parse_weekday, Weekday};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(day_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_weekday(&raw).map_err(serde::de::Error::custom)
    }
}

/// One contiguous interval `[start, end)` on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot")]
pub struct TimeSlot {
    #[serde(rename = "startTime")]
    start: TimeOfDay,
    #[serde(rename = "endTime")]
    end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawTimeSlot {
    #[serde(rename = "startTime")]
    start: TimeOfDay,
    #[serde(rename = "endTime")]
    end: TimeOfDay,
}

impl TimeSlot {
    /// Creates a slot, rejecting zero or negative length intervals.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds and creates a slot.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(TimeOfDay::parse(start)?, TimeOfDay::parse(end)?)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Length of the slot in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = ValidationError;

    fn try_from(value: RawTimeSlot) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for TimeSlot {
    type Err = ValidationError;

    /// Parses `HH:MM-HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| ValidationError::InvalidTime(s.to_string()))?;
        Self::parse(start, end)
    }
}
