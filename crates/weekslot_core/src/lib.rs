//! Core domain logic for weekly participant schedules.
//! This crate is the single source of truth for schedule invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;
pub mod validator;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::draft::DraftSchedule;
pub use model::error::ValidationError;
pub use model::schedule::{DaySlots, ScheduleCollection, ScheduleEntry, ScheduleId};
pub use model::time::{day_name, parse_weekday, TimeOfDay, TimeSlot, Weekday};
pub use persist::{
    KeyValueStore, KvError, KvResult, MemoryKeyValueStore, PersistError, PersistenceBridge,
    SqliteKeyValueStore, DEFAULT_STORAGE_KEY,
};
pub use service::{EmptyField, ScheduleRequest, ScheduleService, ScheduleServiceError};
pub use store::{reduce, ScheduleAction, ScheduleStore};
pub use validator::{can_insert, overlaps};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
