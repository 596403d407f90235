//! Single-writer schedule state.
//!
//! # Responsibility
//! - Hold the authoritative in-memory `ScheduleCollection`.
//! - Route every mutation through one reducer entry point.
//! - Notify subscribers after each committed transition.
//!
//! # Invariants
//! - The store knows nothing about persistence or overlap rules.

pub mod reducer;
mod schedule_store;

pub use reducer::{reduce, ScheduleAction};
pub use schedule_store::ScheduleStore;
