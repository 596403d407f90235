//! Core use-case services.
//!
//! # Responsibility
//! - Expose command-level APIs to presentation layers.
//! - Keep callers decoupled from reducer and storage details.

pub mod schedule_service;

pub use schedule_service::{EmptyField, ScheduleRequest, ScheduleService, ScheduleServiceError};
