//! Schedule use-case service.
//!
//! # Responsibility
//! - Validate user commands before any state transition.
//! - Dispatch reducer actions through the single `ScheduleStore`.
//! - Queue a durable snapshot after every committed transition.
//! - Own the draft used by the add/edit flow.
//!
//! # Invariants
//! - A service exists only after the stored collection was loaded, so no
//!   mutation can race the initial load.
//! - Validation errors are returned to the caller; persistence errors are
//!   logged by the bridge and never undo a committed transition.

use crate::model::draft::DraftSchedule;
use crate::model::error::ValidationError;
use crate::model::schedule::{
    new_schedule_id, DaySlots, ScheduleCollection, ScheduleEntry, ScheduleId,
};
use crate::model::time::{day_name, TimeOfDay, TimeSlot, Weekday};
use crate::persist::{KeyValueStore, PersistError, PersistenceBridge};
use crate::store::{ScheduleAction, ScheduleStore};
use crate::validator::find_overlap;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::watch;

/// Required input that was left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyField {
    Participant,
    Days,
}

/// Error returned by schedule commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleServiceError {
    /// Slot start is not before its end.
    InvalidInterval { start: TimeOfDay, end: TimeOfDay },
    /// Candidate slot intersects a slot already staged for the day.
    Overlap {
        day: Weekday,
        candidate: TimeSlot,
        existing: TimeSlot,
    },
    /// Participant missing or no day selected.
    EmptyField(EmptyField),
    /// No staged slot at this position.
    IndexOutOfRange {
        day: Weekday,
        index: usize,
        len: usize,
    },
    /// No committed schedule with this id.
    NotFound(ScheduleId),
    /// Any other model rule violation, such as a day listed twice.
    Invalid(ValidationError),
}

impl Display for ScheduleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInterval { start, end } => {
                write!(f, "end time {end} must be after start time {start}")
            }
            Self::Overlap {
                day,
                candidate,
                existing,
            } => write!(f, "{candidate} overlaps {existing} on {}", day_name(*day)),
            Self::EmptyField(EmptyField::Participant) => write!(f, "participant is required"),
            Self::EmptyField(EmptyField::Days) => {
                write!(f, "at least one day with a time slot is required")
            }
            Self::IndexOutOfRange { day, index, len } => {
                write!(f, "{} has no slot #{index} (it has {len})", day_name(*day))
            }
            Self::NotFound(id) => write!(f, "schedule not found: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ScheduleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ScheduleServiceError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::InvalidInterval { start, end } => Self::InvalidInterval { start, end },
            ValidationError::OverlappingSlots { day, first, second } => Self::Overlap {
                day,
                candidate: second,
                existing: first,
            },
            ValidationError::EmptyParticipant => Self::EmptyField(EmptyField::Participant),
            ValidationError::NoDays => Self::EmptyField(EmptyField::Days),
            other => Self::Invalid(other),
        }
    }
}

/// Input for `ScheduleService::add_or_update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub participant: String,
    /// Per-day slots in display order.
    pub time_slots: Vec<DaySlots>,
    /// Target of an update; a missing or unknown id creates a new entry.
    pub editing_id: Option<ScheduleId>,
}

impl ScheduleRequest {
    pub fn new(participant: impl Into<String>, time_slots: Vec<DaySlots>) -> Self {
        Self {
            participant: participant.into(),
            time_slots,
            editing_id: None,
        }
    }

    /// Targets the committed entry `id`.
    pub fn editing(mut self, id: impl Into<ScheduleId>) -> Self {
        self.editing_id = Some(id.into());
        self
    }

    /// Builds a request from a draft, dropping days left without slots.
    pub fn from_draft(draft: &DraftSchedule) -> Result<Self, ValidationError> {
        let time_slots = draft
            .days()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(day, slots)| DaySlots::new(day, slots.to_vec()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            participant: draft.participant().to_string(),
            time_slots,
            editing_id: draft.editing_id().map(str::to_string),
        })
    }
}

/// Facade used by presentation layers.
pub struct ScheduleService {
    store: ScheduleStore,
    bridge: PersistenceBridge,
    draft: DraftSchedule,
}

impl ScheduleService {
    /// Loads the stored collection and returns a ready service.
    ///
    /// Missing or undecodable stored data starts an empty collection and
    /// leaves the stored value untouched. Loaded data is written back in
    /// its normalized form.
    pub async fn start(bridge: PersistenceBridge) -> Self {
        let mut store = ScheduleStore::default();
        if let Some(loaded) = bridge.load().await {
            let hydrated = store.dispatch(ScheduleAction::ReplaceAll(loaded)).clone();
            bridge.save(hydrated);
        }
        info!(
            "event=service_start module=service status=ok key={} count={}",
            bridge.key(),
            store.state().len()
        );
        Self {
            store,
            bridge,
            draft: DraftSchedule::new(),
        }
    }

    /// Creates the bridge for `store` under `key` and starts the service.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Result<Self, PersistError> {
        let bridge = PersistenceBridge::new(store, key)?;
        Ok(Self::start(bridge).await)
    }

    /// Current committed collection.
    pub fn collection(&self) -> &ScheduleCollection {
        self.store.state()
    }

    /// Receiver notified with the full collection after every transition.
    pub fn subscribe(&self) -> watch::Receiver<ScheduleCollection> {
        self.store.subscribe()
    }

    /// Current draft.
    pub fn draft(&self) -> &DraftSchedule {
        &self.draft
    }

    /// Creates a new entry, or replaces the one named by `editing_id`.
    ///
    /// # Errors
    /// - `EmptyField` for a blank participant or no days.
    /// - `Overlap`/`Invalid` when the day slots break model rules.
    pub fn add_or_update(
        &mut self,
        request: ScheduleRequest,
    ) -> Result<ScheduleEntry, ScheduleServiceError> {
        let participant = request.participant.trim();
        if participant.is_empty() {
            return Err(ScheduleServiceError::EmptyField(EmptyField::Participant));
        }
        if request.time_slots.is_empty() {
            return Err(ScheduleServiceError::EmptyField(EmptyField::Days));
        }

        let update_id = match request.editing_id {
            Some(id) if self.store.state().contains(&id) => Some(id),
            Some(id) => {
                warn!(
                    "event=schedule_update module=service status=fallback_add missing_id={id}"
                );
                None
            }
            None => None,
        };

        let entry = match update_id {
            Some(id) => {
                let entry = ScheduleEntry::new(id, participant, request.time_slots)?;
                self.commit(ScheduleAction::Update(entry.clone()));
                entry
            }
            None => {
                let entry = ScheduleEntry::new(self.fresh_id(), participant, request.time_slots)?;
                self.commit(ScheduleAction::Add(entry.clone()));
                entry
            }
        };

        info!(
            "event=schedule_commit module=service status=ok id={} days={} slots={}",
            entry.id(),
            entry.time_slots().len(),
            entry.slot_count()
        );
        Ok(entry)
    }

    /// Commits the draft through `add_or_update` and clears it on success.
    pub fn commit_draft(&mut self) -> Result<ScheduleEntry, ScheduleServiceError> {
        let request = ScheduleRequest::from_draft(&self.draft)?;
        let entry = self.add_or_update(request)?;
        self.draft = DraftSchedule::new();
        Ok(entry)
    }

    /// Deletes the entry `id`; unknown ids leave the collection unchanged.
    ///
    /// Confirmation is the caller's job. Returns whether an entry was removed.
    pub fn delete_schedule(&mut self, id: &str) -> bool {
        let existed = self.store.state().contains(id);
        self.commit(ScheduleAction::Delete(id.to_string()));
        info!("event=schedule_delete module=service status=ok id={id} existed={existed}");
        existed
    }

    /// Replaces the whole collection.
    pub fn replace_all(&mut self, collection: ScheduleCollection) {
        let count = collection.len();
        self.commit(ScheduleAction::ReplaceAll(collection));
        info!("event=schedule_replace_all module=service status=ok count={count}");
    }

    /// Stages a slot on `day` in the draft.
    ///
    /// # Errors
    /// - `InvalidInterval` when `start >= end`.
    /// - `Overlap` when the slot intersects one already staged for `day`.
    pub fn add_time_slot(
        &mut self,
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<TimeSlot, ScheduleServiceError> {
        let candidate = TimeSlot::new(start, end)?;
        if let Some(existing) = find_overlap(self.draft.slots(day), &candidate) {
            return Err(ScheduleServiceError::Overlap {
                day,
                candidate,
                existing: *existing,
            });
        }
        self.draft.push_slot(day, candidate);
        debug!(
            "event=draft_slot_add module=service status=ok day={} slot={candidate}",
            day_name(day)
        );
        Ok(candidate)
    }

    /// Removes the staged slot at `index` of `day`.
    pub fn remove_time_slot(
        &mut self,
        day: Weekday,
        index: usize,
    ) -> Result<TimeSlot, ScheduleServiceError> {
        let len = self.draft.slots(day).len();
        self.draft
            .remove_slot(day, index)
            .ok_or(ScheduleServiceError::IndexOutOfRange { day, index, len })
    }

    /// Sets the participant name of the draft.
    pub fn set_participant(&mut self, participant: impl Into<String>) {
        self.draft.set_participant(participant);
    }

    /// Loads the committed entry `id` into the draft for editing.
    pub fn begin_edit(&mut self, id: &str) -> Result<&DraftSchedule, ScheduleServiceError> {
        let entry = self
            .store
            .state()
            .get(id)
            .ok_or_else(|| ScheduleServiceError::NotFound(id.to_string()))?;
        self.draft = DraftSchedule::from_entry(entry);
        Ok(&self.draft)
    }

    /// Discards the draft, leaving edit mode.
    pub fn cancel_edit(&mut self) {
        self.draft = DraftSchedule::new();
    }

    /// Waits until every snapshot queued so far has been written.
    pub async fn flush(&self) {
        self.bridge.flush().await;
    }

    fn commit(&mut self, action: ScheduleAction) {
        let next = self.store.dispatch(action).clone();
        self.bridge.save(next);
    }

    fn fresh_id(&self) -> ScheduleId {
        loop {
            let id = new_schedule_id();
            if !self.store.state().contains(&id) {
                return id;
            }
        }
    }
}
