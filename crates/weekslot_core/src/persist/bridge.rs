//! Load-once / save-on-change mirror of the schedule collection.
//!
//! # Responsibility
//! - Read the stored snapshot once at session start.
//! - Write full snapshots after committed transitions without blocking
//!   the caller.
//!
//! # Invariants
//! - Snapshots are written in submission order by a single worker, so an
//!   older snapshot can never overwrite a newer one.
//! - Queued snapshots superseded by a newer one may be skipped.
//! - Read, decode and write failures are logged and never surface as panics.

use crate::model::schedule::ScheduleCollection;
use crate::persist::codec::{decode_collection, encode_collection};
use crate::persist::error::PersistError;
use crate::persist::kv::KeyValueStore;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

/// Storage key holding the encoded collection.
pub const DEFAULT_STORAGE_KEY: &str = "schedules";

enum SaveCommand {
    Snapshot(ScheduleCollection),
    Flush(oneshot::Sender<()>),
}

/// Bridge between the in-memory collection and a `KeyValueStore`.
pub struct PersistenceBridge {
    store: Arc<dyn KeyValueStore>,
    key: String,
    sender: mpsc::UnboundedSender<SaveCommand>,
}

impl PersistenceBridge {
    /// Creates a bridge and starts its save worker on the current runtime.
    ///
    /// # Errors
    /// - `PersistError::NoRuntime` when called outside a Tokio runtime.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self, PersistError> {
        let handle = Handle::try_current().map_err(|err| PersistError::NoRuntime(err.to_string()))?;
        let key = key.into();
        let (sender, receiver) = mpsc::unbounded_channel();
        handle.spawn(run_save_worker(Arc::clone(&store), key.clone(), receiver));
        Ok(Self { store, key, sender })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored collection.
    ///
    /// Missing, unreadable and undecodable values all yield `None`.
    pub async fn load(&self) -> Option<ScheduleCollection> {
        match self.try_load().await {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(
                    "event=schedules_load module=persist status=recovered key={} error_code={} error={}",
                    self.key,
                    error_code(&err),
                    err
                );
                None
            }
        }
    }

    /// Reads the stored collection, reporting why it could not be used.
    pub async fn try_load(&self) -> Result<Option<ScheduleCollection>, PersistError> {
        let started_at = Instant::now();
        let raw = self
            .store
            .get_item(&self.key)
            .await
            .map_err(PersistError::Read)?;

        let Some(raw) = raw else {
            info!(
                "event=schedules_load module=persist status=empty key={} duration_ms={}",
                self.key,
                started_at.elapsed().as_millis()
            );
            return Ok(None);
        };

        let collection = decode_collection(&raw)?;
        info!(
            "event=schedules_load module=persist status=ok key={} count={} duration_ms={}",
            self.key,
            collection.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Some(collection))
    }

    /// Queues a full snapshot write and returns immediately.
    pub fn save(&self, collection: ScheduleCollection) {
        if self.sender.send(SaveCommand::Snapshot(collection)).is_err() {
            error!(
                "event=schedules_save module=persist status=error key={} error_code=save_worker_stopped",
                self.key
            );
        }
    }

    /// Waits until every snapshot queued before this call has been handled.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(SaveCommand::Flush(ack)).is_err() {
            return;
        }
        // a dropped ack means the worker is gone; nothing left to wait for
        let _ = done.await;
    }
}

async fn run_save_worker(
    store: Arc<dyn KeyValueStore>,
    key: String,
    mut receiver: mpsc::UnboundedReceiver<SaveCommand>,
) {
    while let Some(first) = receiver.recv().await {
        let mut latest = None;
        let mut skipped = 0usize;
        let mut waiters = Vec::new();
        let mut next = Some(first);

        while let Some(command) = next {
            match command {
                SaveCommand::Snapshot(collection) => {
                    if latest.replace(collection).is_some() {
                        skipped += 1;
                    }
                }
                SaveCommand::Flush(ack) => waiters.push(ack),
            }
            next = receiver.try_recv().ok();
        }

        if let Some(collection) = latest {
            write_snapshot(store.as_ref(), &key, &collection, skipped).await;
        }
        for ack in waiters {
            let _ = ack.send(());
        }
    }
}

async fn write_snapshot(
    store: &dyn KeyValueStore,
    key: &str,
    collection: &ScheduleCollection,
    skipped: usize,
) {
    let started_at = Instant::now();
    let result = match encode_collection(collection) {
        Ok(encoded) => store
            .set_item(key, &encoded)
            .await
            .map_err(PersistError::Write),
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => info!(
            "event=schedules_save module=persist status=ok key={} count={} skipped={} duration_ms={}",
            key,
            collection.len(),
            skipped,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=schedules_save module=persist status=error key={} count={} error_code={} error={}",
            key,
            collection.len(),
            error_code(&err),
            err
        ),
    }
}

fn error_code(err: &PersistError) -> &'static str {
    match err {
        PersistError::Read(_) => "persistence_read_error",
        PersistError::Decode(_) => "persistence_decode_error",
        PersistError::Encode(_) => "persistence_encode_error",
        PersistError::Write(_) => "persistence_write_error",
        PersistError::NoRuntime(_) => "persistence_no_runtime",
    }
}

#[cfg(test)]
mod tests {
    use super::{PersistenceBridge, DEFAULT_STORAGE_KEY};
    use crate::model::schedule::{DaySlots, ScheduleCollection, ScheduleEntry};
    use crate::model::time::Weekday;
    use crate::persist::error::PersistError;
    use crate::persist::kv::{KeyValueStore, MemoryKeyValueStore};
    use std::sync::Arc;

    fn collection(ids: &[&str]) -> ScheduleCollection {
        ScheduleCollection::from_entries(
            ids.iter()
                .map(|id| {
                    ScheduleEntry::new(
                        *id,
                        "Alice",
                        vec![DaySlots::new(Weekday::Mon, vec!["09:00-10:00".parse().unwrap()])
                            .unwrap()],
                    )
                    .unwrap()
                })
                .collect(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let bridge = PersistenceBridge::new(store, DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(bridge.load().await, None);

        let saved = collection(&["a", "b"]);
        bridge.save(saved.clone());
        bridge.flush().await;
        assert_eq!(bridge.load().await, Some(saved));
    }

    #[tokio::test]
    async fn corrupt_value_loads_as_none() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set_item(DEFAULT_STORAGE_KEY, "{oops").await.unwrap();
        let bridge = PersistenceBridge::new(store, DEFAULT_STORAGE_KEY).unwrap();

        assert!(matches!(bridge.try_load().await, Err(PersistError::Decode(_))));
        assert_eq!(bridge.load().await, None);
    }

    #[tokio::test]
    async fn last_submitted_snapshot_wins() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let bridge = PersistenceBridge::new(store, "custom").unwrap();
        bridge.save(collection(&["a"]));
        bridge.save(collection(&["a", "b"]));
        bridge.save(collection(&["c"]));
        bridge.flush().await;

        assert_eq!(bridge.key(), "custom");
        assert_eq!(bridge.load().await, Some(collection(&["c"])));
    }

    #[test]
    fn new_outside_runtime_is_an_error() {
        let result = PersistenceBridge::new(Arc::new(MemoryKeyValueStore::new()), "k");
        assert!(matches!(result, Err(PersistError::NoRuntime(_))));
    }
}
