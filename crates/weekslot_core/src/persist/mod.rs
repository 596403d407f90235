//! Durable mirror of the schedule collection.
//!
//! # Responsibility
//! - Define the key-value store contract consumed by core.
//! - Encode/decode the persisted collection layout.
//! - Sequence snapshot writes behind the in-memory store.
//!
//! # Invariants
//! - Persistence never originates mutations.
//! - Persistence failures never roll back in-memory state.

pub mod bridge;
pub mod codec;
pub mod error;
pub mod kv;
pub mod sqlite_kv;

pub use bridge::{PersistenceBridge, DEFAULT_STORAGE_KEY};
pub use error::{KvError, KvResult, PersistError};
pub use kv::{KeyValueStore, MemoryKeyValueStore};
pub use sqlite_kv::SqliteKeyValueStore;
