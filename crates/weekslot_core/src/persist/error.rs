//! Persistence error types.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type KvResult<T> = Result<T, KvError>;

/// Failure reported by a key-value backend.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Backend-specific failure (lock poisoning, task join, I/O).
    Backend(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "key-value backend error: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Failure while mirroring the collection to durable storage.
///
/// None of these are fatal: the in-memory collection stays authoritative.
#[derive(Debug)]
pub enum PersistError {
    /// Stored value could not be read.
    Read(KvError),
    /// Stored value is corrupt or does not match the schedule schema.
    Decode(String),
    /// Collection could not be encoded.
    Encode(String),
    /// Snapshot could not be written.
    Write(KvError),
    /// Bridge was created outside of a Tokio runtime.
    NoRuntime(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read schedules: {err}"),
            Self::Decode(message) => write!(f, "stored schedules are unreadable: {message}"),
            Self::Encode(message) => write!(f, "failed to encode schedules: {message}"),
            Self::Write(err) => write!(f, "failed to write schedules: {err}"),
            Self::NoRuntime(message) => write!(f, "persistence requires a tokio runtime: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) | Self::Write(err) => Some(err),
            _ => None,
        }
    }
}
