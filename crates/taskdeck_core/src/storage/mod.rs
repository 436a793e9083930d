//! Key-value slot storage contracts and implementations.
//!
//! # Responsibility
//! - Define the string-keyed slot contract the persistence adapter writes to.
//! - Provide in-memory, SQLite-backed and "facility missing" implementations.
//!
//! # Invariants
//! - `write_slot` overwrites the whole value for a key.
//! - An unavailable storage reports `is_available() == false` and fails every
//!   read/write with `StorageError::Unavailable`.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemorySlotStorage;
pub use sqlite::SqliteSlotStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Slot storage failure.
#[derive(Debug)]
pub enum StorageError {
    /// The storage facility does not exist in this environment.
    Unavailable,
    Db(DbError),
    InvalidKey(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "slot storage is not available"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid slot key: `{key}`"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable | Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed durable slot store.
pub trait SlotStorage {
    /// Returns whether the facility exists at all.
    fn is_available(&self) -> bool {
        true
    }
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_slot(&self, key: &str) -> StorageResult<()>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for &S {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write_slot(key, value)
    }

    fn remove_slot(&self, key: &str) -> StorageResult<()> {
        (**self).remove_slot(key)
    }
}

/// Stand-in for an environment without any storage facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSlotStorage;

impl SlotStorage for UnavailableSlotStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn read_slot(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable)
    }

    fn write_slot(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }

    fn remove_slot(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }
}

/// Rejects blank keys; returns the trimmed key otherwise.
pub(crate) fn normalize_slot_key(key: &str) -> StorageResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}
