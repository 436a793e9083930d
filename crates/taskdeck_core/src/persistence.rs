//! Best-effort mirror of the task collection into one storage slot.
//!
//! # Responsibility
//! - Load the collection once at store start-up.
//! - Overwrite the slot with the full collection after every mutation.
//!
//! # Invariants
//! - Neither `load` nor `save` ever returns an error to the store; every
//!   failure is logged here and absorbed.
//! - Malformed or unreadable slot data loads as an empty collection.

use crate::logging::sanitize_message;
use crate::model::task::Task;
use crate::storage::{SlotStorage, StorageError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Cap for the collection dump attached to write-failure logs.
const MAX_DUMP_CHARS: usize = 4096;

/// Why a slot write did not happen.
#[derive(Debug)]
pub enum PersistenceError {
    Unavailable,
    Serialize(serde_json::Error),
    Storage(StorageError),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "slot storage is not available"),
            Self::Serialize(err) => write!(f, "failed to serialize tasks: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable => None,
            Self::Serialize(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

/// Reads and writes the task collection as a JSON array under `key`.
pub struct TaskPersistence<S> {
    storage: S,
    key: String,
}

impl<S: SlotStorage> TaskPersistence<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Loads the persisted collection, falling back to empty.
    pub fn load(&self) -> Vec<Task> {
        if !self.storage.is_available() {
            error!(
                "event=tasks_load module=persistence status=error error_code=storage_unavailable key={}",
                self.key
            );
            return Vec::new();
        }

        let raw = match self.storage.read_slot(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(
                    "event=tasks_load module=persistence status=ok key={} count=0 slot=absent",
                    self.key
                );
                return Vec::new();
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=persistence status=error error_code=slot_read_failed key={} error={err}",
                    self.key
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                info!(
                    "event=tasks_load module=persistence status=ok key={} count={}",
                    self.key,
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=persistence status=reset error_code=slot_malformed key={} error={err}",
                    self.key
                );
                Vec::new()
            }
        }
    }

    /// Overwrites the slot with `tasks`; failures are logged and returned
    /// for callers that care, never raised.
    pub fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let result = self.try_save(tasks);
        match &result {
            Ok(()) => debug!(
                "event=tasks_save module=persistence status=ok key={} count={}",
                self.key,
                tasks.len()
            ),
            Err(PersistenceError::Unavailable) => error!(
                "event=tasks_save module=persistence status=error error_code=storage_unavailable key={}",
                self.key
            ),
            Err(err) => error!(
                "event=tasks_save module=persistence status=error error_code=slot_write_failed key={} error={err} tasks={}",
                self.key,
                dump_tasks(tasks)
            ),
        }
        result
    }

    fn try_save(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        if !self.storage.is_available() {
            return Err(PersistenceError::Unavailable);
        }
        let payload = serde_json::to_string(tasks).map_err(PersistenceError::Serialize)?;
        self.storage
            .write_slot(&self.key, &payload)
            .map_err(PersistenceError::Storage)
    }
}

fn dump_tasks(tasks: &[Task]) -> String {
    let dump = serde_json::to_string(tasks).unwrap_or_else(|_| format!("{tasks:?}"));
    sanitize_message(&dump, MAX_DUMP_CHARS)
}
