//! Core logic for Taskdeck, a single-user task board.
//! This crate owns the task store and every invariant around it.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod presentation;
pub mod storage;
pub mod store;
pub mod validation;

pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use config::{ConfigError, RuntimeConfig, StoreConfig, DEFAULT_SLOT_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{
    NewTask, Task, TaskFilter, TaskId, TaskPatch, TaskPriority, TaskStatus, UnknownVariant, User,
};
pub use persistence::{PersistenceError, TaskPersistence};
pub use presentation::{
    calculate_task_completion_percentage, calculate_time_remaining, filter_tasks_by_status,
    format_date, sort_tasks_by_due_date, time_remaining, TimeRemaining,
};
pub use storage::{
    MemorySlotStorage, SlotStorage, SqliteSlotStorage, StorageError, StorageResult,
    UnavailableSlotStorage,
};
pub use store::session::EditSession;
pub use store::{ModalState, MutationOutcome, TaskStore};
pub use validation::{
    check_description, check_due_date, check_title, TaskFields, TaskValidationError,
    TaskValidator, ValidationFlags, MAX_DESCRIPTION_CHARS,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
