//! Authoritative in-memory task collection with derived views.
//!
//! # Responsibility
//! - Own the task list, the active filter, modal state and the current user.
//! - Apply create/update/delete/move and mirror the result to the slot.
//!
//! # Invariants
//! - Task ids are assigned once in `create_task` and never rewritten.
//! - `updated_at` strictly increases on every applied mutation of a task.
//! - Persistence failures never roll back or fail a mutation.
//! - Lookup misses are reported as `MutationOutcome::NotFound`, not errors.

pub mod session;

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::model::task::{NewTask, Task, TaskFilter, TaskPatch, TaskStatus, User};
use crate::model::timestamp;
use crate::persistence::TaskPersistence;
use crate::storage::SlotStorage;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

/// Result of a mutation addressed by task id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    NotFound,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// UI-facing dialog state owned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub is_edit_modal_visible: bool,
    /// Snapshot of the task the edit dialog was opened for.
    pub task_to_edit: Option<Task>,
    pub is_create_modal_open: bool,
}

pub struct TaskStore<S, C = SystemClock> {
    tasks: Vec<Task>,
    current_filter: TaskFilter,
    modal: ModalState,
    current_user: User,
    persistence: TaskPersistence<S>,
    clock: C,
}

impl<S: SlotStorage, C: Clock> TaskStore<S, C> {
    /// Builds a store and loads whatever the slot holds.
    ///
    /// Never fails: unreadable or malformed slot data starts an empty store.
    pub fn open(storage: S, clock: C, config: StoreConfig) -> Self {
        let persistence = TaskPersistence::new(storage, config.slot_key);
        let tasks = persistence.load();
        info!(
            "event=store_open module=store status=ok key={} count={}",
            persistence.key(),
            tasks.len()
        );

        Self {
            tasks,
            current_filter: TaskFilter::default(),
            modal: ModalState::default(),
            current_user: config.current_user,
            persistence,
            clock,
        }
    }

    /// Appends a new task with fresh id and timestamps and returns it.
    ///
    /// No validation happens here; see `validation::TaskValidator`.
    pub fn create_task(&mut self, data: NewTask) -> Task {
        let task = Task::from_new(data, self.clock.now());
        self.tasks.push(task.clone());
        info!(
            "event=task_create module=store status=ok task_id={} count={}",
            task.id,
            self.tasks.len()
        );
        self.persist();
        task
    }

    /// Merges `patch` over the task with `id` and refreshes `updated_at`.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> MutationOutcome {
        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_update module=store status=not_found task_id={id}");
            return MutationOutcome::NotFound;
        };

        patch.apply_to(task);
        task.updated_at = next_update_stamp(task.updated_at, now);
        info!("event=task_update module=store status=ok task_id={id}");
        self.persist();
        MutationOutcome::Applied
    }

    /// Removes every task with `id`.
    ///
    /// The slot is rewritten even on a miss.
    pub fn delete_task(&mut self, id: &str) -> MutationOutcome {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = before - self.tasks.len();
        self.persist();

        if removed == 0 {
            debug!("event=task_delete module=store status=not_found task_id={id}");
            return MutationOutcome::NotFound;
        }
        info!("event=task_delete module=store status=ok task_id={id} removed={removed}");
        MutationOutcome::Applied
    }

    /// Moves the task with `id` to another board column.
    pub fn move_task(&mut self, id: &str, new_status: TaskStatus) -> MutationOutcome {
        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_move module=store status=not_found task_id={id}");
            return MutationOutcome::NotFound;
        };

        let previous = task.status;
        task.status = new_status;
        task.updated_at = next_update_stamp(task.updated_at, now);
        info!("event=task_move module=store status=ok task_id={id} from={previous} to={new_status}");
        self.persist();
        MutationOutcome::Applied
    }

    pub fn open_edit_task_modal(&mut self, task: &Task) {
        self.modal.is_edit_modal_visible = true;
        self.modal.task_to_edit = Some(task.clone());
    }

    pub fn close_edit_task_modal(&mut self) {
        self.modal.is_edit_modal_visible = false;
        self.modal.task_to_edit = None;
    }

    pub fn open_create_task_modal(&mut self) {
        self.modal.is_create_modal_open = true;
    }

    pub fn close_create_task_modal(&mut self) {
        self.modal.is_create_modal_open = false;
    }

    pub fn modal_state(&self) -> &ModalState {
        &self.modal
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.current_filter = filter;
    }

    pub fn clear_filter(&mut self) {
        self.current_filter = TaskFilter::default();
    }

    pub fn current_filter(&self) -> &TaskFilter {
        &self.current_filter
    }

    /// Tasks passing the current filter, in collection order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.current_filter.matches(task))
            .collect()
    }

    /// Filtered view narrowed to one status.
    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.filtered_tasks()
            .into_iter()
            .filter(|task| task.status == status)
            .collect()
    }

    /// Looks up over the full collection, ignoring the filter.
    pub fn get_task_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn current_user(&self) -> &User {
        &self.current_user
    }

    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }

    fn persist(&self) {
        // Failures are already logged by the adapter.
        let _ = self.persistence.save(&self.tasks);
    }
}

/// Next `updated_at`: the clock reading, or previous + 1 ms when the clock
/// has not moved past the previous stamp.
fn next_update_stamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let now = timestamp::stamp(now);
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
