//! Edit session: task selection on top of a store.

use super::{MutationOutcome, TaskStore};
use crate::clock::Clock;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::storage::SlotStorage;

/// Tracks which task the user picked for editing.
///
/// Selecting a task also opens the store's edit dialog; resetting closes it.
pub struct EditSession<'store, S, C> {
    store: &'store mut TaskStore<S, C>,
    selected_task: Option<Task>,
}

impl<'store, S: SlotStorage, C: Clock> EditSession<'store, S, C> {
    pub fn new(store: &'store mut TaskStore<S, C>) -> Self {
        Self {
            store,
            selected_task: None,
        }
    }

    pub fn create_task(&mut self, data: NewTask) -> Task {
        self.store.create_task(data)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> MutationOutcome {
        self.store.update_task(id, patch)
    }

    pub fn delete_task(&mut self, id: &str) -> MutationOutcome {
        self.store.delete_task(id)
    }

    pub fn select_task_for_edit(&mut self, task: &Task) {
        self.selected_task = Some(task.clone());
        self.store.open_edit_task_modal(task);
    }

    pub fn reset_selected_task(&mut self) {
        self.selected_task = None;
        self.store.close_edit_task_modal();
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task.as_ref()
    }

    pub fn store(&self) -> &TaskStore<S, C> {
        &*self.store
    }
}
