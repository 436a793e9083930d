//! In-process slot storage.

use super::{normalize_slot_key, SlotStorage, StorageResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Map-backed slots that live as long as the value.
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    slots: RefCell<BTreeMap<String, String>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one slot, e.g. to simulate data written by an earlier session.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.slots.borrow_mut().insert(key.into(), value.into());
        storage
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        let key = normalize_slot_key(key)?;
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()> {
        let key = normalize_slot_key(key)?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> StorageResult<()> {
        let key = normalize_slot_key(key)?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
