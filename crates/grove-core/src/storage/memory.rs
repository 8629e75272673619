//! In-process key-value storage.
//!
//! Holds slots in a `HashMap`. Reads and writes can be made to fail on demand,
//! which is how the store's log-and-continue behavior is exercised in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::KeyValueStorage;
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot with raw text, bypassing failure injection.
    pub fn with_slot(self, key: &str, value: &str) -> Self {
        self.insert_raw(key, value);
        self
    }

    /// Write raw text into a slot, bypassing failure injection.
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
    }

    /// Read raw text from a slot, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("read of '{key}' refused")));
        }
        let slots = self
            .slots
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("write of '{key}' refused")));
        }
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_slot_reads_as_none() {
        let storage = MemoryStorage::new();
        assert!(storage.get("habits").unwrap().is_none());
    }

    #[test]
    fn injected_failures_only_affect_the_trait_surface() {
        let storage = MemoryStorage::new().with_slot("habits", "[]");
        storage.set_fail_reads(true);
        storage.set_fail_writes(true);
        assert!(storage.get("habits").is_err());
        assert!(storage.set("habits", "[1]").is_err());
        assert_eq!(storage.raw("habits").as_deref(), Some("[]"));

        storage.set_fail_reads(false);
        assert_eq!(storage.get("habits").unwrap().as_deref(), Some("[]"));
    }
}
