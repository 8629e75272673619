//! Persistence gateway.
//!
//! Reads and writes whole collections as JSON text, one slot per collection.
//! Nothing here is ever raised to the caller: a missing or unreadable slot
//! loads as an empty collection and a failed write is logged and dropped.
//! Stored data carries no schema version and is trusted as-is.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{KeyValueStorage, Slot};
use crate::habit::{FocusSession, Habit, HabitSession};

/// A record type persisted as an array in its own slot.
pub trait Record: Serialize + DeserializeOwned {
    const SLOT: Slot;
}

impl Record for Habit {
    const SLOT: Slot = Slot::Habits;
}

impl Record for HabitSession {
    const SLOT: Slot = Slot::Sessions;
}

impl Record for FocusSession {
    const SLOT: Slot = Slot::FocusSessions;
}

/// Serializes collections into a [`KeyValueStorage`] provider.
#[derive(Debug)]
pub struct PersistenceGateway<S> {
    storage: S,
    key_prefix: String,
}

impl<S: KeyValueStorage> PersistenceGateway<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key_prefix: String::new(),
        }
    }

    /// Prefix every slot key, e.g. `grove_` to read `grove_habits`.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self, slot: Slot) -> String {
        format!("{}{}", self.key_prefix, slot.key())
    }

    /// Load a collection. Never fails: absent, unreadable or malformed
    /// slots all load as an empty collection.
    pub fn load<T: Record>(&self) -> Vec<T> {
        let key = self.key(T::SLOT);
        let text = match self.storage.get(&key) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(slot = %T::SLOT, key = %key, error = %e, "failed to read slot");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&text) {
            Ok(records) => {
                debug!(slot = %T::SLOT, count = records.len(), "loaded slot");
                records
            }
            Err(e) => {
                warn!(slot = %T::SLOT, key = %key, error = %e, "stored slot is malformed");
                Vec::new()
            }
        }
    }

    /// Overwrite a collection. Failures are logged and otherwise ignored.
    pub fn save<T: Record>(&self, records: &[T]) {
        let key = self.key(T::SLOT);
        let text = match serde_json::to_string(records) {
            Ok(text) => text,
            Err(e) => {
                warn!(slot = %T::SLOT, error = %e, "failed to serialize slot");
                return;
            }
        };

        match self.storage.set(&key, &text) {
            Ok(()) => debug!(slot = %T::SLOT, count = records.len(), "saved slot"),
            Err(e) => warn!(slot = %T::SLOT, key = %key, error = %e, "failed to write slot"),
        }
    }
}
