mod config;
pub mod database;
pub mod gateway;
pub mod memory;

pub use config::{Config, HabitDefaults, StatsConfig, StorageConfig};
pub use database::Database;
pub use gateway::{PersistenceGateway, Record};
pub use memory::MemoryStorage;

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the Grove data directory.
///
/// `GROVE_DATA_DIR` wins when set. Otherwise `~/.config/grove`, or
/// `~/.config/grove-dev` when `GROVE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("GROVE_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("GROVE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("grove-dev")
            } else {
                base_dir.join("grove")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// A local key-value text store.
///
/// This is the only thing the persistence gateway needs from a backend:
/// read a slot, overwrite a slot.
pub trait KeyValueStorage {
    /// Read the text stored under `key`, or `None` when the slot is empty.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the text stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// The three persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Habits,
    Sessions,
    FocusSessions,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Habits, Slot::Sessions, Slot::FocusSessions];

    /// Storage key without any configured prefix.
    pub fn key(self) -> &'static str {
        match self {
            Slot::Habits => "habits",
            Slot::Sessions => "sessions",
            Slot::FocusSessions => "focus_sessions",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
