//! SQLite-backed key-value storage.
//!
//! The production storage provider: a single `kv` table holding one row per
//! slot. Each write replaces the slot's text wholesale.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, KeyValueStorage};
use crate::error::StorageError;

/// SQLite database holding the persisted slots.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/grove.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unusable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Self::open_at(&dir.join("grove.db"))
    }

    /// Open (or create) a database file at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl KeyValueStorage for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.kv_set(key, value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("habits").unwrap().is_none());
        db.kv_set("habits", "[]").unwrap();
        assert_eq!(db.kv_get("habits").unwrap().unwrap(), "[]");
    }

    #[test]
    fn set_overwrites_previous_value() {
        let db = Database::open_memory().unwrap();
        db.set("sessions", "[1]").unwrap();
        db.set("sessions", "[1,2]").unwrap();
        assert_eq!(db.get("sessions").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn reopening_a_file_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grove.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("habits", r#"[{"id":"1"}]"#).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("habits").unwrap().as_deref(), Some(r#"[{"id":"1"}]"#));
    }
}
