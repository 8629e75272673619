pub mod config;
pub mod focus;
pub mod habit;
pub mod session;
pub mod stats;

use grove_core::error::Result as CoreResult;
use grove_core::{Config, Database, HabitStore, PersistenceGateway};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the on-disk store with the configured slot prefix.
pub fn open_store(config: &Config) -> CoreResult<HabitStore<Database>> {
    let db = Database::open()?;
    let gateway = PersistenceGateway::new(db).with_key_prefix(config.storage.key_prefix.clone());
    Ok(HabitStore::open(gateway))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
