//! # Grove Core Library
//!
//! Core logic for the Grove habit tracker: habits with a daily time target,
//! focus-timer runs against a habit, and aggregate statistics. The `grove`
//! CLI is a thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Habit Store**: owns the habit, session and focus-session collections
//!   and writes the full collection back after every mutation
//! - **Persistence Gateway**: JSON slots in a key-value store (SQLite by
//!   default); unreadable slots load empty, failed writes are logged
//! - **Focus Countdown**: a one-second-tick state machine whose completion
//!   callback reports elapsed minutes back to the store
//!
//! ## Key Components
//!
//! - [`HabitStore`]: create/update/delete habits, record sessions, run focus sessions
//! - [`PersistenceGateway`]: slot load/save over any [`KeyValueStorage`]
//! - [`FocusCountdown`] / [`CountdownTicker`]: the timer and its tokio driver
//! - [`Summary`] / [`ProgressChart`]: analytics
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod focus;
pub mod habit;
pub mod stats;
pub mod storage;
pub mod store;

pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use focus::{format_clock, CountdownState, CountdownTicker, FocusCountdown};
pub use habit::{
    meets_completion_threshold, FocusSession, Habit, HabitSession, HabitUpdate, NewHabit,
    NewSession, COMPLETION_THRESHOLD,
};
pub use stats::{format_minutes, DailyProgress, ProgressChart, Summary};
pub use storage::{
    Config, Database, KeyValueStorage, MemoryStorage, PersistenceGateway, Record, Slot,
};
pub use store::{HabitStore, IdGenerator};
