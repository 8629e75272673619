use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::CountdownState;

/// Every countdown state change produces an Event.
/// The CLI prints them; embedders can forward them to a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CountdownStarted {
        remaining_secs: u64,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownReset {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// The run ended, either by reaching zero or by an explicit stop.
    CountdownCompleted {
        elapsed_minutes: u32,
        stopped_early: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: CountdownState,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
