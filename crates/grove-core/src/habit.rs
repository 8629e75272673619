//! Habit, session and focus-session records.
//!
//! These are the three record types the habit store owns. Field names are
//! serialized in camelCase so the stored slots stay readable by the mobile
//! app that first wrote them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Share of a habit's daily target a session must reach to count as completed.
pub const COMPLETION_THRESHOLD: f64 = 0.8;

/// Whether `minutes` reaches the completion threshold of `target_minutes`.
///
/// The boundary is inclusive: 24 minutes against a 30 minute target completes.
pub fn meets_completion_threshold(minutes: u32, target_minutes: u32) -> bool {
    f64::from(minutes) >= f64::from(target_minutes) * COMPLETION_THRESHOLD
}

/// A tracked activity with a daily time target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    pub icon: String,
    pub target_minutes: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub total_minutes: u32,
    #[serde(default)]
    pub completed_today: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Session data lives in its own slot; the array is always written empty
    /// and whatever is stored here is ignored on read.
    #[serde(
        default,
        skip_deserializing,
        serialize_with = "write_empty_sessions"
    )]
    sessions: (),
}

fn write_empty_sessions<S: Serializer>(_: &(), serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(std::iter::empty::<()>())
}

impl Habit {
    /// Build a fresh habit with zeroed progress.
    pub fn new(id: String, created_at: DateTime<Utc>, fields: NewHabit) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            color: fields.color,
            icon: fields.icon,
            target_minutes: fields.target_minutes,
            streak: 0,
            total_minutes: 0,
            completed_today: false,
            created_at,
            last_completed_at: None,
            sessions: (),
        }
    }

    /// Shallow merge: every `Some` field in `update` replaces the current value.
    pub fn apply(&mut self, update: HabitUpdate) {
        let HabitUpdate {
            name,
            description,
            color,
            icon,
            target_minutes,
            streak,
            total_minutes,
            completed_today,
            last_completed_at,
        } = update;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = color {
            self.color = v;
        }
        if let Some(v) = icon {
            self.icon = v;
        }
        if let Some(v) = target_minutes {
            self.target_minutes = v;
        }
        if let Some(v) = streak {
            self.streak = v;
        }
        if let Some(v) = total_minutes {
            self.total_minutes = v;
        }
        if let Some(v) = completed_today {
            self.completed_today = v;
        }
        if let Some(v) = last_completed_at {
            self.last_completed_at = Some(v);
        }
    }

    /// 0.0 .. 1.0 ratio of accumulated minutes to the daily target.
    pub fn progress(&self) -> f64 {
        if self.target_minutes == 0 {
            return 0.0;
        }
        (f64::from(self.total_minutes) / f64::from(self.target_minutes)).min(1.0)
    }
}

/// Caller-supplied fields for a new habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    pub icon: String,
    pub target_minutes: u32,
}

/// Partial habit update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub target_minutes: Option<u32>,
    pub streak: Option<u32>,
    pub total_minutes: Option<u32>,
    pub completed_today: Option<bool>,
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl HabitUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Time spent on a habit on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSession {
    pub id: String,
    pub habit_id: String,
    pub date: DateTime<Utc>,
    pub minutes: u32,
    pub completed: bool,
}

/// Caller-supplied fields for a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub habit_id: String,
    pub date: DateTime<Utc>,
    pub minutes: u32,
    pub completed: bool,
}

/// One run of the focus timer against a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: String,
    pub habit_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Snapshot of the habit's target when the run started.
    pub target_minutes: u32,
    #[serde(default)]
    pub actual_minutes: u32,
    pub is_active: bool,
}

impl FocusSession {
    /// Whether the recorded minutes reached the completion threshold.
    pub fn met_target(&self) -> bool {
        meets_completion_threshold(self.actual_minutes, self.target_minutes)
    }
}
