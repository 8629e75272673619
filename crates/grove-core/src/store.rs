//! In-memory habit store.
//!
//! The store is the authoritative owner of the habit, session and focus-session
//! collections. Every mutation changes the in-memory collection first and then
//! writes the full collection back through the [`PersistenceGateway`]. Storage
//! failures never reach the caller; if a write is lost, memory stays
//! authoritative until the next successful save.
//!
//! Mutations take `&mut self`, so there is exactly one writer and each slot is
//! written in mutation order.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::habit::{
    meets_completion_threshold, FocusSession, Habit, HabitSession, HabitUpdate, NewHabit,
    NewSession,
};
use crate::storage::{KeyValueStorage, PersistenceGateway};

/// Hands out identifiers derived from the creation time in milliseconds.
///
/// Strictly increasing: two records created in the same millisecond still get
/// distinct ids.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure future ids sort after `id` when it is numeric.
    pub fn observe(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.last = self.last.max(n);
        }
    }

    pub fn next_at(&mut self, at: DateTime<Utc>) -> String {
        let now = u64::try_from(at.timestamp_millis()).unwrap_or(0);
        self.last = now.max(self.last.saturating_add(1));
        self.last.to_string()
    }
}

pub struct HabitStore<S> {
    gateway: PersistenceGateway<S>,
    habits: Vec<Habit>,
    sessions: Vec<HabitSession>,
    focus_sessions: Vec<FocusSession>,
    ids: IdGenerator,
    loading: bool,
}

impl<S: KeyValueStorage> HabitStore<S> {
    /// An empty store that has not loaded yet.
    pub fn new(gateway: PersistenceGateway<S>) -> Self {
        Self {
            gateway,
            habits: Vec::new(),
            sessions: Vec::new(),
            focus_sessions: Vec::new(),
            ids: IdGenerator::new(),
            loading: true,
        }
    }

    /// Create the store and load all three collections.
    pub fn open(gateway: PersistenceGateway<S>) -> Self {
        let mut store = Self::new(gateway);
        store.load();
        store
    }

    /// Replace the in-memory collections with what storage holds.
    ///
    /// The three reads are independent; `loading` clears once all of them
    /// have resolved, whether or not they succeeded.
    pub fn load(&mut self) {
        self.loading = true;
        self.habits = self.gateway.load();
        self.sessions = self.gateway.load();
        self.focus_sessions = self.gateway.load();

        let ids = self
            .habits
            .iter()
            .map(|h| h.id.as_str())
            .chain(self.sessions.iter().map(|s| s.id.as_str()))
            .chain(self.focus_sessions.iter().map(|f| f.id.as_str()));
        for id in ids {
            self.ids.observe(id);
        }

        self.loading = false;
        debug!(
            habits = self.habits.len(),
            sessions = self.sessions.len(),
            focus_sessions = self.focus_sessions.len(),
            "store loaded"
        );
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn sessions(&self) -> &[HabitSession] {
        &self.sessions
    }

    pub fn focus_sessions(&self) -> &[FocusSession] {
        &self.focus_sessions
    }

    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn focus_session(&self, id: &str) -> Option<&FocusSession> {
        self.focus_sessions.iter().find(|f| f.id == id)
    }

    pub fn sessions_for<'a>(&'a self, habit_id: &'a str) -> impl Iterator<Item = &'a HabitSession> {
        self.sessions.iter().filter(move |s| s.habit_id == habit_id)
    }

    pub fn active_focus_session(&self, habit_id: &str) -> Option<&FocusSession> {
        self.focus_sessions
            .iter()
            .find(|f| f.is_active && f.habit_id == habit_id)
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Append a new habit with zeroed progress. Returns its id.
    pub fn add_habit(&mut self, fields: NewHabit) -> String {
        let now = Utc::now();
        let id = self.ids.next_at(now);
        let habit = Habit::new(id.clone(), now, fields);
        debug!(habit_id = %id, name = %habit.name, "habit added");
        self.habits.push(habit);
        self.gateway.save(&self.habits);
        id
    }

    /// Shallow-merge `update` into the matching habit.
    ///
    /// The habit collection is persisted whether or not `id` matched.
    /// Returns whether a habit was updated.
    pub fn update_habit(&mut self, id: &str, update: HabitUpdate) -> bool {
        let found = match self.habits.iter_mut().find(|h| h.id == id) {
            Some(habit) => {
                habit.apply(update);
                true
            }
            None => false,
        };
        debug!(habit_id = %id, found, "habit updated");
        self.gateway.save(&self.habits);
        found
    }

    /// Remove a habit together with every session and focus session that
    /// references it. Returns whether the habit existed.
    pub fn delete_habit(&mut self, id: &str) -> bool {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        self.sessions.retain(|s| s.habit_id != id);
        self.focus_sessions.retain(|f| f.habit_id != id);
        let found = self.habits.len() != before;
        debug!(habit_id = %id, found, "habit deleted");

        self.gateway.save(&self.habits);
        self.gateway.save(&self.sessions);
        self.gateway.save(&self.focus_sessions);
        found
    }

    /// Record a session and roll it into the owning habit's stats.
    ///
    /// The session is stored even when the habit is unknown; stats are only
    /// touched when it exists. A completed session extends the streak by one;
    /// an incomplete one leaves it alone.
    pub fn add_session(&mut self, fields: NewSession) -> String {
        let id = self.ids.next_at(Utc::now());
        let session = HabitSession {
            id: id.clone(),
            habit_id: fields.habit_id,
            date: fields.date,
            minutes: fields.minutes,
            completed: fields.completed,
        };

        let update = self.habit(&session.habit_id).map(|habit| HabitUpdate {
            total_minutes: Some(habit.total_minutes.saturating_add(session.minutes)),
            completed_today: Some(session.completed),
            last_completed_at: session.completed.then_some(session.date),
            streak: Some(if session.completed {
                habit.streak.saturating_add(1)
            } else {
                habit.streak
            }),
            ..Default::default()
        });

        let habit_id = session.habit_id.clone();
        debug!(
            session_id = %id,
            habit_id = %habit_id,
            minutes = session.minutes,
            completed = session.completed,
            "session recorded"
        );
        self.sessions.push(session);
        self.gateway.save(&self.sessions);

        if let Some(update) = update {
            self.update_habit(&habit_id, update);
        }
        id
    }

    /// Begin a focus run against a habit, snapshotting `target_minutes`.
    ///
    /// A habit has at most one active run: if one is already active its id
    /// is returned and nothing new is created.
    pub fn start_focus_session(&mut self, habit_id: &str, target_minutes: u32) -> String {
        if let Some(active) = self.active_focus_session(habit_id) {
            debug!(habit_id, session_id = %active.id, "focus session already active");
            return active.id.clone();
        }

        let now = Utc::now();
        let id = self.ids.next_at(now);
        self.focus_sessions.push(FocusSession {
            id: id.clone(),
            habit_id: habit_id.to_string(),
            start_time: now,
            end_time: None,
            target_minutes,
            actual_minutes: 0,
            is_active: true,
        });
        info!(habit_id, session_id = %id, target_minutes, "focus session started");
        self.gateway.save(&self.focus_sessions);
        id
    }

    /// Finish a focus run and record the time as a habit session.
    ///
    /// An unknown `session_id` changes nothing beyond rewriting the focus
    /// slot. Returns the id of the recorded habit session, if any.
    pub fn end_focus_session(&mut self, session_id: &str, actual_minutes: u32) -> Option<String> {
        let now = Utc::now();
        let ended = self
            .focus_sessions
            .iter_mut()
            .find(|f| f.id == session_id)
            .map(|focus| {
                focus.end_time = Some(now);
                focus.actual_minutes = actual_minutes;
                focus.is_active = false;
                (focus.habit_id.clone(), focus.target_minutes)
            });
        self.gateway.save(&self.focus_sessions);

        let (habit_id, target_minutes) = ended?;
        let completed = meets_completion_threshold(actual_minutes, target_minutes);
        info!(
            session_id,
            habit_id = %habit_id,
            actual_minutes,
            target_minutes,
            completed,
            "focus session ended"
        );
        Some(self.add_session(NewSession {
            habit_id,
            date: now,
            minutes: actual_minutes,
            completed,
        }))
    }
}
