//! Focus countdown state machine.
//!
//! Counts whole seconds down from the habit's target. There is no internal
//! clock: something must call `tick()` once per elapsed second (see
//! [`CountdownTicker`](super::CountdownTicker)).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running | Paused -> Completed      (stop, or the count reaching zero)
//! any -> Idle                        (reset)
//! ```
//!
//! The completion callback receives the elapsed minutes, rounded up, and fires
//! exactly once per run.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Paused,
    Completed,
}

pub struct FocusCountdown<F> {
    state: CountdownState,
    total_secs: u64,
    remaining_secs: u64,
    on_complete: F,
}

impl<F> std::fmt::Debug for FocusCountdown<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusCountdown")
            .field("state", &self.state)
            .field("total_secs", &self.total_secs)
            .field("remaining_secs", &self.remaining_secs)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut(u32)> FocusCountdown<F> {
    /// A countdown for `target_minutes`, idle and full.
    pub fn new(target_minutes: u32, on_complete: F) -> Self {
        let total_secs = u64::from(target_minutes) * 60;
        Self {
            state: CountdownState::Idle,
            total_secs,
            remaining_secs: total_secs,
            on_complete,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    /// Minutes counted so far, rounded up.
    pub fn elapsed_minutes(&self) -> u32 {
        let elapsed = self.total_secs - self.remaining_secs;
        u32::try_from(elapsed.div_ceil(60)).unwrap_or(u32::MAX)
    }

    /// 0.0 .. 1.0 progress through the run.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.total_secs as f64)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress_pct: (self.progress() * 100.0).round(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Run from the current count.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            CountdownState::Idle | CountdownState::Paused => {
                self.state = CountdownState::Running;
                debug!(remaining_secs = self.remaining_secs, "countdown started");
                Some(Event::CountdownStarted {
                    remaining_secs: self.remaining_secs,
                    total_secs: self.total_secs,
                    at: Utc::now(),
                })
            }
            CountdownState::Running | CountdownState::Completed => None,
        }
    }

    /// Freeze the count.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            CountdownState::Running => {
                self.state = CountdownState::Paused;
                debug!(remaining_secs = self.remaining_secs, "countdown paused");
                Some(Event::CountdownPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Back to a full, idle countdown. Re-arms the completion callback.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = CountdownState::Idle;
        self.remaining_secs = self.total_secs;
        debug!(total_secs = self.total_secs, "countdown reset");
        Some(Event::CountdownReset {
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    /// End the run early and report the minutes counted so far.
    pub fn stop(&mut self) -> Option<Event> {
        match self.state {
            CountdownState::Running | CountdownState::Paused => Some(self.complete(true)),
            CountdownState::Idle | CountdownState::Completed => None,
        }
    }

    /// Advance by one elapsed second. Returns the completion event when the
    /// count reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.complete(false));
        }
        None
    }

    fn complete(&mut self, stopped_early: bool) -> Event {
        self.state = CountdownState::Completed;
        let elapsed_minutes = self.elapsed_minutes();
        debug!(elapsed_minutes, stopped_early, "countdown completed");
        (self.on_complete)(elapsed_minutes);
        Event::CountdownCompleted {
            elapsed_minutes,
            stopped_early,
            at: Utc::now(),
        }
    }
}

/// Render seconds as `MM:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
