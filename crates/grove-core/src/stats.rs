//! Aggregate statistics over habits and sessions.
//!
//! Everything here is a pure function of the store's collections and a
//! reference time, so callers decide what "now" and "today" mean.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::habit::{Habit, HabitSession};

/// Days counted as "this week".
pub const DEFAULT_WEEK_DAYS: u32 = 7;

/// Days shown in a habit's progress chart.
pub const DEFAULT_CHART_DAYS: u32 = 30;

/// Smallest vertical scale of a progress chart, in minutes.
const MIN_CHART_SCALE: u32 = 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub habit_count: usize,
    pub completed_today: usize,
    pub completion_rate_pct: u32,
    pub total_streak: u32,
    pub average_streak: u32,
    pub longest_streak: u32,
    pub total_minutes: u64,
    pub total_sessions: usize,
    pub minutes_this_week: u64,
}

impl Summary {
    /// Summarize with the default seven-day week.
    pub fn compute(habits: &[Habit], sessions: &[HabitSession], now: DateTime<Utc>) -> Self {
        Self::compute_with_window(habits, sessions, now, DEFAULT_WEEK_DAYS)
    }

    pub fn compute_with_window(
        habits: &[Habit],
        sessions: &[HabitSession],
        now: DateTime<Utc>,
        week_days: u32,
    ) -> Self {
        let habit_count = habits.len();
        let completed_today = habits.iter().filter(|h| h.completed_today).count();
        let total_streak: u32 = habits.iter().map(|h| h.streak).sum();
        let longest_streak = habits.iter().map(|h| h.streak).max().unwrap_or(0);
        let total_minutes = habits.iter().map(|h| u64::from(h.total_minutes)).sum();

        let (completion_rate_pct, average_streak) = if habit_count == 0 {
            (0, 0)
        } else {
            let n = habit_count as f64;
            (
                (completed_today as f64 / n * 100.0).round() as u32,
                (f64::from(total_streak) / n).round() as u32,
            )
        };

        let week_start = now - Duration::days(i64::from(week_days));
        let minutes_this_week = sessions
            .iter()
            .filter(|s| s.date >= week_start)
            .map(|s| u64::from(s.minutes))
            .sum();

        Self {
            habit_count,
            completed_today,
            completion_rate_pct,
            total_streak,
            average_streak,
            longest_streak,
            total_minutes,
            total_sessions: sessions.len(),
            minutes_this_week,
        }
    }
}

/// One day of a habit's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub minutes: u32,
    /// Any session recorded that day was completed.
    pub completed: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressChart {
    pub habit_id: String,
    /// Oldest day first, ending with today.
    pub days: Vec<DailyProgress>,
    /// Height of the chart: the busiest day, never below an hour.
    pub scale_minutes: u32,
}

impl ProgressChart {
    /// Trailing `days` calendar days (UTC) of one habit's sessions.
    pub fn for_habit(
        sessions: &[HabitSession],
        habit_id: &str,
        days: u32,
        today: NaiveDate,
    ) -> Self {
        let mut by_date: HashMap<NaiveDate, (u32, bool)> = HashMap::new();
        for session in sessions.iter().filter(|s| s.habit_id == habit_id) {
            let entry = by_date.entry(session.date.date_naive()).or_default();
            entry.0 = entry.0.saturating_add(session.minutes);
            entry.1 |= session.completed;
        }

        let days: Vec<DailyProgress> = (0..days)
            .rev()
            .map(|back| {
                let date = today - Duration::days(i64::from(back));
                let (minutes, completed) = by_date.get(&date).copied().unwrap_or_default();
                DailyProgress {
                    date,
                    minutes,
                    completed,
                    is_today: date == today,
                }
            })
            .collect();

        let scale_minutes = days
            .iter()
            .map(|d| d.minutes)
            .max()
            .unwrap_or(0)
            .max(MIN_CHART_SCALE);

        Self {
            habit_id: habit_id.to_string(),
            days,
            scale_minutes,
        }
    }

    pub fn total_minutes(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.minutes)).sum()
    }

    pub fn completed_days(&self) -> usize {
        self.days.iter().filter(|d| d.completed).count()
    }
}

/// Render minutes as `"{h}h {m}m"`.
pub fn format_minutes(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}
