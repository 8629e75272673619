use chrono::Utc;
use clap::Subcommand;
use grove_core::{meets_completion_threshold, Config, NewSession};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Record time spent on a habit
    Log {
        /// Habit ID
        habit_id: String,
        /// Minutes spent
        minutes: u32,
        /// Count as completed regardless of the habit's target
        #[arg(long, conflicts_with = "incomplete")]
        completed: bool,
        /// Count as not completed regardless of the habit's target
        #[arg(long)]
        incomplete: bool,
    },
    /// List recorded sessions
    List {
        /// Only sessions of this habit
        #[arg(long)]
        habit: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SessionAction) -> CmdResult {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        SessionAction::Log {
            habit_id,
            minutes,
            completed,
            incomplete,
        } => {
            let target = store
                .habit(&habit_id)
                .map(|h| h.target_minutes)
                .ok_or_else(|| format!("habit not found: {habit_id}"))?;
            let completed = match (completed, incomplete) {
                (true, _) => true,
                (_, true) => false,
                _ => meets_completion_threshold(minutes, target),
            };
            let id = store.add_session(NewSession {
                habit_id,
                date: Utc::now(),
                minutes,
                completed,
            });
            if let Some(session) = store.sessions().iter().find(|s| s.id == id) {
                print_json(session)?;
            }
        }
        SessionAction::List { habit, json } => {
            let sessions: Vec<_> = store
                .sessions()
                .iter()
                .filter(|s| habit.as_deref().map_or(true, |h| s.habit_id == h))
                .collect();
            if json {
                print_json(&sessions)?;
            } else if sessions.is_empty() {
                println!("No sessions recorded.");
            } else {
                for s in sessions {
                    let name = store.habit(&s.habit_id).map_or("?", |h| h.name.as_str());
                    let mark = if s.completed { "completed" } else { "partial" };
                    println!(
                        "{}  {}  {}  {}min  {}",
                        s.id,
                        s.date.format("%Y-%m-%d %H:%M"),
                        name,
                        s.minutes,
                        mark
                    );
                }
            }
        }
    }
    Ok(())
}
