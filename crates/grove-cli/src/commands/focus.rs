use std::time::Duration;

use clap::Subcommand;
use grove_core::{
    format_clock, Config, CountdownTicker, Event, FocusCountdown, HabitStore, KeyValueStorage,
};
use tracing::debug;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Open a focus session without a live timer
    Start {
        /// Habit ID
        habit_id: String,
        /// Target minutes (defaults to the habit's daily target)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        target: Option<u32>,
    },
    /// Close a focus session and record the minutes spent
    End {
        /// Focus session ID
        session_id: String,
        /// Minutes actually spent
        minutes: u32,
    },
    /// List focus sessions
    List {
        /// Only sessions still running
        #[arg(long)]
        active: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a live countdown in the terminal; Ctrl-C stops early
    Run {
        /// Habit ID
        habit_id: String,
        /// Target minutes (defaults to the habit's daily target)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        target: Option<u32>,
    },
}

fn resolve_target<S: KeyValueStorage>(
    store: &HabitStore<S>,
    habit_id: &str,
    target: Option<u32>,
) -> Result<u32, Box<dyn std::error::Error>> {
    let habit = store
        .habit(habit_id)
        .ok_or_else(|| format!("habit not found: {habit_id}"))?;
    Ok(target.unwrap_or(habit.target_minutes))
}

/// Finish a focus session and print the habit session it produced.
fn finish<S: KeyValueStorage>(
    store: &mut HabitStore<S>,
    session_id: &str,
    minutes: u32,
) -> CmdResult {
    let recorded = store
        .end_focus_session(session_id, minutes)
        .ok_or_else(|| format!("focus session not found: {session_id}"))?;
    if let Some(session) = store.sessions().iter().find(|s| s.id == recorded) {
        print_json(session)?;
    }
    Ok(())
}

/// Open (or resume) the habit's focus session for a live run.
///
/// Returns the session id and the minutes to count down. A resumed session
/// keeps the target it was started with, since that is what the recorded
/// minutes are judged against.
fn begin_run<S: KeyValueStorage>(
    store: &mut HabitStore<S>,
    habit_id: &str,
    target: Option<u32>,
) -> Result<(String, u32), Box<dyn std::error::Error>> {
    let requested = resolve_target(store, habit_id, target)?;
    let resumed = store.active_focus_session(habit_id).is_some();
    let id = store.start_focus_session(habit_id, requested);
    let target = store
        .focus_session(&id)
        .map_or(requested, |focus| focus.target_minutes);
    if resumed {
        eprintln!("Resuming focus session {id} ({target}min target).");
    }
    Ok((id, target))
}

/// Count down in the foreground until the timer completes or Ctrl-C stops it.
/// Returns the elapsed minutes reported by the countdown.
async fn drive_countdown(target_minutes: u32) -> u32 {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let countdown = FocusCountdown::new(target_minutes, move |minutes| {
        let _ = tx.send(minutes);
    });
    let ticker = CountdownTicker::spawn(countdown, |event| debug!(?event, "countdown event"));
    ticker.start();

    let mut display = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            Some(minutes) = rx.recv() => {
                eprintln!();
                return minutes;
            }
            _ = tokio::signal::ctrl_c() => {
                ticker.stop();
            }
            _ = display.tick() => {
                let snapshot = ticker.countdown().snapshot();
                if let Event::StateSnapshot { remaining_secs, progress_pct, .. } = snapshot {
                    eprint!("\r{}  {:>3.0}%", format_clock(remaining_secs), progress_pct);
                }
            }
        }
    }
}

pub fn run(action: FocusAction) -> CmdResult {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        FocusAction::Start { habit_id, target } => {
            let target = resolve_target(&store, &habit_id, target)?;
            let id = store.start_focus_session(&habit_id, target);
            if let Some(focus) = store.focus_session(&id) {
                print_json(focus)?;
            }
        }
        FocusAction::End {
            session_id,
            minutes,
        } => {
            match store.focus_session(&session_id) {
                None => return Err(format!("focus session not found: {session_id}").into()),
                Some(focus) if !focus.is_active => {
                    return Err(format!("focus session already ended: {session_id}").into())
                }
                Some(_) => {}
            }
            finish(&mut store, &session_id, minutes)?;
        }
        FocusAction::List { active, json } => {
            let sessions: Vec<_> = store
                .focus_sessions()
                .iter()
                .filter(|f| !active || f.is_active)
                .collect();
            if json {
                print_json(&sessions)?;
            } else if sessions.is_empty() {
                println!("No focus sessions.");
            } else {
                for f in sessions {
                    let name = store.habit(&f.habit_id).map_or("?", |h| h.name.as_str());
                    let status = if f.is_active {
                        "active".to_string()
                    } else {
                        let mark = if f.met_target() { "met" } else { "short" };
                        format!("{}/{}min {}", f.actual_minutes, f.target_minutes, mark)
                    };
                    println!(
                        "{}  {}  {}  {}",
                        f.id,
                        f.start_time.format("%Y-%m-%d %H:%M"),
                        name,
                        status
                    );
                }
            }
        }
        FocusAction::Run { habit_id, target } => {
            let (focus_id, target) = begin_run(&mut store, &habit_id, target)?;
            eprintln!("Focusing for {target}min. Press Ctrl-C to stop early.");

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let minutes = runtime.block_on(drive_countdown(target));
            finish(&mut store, &focus_id, minutes)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::{MemoryStorage, NewHabit, PersistenceGateway};

    fn store_with_habit(target_minutes: u32) -> (HabitStore<MemoryStorage>, String) {
        let mut store = HabitStore::open(PersistenceGateway::new(MemoryStorage::new()));
        let id = store.add_habit(NewHabit {
            name: "Sketch".into(),
            color: "#F7DC6F".into(),
            icon: "✏️".into(),
            target_minutes,
            ..Default::default()
        });
        (store, id)
    }

    #[test]
    fn run_uses_requested_target_for_a_new_session() {
        let (mut store, habit_id) = store_with_habit(30);
        let (_, target) = begin_run(&mut store, &habit_id, Some(10)).unwrap();
        assert_eq!(target, 10);
        assert_eq!(store.active_focus_session(&habit_id).unwrap().target_minutes, 10);
    }

    #[test]
    fn run_resumes_active_session_with_its_own_target() {
        let (mut store, habit_id) = store_with_habit(30);
        let first = store.start_focus_session(&habit_id, 60);

        let (id, target) = begin_run(&mut store, &habit_id, Some(10)).unwrap();
        assert_eq!(id, first);
        assert_eq!(target, 60);

        let recorded = store.end_focus_session(&id, target).unwrap();
        let session = store.sessions().iter().find(|s| s.id == recorded).unwrap();
        assert!(session.completed);
    }

    #[test]
    fn run_without_target_uses_habit_target() {
        let (mut store, habit_id) = store_with_habit(25);
        let (_, target) = begin_run(&mut store, &habit_id, None).unwrap();
        assert_eq!(target, 25);
    }

    #[test]
    fn run_rejects_unknown_habit() {
        let (mut store, _) = store_with_habit(25);
        let err = begin_run(&mut store, "missing", None).unwrap_err();
        assert_eq!(err.to_string(), "habit not found: missing");
    }
}
