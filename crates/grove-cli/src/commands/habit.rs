use clap::Subcommand;
use grove_core::{format_minutes, Config, Habit, HabitUpdate, NewHabit};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a habit
    Add {
        /// Habit name
        name: String,
        /// Longer description
        #[arg(long, default_value = "")]
        description: String,
        /// Color token (e.g. "#4ECDC4")
        #[arg(long)]
        color: Option<String>,
        /// Icon token (e.g. an emoji)
        #[arg(long)]
        icon: Option<String>,
        /// Daily target in minutes
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        target: Option<u32>,
    },
    /// List habits
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one habit as JSON
    Show {
        /// Habit ID
        id: String,
    },
    /// Change habit fields
    Edit {
        /// Habit ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        target: Option<u32>,
    },
    /// Delete a habit and all of its sessions
    Delete {
        /// Habit ID
        id: String,
    },
}

fn validated_name(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    let name = name.trim();
    if name.is_empty() {
        return Err("habit name cannot be empty".into());
    }
    Ok(name.to_string())
}

fn habit_line(habit: &Habit) -> String {
    let done = if habit.completed_today { "  done today" } else { "" };
    format!(
        "{}  {} {}  {}min/day  {:.0}%  streak {}  total {}{}",
        habit.id,
        habit.icon,
        habit.name,
        habit.target_minutes,
        habit.progress() * 100.0,
        habit.streak,
        format_minutes(u64::from(habit.total_minutes)),
        done,
    )
}

pub fn run(action: HabitAction) -> CmdResult {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        HabitAction::Add {
            name,
            description,
            color,
            icon,
            target,
        } => {
            let defaults = &config.habits;
            let id = store.add_habit(NewHabit {
                name: validated_name(&name)?,
                description: description.trim().to_string(),
                color: color.unwrap_or_else(|| defaults.default_color.clone()),
                icon: icon.unwrap_or_else(|| defaults.default_icon.clone()),
                target_minutes: target.unwrap_or(defaults.default_target_minutes),
            });
            if let Some(habit) = store.habit(&id) {
                print_json(habit)?;
            }
        }
        HabitAction::List { json } => {
            if json {
                print_json(&store.habits())?;
            } else if store.habits().is_empty() {
                println!("No habits yet. Create one with `grove habit add <name>`.");
            } else {
                for habit in store.habits() {
                    println!("{}", habit_line(habit));
                }
            }
        }
        HabitAction::Show { id } => {
            let habit = store
                .habit(&id)
                .ok_or_else(|| format!("habit not found: {id}"))?;
            print_json(habit)?;
        }
        HabitAction::Edit {
            id,
            name,
            description,
            color,
            icon,
            target,
        } => {
            if store.habit(&id).is_none() {
                return Err(format!("habit not found: {id}").into());
            }
            let update = HabitUpdate {
                name: name.as_deref().map(validated_name).transpose()?,
                description: description.map(|d| d.trim().to_string()),
                color,
                icon,
                target_minutes: target,
                ..Default::default()
            };
            if update.is_empty() {
                return Err("nothing to update".into());
            }
            store.update_habit(&id, update);
            if let Some(habit) = store.habit(&id) {
                print_json(habit)?;
            }
        }
        HabitAction::Delete { id } => {
            if !store.delete_habit(&id) {
                return Err(format!("habit not found: {id}").into());
            }
            println!("deleted {id}");
        }
    }
    Ok(())
}
