use chrono::Utc;
use clap::Subcommand;
use grove_core::{format_minutes, Config, ProgressChart, Summary};

use super::{open_store, print_json, CmdResult};

const BAR_WIDTH: u32 = 30;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals across all habits
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Daily minutes for one habit
    Chart {
        /// Habit ID
        habit_id: String,
        /// Number of days to show (defaults to `stats.chart_days`)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn bar(minutes: u32, scale: u32) -> String {
    let filled = if scale == 0 {
        0
    } else {
        (minutes.min(scale) * BAR_WIDTH).div_ceil(scale)
    };
    "#".repeat(filled as usize)
}

pub fn run(action: StatsAction) -> CmdResult {
    let config = Config::load_or_default();
    let store = open_store(&config)?;
    let now = Utc::now();

    match action {
        StatsAction::Summary { json } => {
            let summary = Summary::compute_with_window(
                store.habits(),
                store.sessions(),
                now,
                config.stats.week_days,
            );
            if json {
                print_json(&summary)?;
            } else {
                println!("Habits:          {}", summary.habit_count);
                println!(
                    "Done today:      {}/{} ({}%)",
                    summary.completed_today, summary.habit_count, summary.completion_rate_pct
                );
                println!(
                    "Streaks:         total {}  avg {}  best {}",
                    summary.total_streak, summary.average_streak, summary.longest_streak
                );
                println!("Total time:      {}", format_minutes(summary.total_minutes));
                println!("Sessions:        {}", summary.total_sessions);
                println!(
                    "Last {} days:    {}",
                    config.stats.week_days,
                    format_minutes(summary.minutes_this_week)
                );
            }
        }
        StatsAction::Chart {
            habit_id,
            days,
            json,
        } => {
            let habit = store
                .habit(&habit_id)
                .ok_or_else(|| format!("habit not found: {habit_id}"))?;
            let days = days.unwrap_or(config.stats.chart_days);
            let chart = ProgressChart::for_habit(store.sessions(), &habit_id, days, now.date_naive());
            if json {
                print_json(&chart)?;
            } else {
                println!("{} {} (scale {}min)", habit.icon, habit.name, chart.scale_minutes);
                for day in &chart.days {
                    let mark = match (day.completed, day.is_today) {
                        (true, _) => "*",
                        (false, true) => ">",
                        _ => " ",
                    };
                    println!(
                        "{} {} {:>4}  {}",
                        day.date.format("%m-%d"),
                        mark,
                        day.minutes,
                        bar(day.minutes, chart.scale_minutes)
                    );
                }
                println!(
                    "{} over {} days, {} completed",
                    format_minutes(chart.total_minutes()),
                    days,
                    chart.completed_days()
                );
            }
        }
    }
    Ok(())
}
