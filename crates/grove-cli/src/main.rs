use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "grove", version, about = "Grove habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Recorded sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Focus timer sessions
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Progress statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr, filtered by `GROVE_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("GROVE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Focus { action } => commands::focus::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
