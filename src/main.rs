mod commands;
mod openai;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::checklist::ChecklistCommand;
use commands::event::EventCommand;
use commands::game::GameCommand;
use commands::memo::MemoCommand;
use commands::program::ProgramCommand;
use commands::schedule::ScheduleCommand;

#[derive(Parser)]
#[command(name = "youthplan")]
#[command(about = "Plan church youth-group events: programs, schedules, games, memos and checklists")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show configuration and data paths
    Config,
    /// Create, list, inspect and delete events
    Event {
        #[command(subcommand)]
        command: EventCommand,
    },
    /// Recommend, parse and save games
    Game {
        #[command(subcommand)]
        command: GameCommand,
    },
    /// Manage the programs of an event
    Program {
        #[command(subcommand)]
        command: ProgramCommand,
    },
    /// Build the running order of an event
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
    /// Meeting notes, with AI summaries and suggestions
    Memo {
        #[command(subcommand)]
        command: MemoCommand,
    },
    /// Preparation checklists
    Checklist {
        #[command(subcommand)]
        command: ChecklistCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config => commands::config::run(),
        Commands::Event { command } => commands::event::run(command),
        Commands::Game { command } => commands::game::run(command).await,
        Commands::Program { command } => commands::program::run(command),
        Commands::Schedule { command } => commands::schedule::run(command).await,
        Commands::Memo { command } => commands::memo::run(command).await,
        Commands::Checklist { command } => commands::checklist::run(command).await,
    }
}

/// Log to stderr filtered by `RUST_LOG` (e.g. `youthplan_core=debug`);
/// warnings only by default.
fn init_tracing() {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_filter_accepts_target_directives() {
        assert_eq!(log_filter(Some("youthplan_core=debug")).to_string(), "youthplan_core=debug");
        assert_eq!(log_filter(Some("info")).to_string(), "info");
        assert_eq!(log_filter(None).to_string(), "warn");
    }

    #[test]
    fn test_parse_schedule_time_allows_empty_value() {
        let cli = Cli::try_parse_from(["youthplan", "schedule", "time", "-e", "retreat", "abc", ""])
            .unwrap();
        match cli.command {
            Commands::Schedule {
                command: ScheduleCommand::Time { time, .. },
            } => assert_eq!(time, ""),
            _ => panic!("expected schedule time"),
        }
    }
}
