use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Subcommand;
use owo_colors::OwoColorize;
use youthplan_core::assist::recommend_games;
use youthplan_core::completion::prompts::GameFilters;
use youthplan_core::game::{Game, GameCategory, ParsedGame, parse_games};
use youthplan_core::program::LocationType;
use youthplan_core::store::EventRecord;

use super::Context;
use crate::render::{Render, short_id};
use crate::utils::tui::with_spinner;

#[derive(Subcommand)]
pub enum GameCommand {
    /// Ask the assistant for three games that fit the conditions
    Recommend {
        /// icebreaker, team, individual, quiet, active or spiritual
        #[arg(short, long, default_value = "icebreaker")]
        category: GameCategory,

        /// Number of participants
        #[arg(short, long, default_value_t = 10)]
        players: u32,

        /// Minutes available
        #[arg(short, long, default_value_t = 15)]
        duration: u32,

        /// indoor, outdoor or both
        #[arg(short, long, default_value = "indoor")]
        location: LocationType,

        /// Save the recognized games to this event
        #[arg(short, long)]
        event: Option<String>,
    },
    /// Extract games from a markdown recommendation ("-" reads stdin)
    Parse {
        file: PathBuf,

        #[arg(short, long, default_value = "icebreaker")]
        category: GameCategory,

        #[arg(short, long, default_value = "indoor")]
        location: LocationType,

        /// Save the recognized games to this event
        #[arg(short, long)]
        event: Option<String>,
    },
    /// List the games saved to an event
    List {
        #[arg(short, long)]
        event: String,
    },
    /// Turn a saved game into a program
    ToProgram {
        #[arg(short, long)]
        event: String,

        /// Game id (or prefix)
        game: String,

        /// Where the game is played
        #[arg(short, long, default_value = "")]
        location: String,
    },
    /// Remove a saved game
    Delete {
        #[arg(short, long)]
        event: String,
        game: String,
    },
}

pub async fn run(command: GameCommand) -> Result<()> {
    let ctx = Context::load()?;

    match command {
        GameCommand::Recommend {
            category,
            players,
            duration,
            location,
            event,
        } => {
            let mut record = event.as_deref().map(|key| ctx.event(key)).transpose()?;
            let client = ctx.completion_client()?;
            let filters = GameFilters {
                category,
                players,
                duration,
                location,
            };

            let result = with_spinner(
                "Asking for game ideas...",
                recommend_games(&client, &ctx.config.completion_settings(), &filters),
            )
            .await?;

            if result.games.is_empty() {
                println!("{}", "No games could be recognized. Raw answer:".yellow());
                println!("{}", result.text);
                return Ok(());
            }

            print_games(&result.games);
            if let Some(ref mut record) = record {
                save_games(&ctx, record, result.games, category, location)?;
            }
            Ok(())
        }
        GameCommand::Parse {
            file,
            category,
            location,
            event,
        } => {
            let markdown = read_input(&file)?;
            let games = parse_games(&markdown);
            if games.is_empty() {
                println!("{}", "No complete games found".dimmed());
                return Ok(());
            }

            print_games(&games);
            if let Some(key) = event {
                let mut record = ctx.event(&key)?;
                save_games(&ctx, &mut record, games, category, location)?;
            }
            Ok(())
        }
        GameCommand::List { event } => {
            let record = ctx.event(&event)?;
            if record.games.is_empty() {
                println!("{}", "No games saved".dimmed());
            }
            for game in &record.games {
                println!("{}\n", game.render());
            }
            Ok(())
        }
        GameCommand::ToProgram {
            event,
            game,
            location,
        } => {
            let mut record = ctx.event(&event)?;
            let program = record.add_program_from_game(&game, location)?.clone();
            ctx.store.save(&record)?;
            println!("{} {}", "Added program".green(), program.render());
            Ok(())
        }
        GameCommand::Delete { event, game } => {
            let mut record = ctx.event(&event)?;
            let removed = record.delete_game(&game)?;
            ctx.store.save(&record)?;
            println!("{} {}", "Deleted".red(), removed.name);
            Ok(())
        }
    }
}

fn print_games(games: &[ParsedGame]) {
    for (i, game) in games.iter().enumerate() {
        println!("{}. {}\n", i + 1, game.render());
    }
}

fn save_games(
    ctx: &Context,
    record: &mut EventRecord,
    games: Vec<ParsedGame>,
    category: GameCategory,
    location: LocationType,
) -> Result<()> {
    let ids: Vec<String> = games
        .into_iter()
        .map(|parsed| {
            record
                .save_game(Game::from_parsed(parsed, category, location))
                .id
                .clone()
        })
        .collect();
    ctx.store.save(record)?;

    let ids: Vec<&str> = ids.iter().map(|id| short_id(id)).collect();
    println!(
        "{} {} game(s) to {}: {}",
        "Saved".green(),
        ids.len(),
        record.event.name,
        ids.join(", ")
    );
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
