use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Subcommand;
use owo_colors::OwoColorize;
use youthplan_core::assist::draft_schedule;
use youthplan_core::ics::generate_schedule_ics;
use youthplan_core::schedule::{
    ScheduleBlock, find_overlaps, format_minutes, pack_sequentially, parse_minutes,
    place_program, remove_block, reorder_on_time_change, time_range, timeline,
};
use youthplan_core::store::EventRecord;

use super::Context;
use crate::render::Render;
use crate::utils::tui::with_spinner;

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// Put a program on the schedule
    Add {
        #[arg(short, long)]
        event: String,

        /// Program id (or prefix)
        program: String,

        /// Start time (HH:MM); left unscheduled if omitted
        #[arg(short, long)]
        at: Option<String>,
    },
    /// Change the start time of a scheduled program ("" clears it)
    Time {
        #[arg(short, long)]
        event: String,
        program: String,
        time: String,
    },
    /// Take a program off the schedule (the program itself is kept)
    Remove {
        #[arg(short, long)]
        event: String,
        program: String,
    },
    /// Show the running order
    Show {
        #[arg(short, long)]
        event: String,
    },
    /// Lay the schedule out back to back from a start time
    Pack {
        #[arg(short, long)]
        event: String,

        #[arg(short, long)]
        start: String,
    },
    /// Let the assistant draft a schedule from all programs
    Draft {
        #[arg(short, long)]
        event: String,

        #[arg(short, long)]
        start: String,

        /// Extra considerations, or a memo id (or prefix) whose content to use
        #[arg(short, long)]
        memo: Option<String>,
    },
    /// Write the schedule as an iCalendar file
    Export {
        #[arg(short, long)]
        event: String,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(command: ScheduleCommand) -> Result<()> {
    let ctx = Context::load()?;

    match command {
        ScheduleCommand::Add { event, program, at } => {
            let mut record = ctx.event(&event)?;
            let program = record.program(&program)?.clone();
            let blocks = record.schedule_blocks();
            if blocks.iter().any(|b| b.id() == program.id) {
                anyhow::bail!("'{}' is already on the schedule", program.name);
            }

            let id = program.id.clone();
            let mut blocks = place_program(blocks, program);
            if let Some(time) = at {
                blocks = reorder_on_time_change(blocks, &id, &normalize_time(&time)?);
            }

            save_schedule(&ctx, &mut record, &blocks)
        }
        ScheduleCommand::Time {
            event,
            program,
            time,
        } => {
            let mut record = ctx.event(&event)?;
            let id = record.program(&program)?.id.clone();
            let blocks = record.schedule_blocks();
            if !blocks.iter().any(|b| b.id() == id) {
                anyhow::bail!("Program is not on the schedule; add it with `schedule add`");
            }
            let time = if time.trim().is_empty() {
                String::new()
            } else {
                normalize_time(&time)?
            };

            let blocks = reorder_on_time_change(blocks, &id, &time);
            save_schedule(&ctx, &mut record, &blocks)
        }
        ScheduleCommand::Remove { event, program } => {
            let mut record = ctx.event(&event)?;
            let id = record.program(&program)?.id.clone();
            let blocks = remove_block(record.schedule_blocks(), &id);
            save_schedule(&ctx, &mut record, &blocks)
        }
        ScheduleCommand::Show { event } => {
            let record = ctx.event(&event)?;
            print_schedule(&record.schedule_blocks());
            Ok(())
        }
        ScheduleCommand::Pack { event, start } => {
            let mut record = ctx.event(&event)?;
            let blocks = pack_sequentially(record.schedule_blocks(), &start)?;
            save_schedule(&ctx, &mut record, &blocks)
        }
        ScheduleCommand::Draft { event, start, memo } => {
            let mut record = ctx.event(&event)?;
            let start = normalize_time(&start)?;
            let memo = memo.map(|text| match record.memo(&text) {
                Ok(memo) => memo.content.clone(),
                Err(_) => text,
            });

            let client = ctx.completion_client()?;
            let blocks = with_spinner(
                "Drafting schedule...",
                draft_schedule(
                    &client,
                    &ctx.config.completion_settings(),
                    &record.programs,
                    &start,
                    memo.as_deref(),
                ),
            )
            .await?;

            if blocks.is_empty() {
                anyhow::bail!("The draft did not place any known program; schedule left unchanged");
            }
            save_schedule(&ctx, &mut record, &blocks)
        }
        ScheduleCommand::Export { event, output } => {
            let record = ctx.event(&event)?;
            let ics = generate_schedule_ics(&record.event, &record.schedule_blocks())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, ics)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("{} {}", "Exported".green(), path.display());
                }
                None => print!("{}", ics),
            }
            Ok(())
        }
    }
}

/// Zero-padded "HH:MM", so stored times sort in time order.
fn normalize_time(time: &str) -> Result<String> {
    match parse_minutes(time) {
        Some(minutes) => Ok(format_minutes(minutes)),
        None => anyhow::bail!("Invalid time '{}'. Use HH:MM", time),
    }
}

fn save_schedule(ctx: &Context, record: &mut EventRecord, blocks: &[ScheduleBlock]) -> Result<()> {
    record.set_schedule(blocks);
    ctx.store.save(record)?;
    print_schedule(&record.schedule_blocks());
    Ok(())
}

pub fn print_schedule(blocks: &[ScheduleBlock]) {
    if let Some(range) = time_range(blocks) {
        println!(
            "{} {}-{} ({}분)",
            "Schedule".bold(),
            range.start_label(),
            range.end_label(),
            range.duration()
        );
    }

    let entries = timeline(blocks);
    for entry in &entries {
        println!("   {}", entry.render());
    }

    let unscheduled: Vec<&ScheduleBlock> = blocks.iter().filter(|b| !b.is_scheduled()).collect();
    if !unscheduled.is_empty() {
        println!("{}", "No start time yet".dimmed());
        for block in unscheduled {
            println!("   {}", block.program.render());
        }
    }

    if blocks.is_empty() {
        println!("{}", "Nothing scheduled yet".dimmed());
    }

    for overlap in find_overlaps(blocks) {
        println!("   {}", overlap.render());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_time_pads_hours() {
        assert_eq!(normalize_time("9:05").unwrap(), "09:05");
        assert_eq!(normalize_time("23:30").unwrap(), "23:30");
        assert!(normalize_time("9시").is_err());
        assert!(normalize_time("10:75").is_err());
        assert!(normalize_time("99999999:00").is_err());
    }
}
