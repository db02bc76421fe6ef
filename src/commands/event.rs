use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use owo_colors::OwoColorize;
use youthplan_core::event::{Event, EventStatus};
use youthplan_core::program::LocationType;

use super::Context;
use super::schedule::print_schedule;
use crate::render::Render;

#[derive(Subcommand)]
pub enum EventCommand {
    /// Create a new event
    New {
        name: String,

        /// Event date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Venue
        #[arg(short, long, default_value = "")]
        location: String,

        /// indoor, outdoor or both
        #[arg(long, default_value = "indoor")]
        location_type: LocationType,
    },
    /// List all events by date
    List,
    /// Show an event with its schedule and planning material
    Show {
        /// Event slug or id
        event: String,
    },
    /// Set the event status (planning, in-progress, completed)
    Status { event: String, status: EventStatus },
    /// Delete an event and everything stored with it
    Delete { event: String },
}

pub fn run(command: EventCommand) -> Result<()> {
    let ctx = Context::load()?;

    match command {
        EventCommand::New {
            name,
            date,
            location,
            location_type,
        } => {
            if name.trim().is_empty() {
                anyhow::bail!("Event name is required");
            }
            let record = ctx
                .store
                .create_event(Event::new(name.trim(), date, location, location_type))?;
            println!("{} {}", "Created".green(), record.render());
            Ok(())
        }
        EventCommand::List => {
            let records = ctx.store.events()?;
            if records.is_empty() {
                println!("{}", "No events found".dimmed());
                return Ok(());
            }
            for record in &records {
                println!("{}", record.render());
            }
            Ok(())
        }
        EventCommand::Show { event } => {
            let record = ctx.event(&event)?;
            println!("{}", record.render());

            println!();
            print_schedule(&record.schedule_blocks());

            let unscheduled = record.unscheduled_programs();
            if !unscheduled.is_empty() {
                println!();
                println!("{}", "Unscheduled programs".bold());
                for program in unscheduled {
                    println!("   {}", program.render());
                }
            }

            println!();
            println!(
                "{} {}  {} {}  {} {}",
                "Games:".dimmed(),
                record.games.len(),
                "Memos:".dimmed(),
                record.memos.len(),
                "Checklists:".dimmed(),
                record.checklists.len()
            );
            for checklist in &record.checklists {
                let (done, total) = checklist.progress();
                println!("   {} {}/{}", checklist.title, done, total);
            }
            Ok(())
        }
        EventCommand::Status { event, status } => {
            let mut record = ctx.event(&event)?;
            record.event.status = status;
            record.event.touch();
            ctx.store.save(&record)?;
            println!("{}", record.render());
            Ok(())
        }
        EventCommand::Delete { event } => {
            let record = ctx.event(&event)?;
            ctx.store.delete_event(&record.slug)?;
            println!("{} {}", "Deleted".red(), record.event.name);
            Ok(())
        }
    }
}
