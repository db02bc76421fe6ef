use anyhow::Result;
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use youthplan_core::program::{LocationType, ProgramCategory, ProgramInput};

use super::Context;
use crate::render::Render;

#[derive(Args)]
pub struct ProgramFields {
    /// Length in minutes
    #[arg(short, long)]
    pub duration: Option<u32>,

    /// game, worship, meal, qt, ice_break, praise, lecture, group, rest, etc
    #[arg(short, long)]
    pub category: Option<ProgramCategory>,

    /// indoor, outdoor or both
    #[arg(long)]
    pub location_type: Option<LocationType>,

    /// Room or place
    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand)]
pub enum ProgramCommand {
    /// Add a program to an event
    Add {
        #[arg(short, long)]
        event: String,

        name: String,

        #[command(flatten)]
        fields: ProgramFields,
    },
    /// Change fields of an existing program
    Edit {
        #[arg(short, long)]
        event: String,

        /// Program id (or prefix)
        program: String,

        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        fields: ProgramFields,
    },
    /// Create a program from a memo (its summary becomes the description)
    FromMemo {
        #[arg(short, long)]
        event: String,

        /// Memo id (or prefix)
        memo: String,

        #[command(flatten)]
        fields: ProgramFields,
    },
    /// List the programs of an event
    List {
        #[arg(short, long)]
        event: String,
    },
    /// Remove a program; it is also taken off the schedule
    Remove {
        #[arg(short, long)]
        event: String,
        program: String,
    },
}

impl ProgramFields {
    /// Overlay the given fields on `base`.
    fn apply(self, mut base: ProgramInput) -> ProgramInput {
        if let Some(duration) = self.duration {
            base.duration = duration;
        }
        if let Some(category) = self.category {
            base.category = category;
        }
        if let Some(location_type) = self.location_type {
            base.location_type = location_type;
        }
        if let Some(location) = self.location {
            base.location = location;
        }
        if self.description.is_some() {
            base.description = self.description;
        }
        base
    }
}

pub fn run(command: ProgramCommand) -> Result<()> {
    let ctx = Context::load()?;

    match command {
        ProgramCommand::Add {
            event,
            name,
            fields,
        } => {
            let mut record = ctx.event(&event)?;
            let input = fields.apply(ProgramInput {
                name,
                ..Default::default()
            });
            let program = record.add_program(input)?.clone();
            ctx.store.save(&record)?;
            println!("{} {}", "Added".green(), program.render());
            Ok(())
        }
        ProgramCommand::Edit {
            event,
            program,
            name,
            fields,
        } => {
            let mut record = ctx.event(&event)?;
            let current = record.program(&program)?;
            let id = current.id.clone();
            let base = ProgramInput {
                name: name.unwrap_or_else(|| current.name.clone()),
                duration: current.duration,
                location_type: current.location_type,
                category: current.category,
                location: current.location.clone(),
                description: current.description.clone(),
            };

            let updated = record.update_program(&id, fields.apply(base))?.clone();
            ctx.store.save(&record)?;
            println!("{} {}", "Updated".green(), updated.render());
            Ok(())
        }
        ProgramCommand::FromMemo {
            event,
            memo,
            fields,
        } => {
            let mut record = ctx.event(&event)?;
            let Some(duration) = fields.duration else {
                anyhow::bail!("--duration is required when creating a program from a memo");
            };
            let program = record
                .add_program_from_memo(
                    &memo,
                    duration,
                    fields.category.unwrap_or_default(),
                    fields.location_type.unwrap_or_default(),
                    fields.location.unwrap_or_default(),
                )?
                .clone();
            ctx.store.save(&record)?;
            println!("{} {}", "Added".green(), program.render());
            Ok(())
        }
        ProgramCommand::List { event } => {
            let record = ctx.event(&event)?;
            if record.programs.is_empty() {
                println!("{}", "No programs yet".dimmed());
            }
            for program in &record.programs {
                println!("{}", program.render());
            }
            Ok(())
        }
        ProgramCommand::Remove { event, program } => {
            let mut record = ctx.event(&event)?;
            let removed = record.delete_program(&program)?;
            ctx.store.save(&record)?;
            println!("{} {}", "Removed".red(), removed.name);
            Ok(())
        }
    }
}
