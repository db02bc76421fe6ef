use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use owo_colors::OwoColorize;
use youthplan_core::assist::suggest_checklist_items;
use youthplan_core::event::Checklist;

use super::Context;
use crate::render::Render;
use crate::utils::tui::with_spinner;

const DEFAULT_SUGGESTION_COUNT: usize = 5;

#[derive(Subcommand)]
pub enum ChecklistCommand {
    /// Start a new checklist
    New {
        #[arg(short, long)]
        event: String,

        title: String,

        /// Due date (YYYY-MM-DD); defaults to the event date
        #[arg(short, long)]
        due: Option<NaiveDate>,
    },
    /// Show the checklists of an event
    List {
        #[arg(short, long)]
        event: String,
    },
    /// Add an item to a checklist
    Item {
        #[arg(short, long)]
        event: String,

        /// Checklist id (or prefix)
        checklist: String,

        title: String,
    },
    /// Add a sub-item under a checklist item
    SubItem {
        #[arg(short, long)]
        event: String,
        checklist: String,

        /// Item id (or prefix)
        item: String,

        title: String,
    },
    /// Mark an item (or one of its sub-items) as done
    Check {
        #[arg(short, long)]
        event: String,
        checklist: String,
        item: String,

        /// Sub-item id (or prefix)
        #[arg(short, long)]
        sub: Option<String>,

        /// Mark as not done instead
        #[arg(long)]
        undo: bool,
    },
    /// Let the assistant suggest missing items
    Suggest {
        #[arg(short, long)]
        event: String,
        checklist: String,

        #[arg(short = 'n', long, default_value_t = DEFAULT_SUGGESTION_COUNT)]
        count: usize,

        /// Add the suggestions to the checklist
        #[arg(long)]
        add: bool,
    },
    /// Delete a checklist
    Delete {
        #[arg(short, long)]
        event: String,
        checklist: String,
    },
}

pub async fn run(command: ChecklistCommand) -> Result<()> {
    let ctx = Context::load()?;

    match command {
        ChecklistCommand::New { event, title, due } => {
            if title.trim().is_empty() {
                anyhow::bail!("Checklist title is required");
            }
            let mut record = ctx.event(&event)?;
            let due = due.unwrap_or(record.event.date);
            let checklist = record
                .add_checklist(Checklist::new(title.trim(), due))
                .clone();
            ctx.store.save(&record)?;
            println!("{} {}", "Created".green(), checklist.render());
            Ok(())
        }
        ChecklistCommand::List { event } => {
            let record = ctx.event(&event)?;
            if record.checklists.is_empty() {
                println!("{}", "No checklists yet".dimmed());
            }
            for checklist in &record.checklists {
                println!("{}\n", checklist.render());
            }
            Ok(())
        }
        ChecklistCommand::Item {
            event,
            checklist,
            title,
        } => {
            let mut record = ctx.event(&event)?;
            record.add_checklist_item(&checklist, title)?;
            ctx.store.save(&record)?;
            println!("{}", record.checklist(&checklist)?.render());
            Ok(())
        }
        ChecklistCommand::SubItem {
            event,
            checklist,
            item,
            title,
        } => {
            let mut record = ctx.event(&event)?;
            record.add_checklist_sub_item(&checklist, &item, title)?;
            ctx.store.save(&record)?;
            println!("{}", record.checklist(&checklist)?.render());
            Ok(())
        }
        ChecklistCommand::Check {
            event,
            checklist,
            item,
            sub,
            undo,
        } => {
            let mut record = ctx.event(&event)?;
            match sub {
                Some(sub) => {
                    record.set_sub_item_completed(&checklist, &item, &sub, !undo)?;
                }
                None => {
                    record.set_item_completed(&checklist, &item, !undo)?;
                }
            }
            ctx.store.save(&record)?;
            println!("{}", record.checklist(&checklist)?.render());
            Ok(())
        }
        ChecklistCommand::Suggest {
            event,
            checklist,
            count,
            add,
        } => {
            let mut record = ctx.event(&event)?;
            let current = record.checklist(&checklist)?;
            let (checklist_title, items) = (current.title.clone(), current.item_titles());

            let client = ctx.completion_client()?;
            let suggestions = with_spinner(
                "Looking for missing items...",
                suggest_checklist_items(
                    &client,
                    &ctx.config.completion_settings(),
                    &record.event.name,
                    &checklist_title,
                    &items,
                    count,
                ),
            )
            .await?;

            if suggestions.is_empty() {
                println!("{}", "No suggestions".dimmed());
                return Ok(());
            }

            if !add {
                for suggestion in &suggestions {
                    println!("   {} {}", "+".green(), suggestion);
                }
                return Ok(());
            }

            for suggestion in suggestions {
                record.add_checklist_item(&checklist, suggestion)?;
            }
            ctx.store.save(&record)?;
            println!("{}", record.checklist(&checklist)?.render());
            Ok(())
        }
        ChecklistCommand::Delete { event, checklist } => {
            let mut record = ctx.event(&event)?;
            let removed = record.delete_checklist(&checklist)?;
            ctx.store.save(&record)?;
            println!("{} {}", "Deleted".red(), removed.title);
            Ok(())
        }
    }
}
