use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;
use youthplan_core::assist::{suggest_for_memo, summarize_memo};
use youthplan_core::event::Memo;

use super::Context;
use crate::render::Render;
use crate::utils::tui::with_spinner;

#[derive(Subcommand)]
pub enum MemoCommand {
    /// Write down meeting notes
    Add {
        #[arg(short, long)]
        event: String,

        title: String,

        content: String,
    },
    /// List the memos of an event
    List {
        #[arg(short, long)]
        event: String,
    },
    /// Let the assistant summarize a memo
    Summarize {
        #[arg(short, long)]
        event: String,

        /// Memo id (or prefix)
        memo: String,
    },
    /// Let the assistant suggest improvements for a memo
    Suggest {
        #[arg(short, long)]
        event: String,
        memo: String,
    },
    /// Delete a memo
    Delete {
        #[arg(short, long)]
        event: String,
        memo: String,
    },
}

pub async fn run(command: MemoCommand) -> Result<()> {
    let ctx = Context::load()?;

    match command {
        MemoCommand::Add {
            event,
            title,
            content,
        } => {
            if title.trim().is_empty() || content.trim().is_empty() {
                anyhow::bail!("A memo needs a title and some content");
            }
            let mut record = ctx.event(&event)?;
            let memo = record.add_memo(Memo::new(title.trim(), content)).clone();
            ctx.store.save(&record)?;
            println!("{} {}", "Added".green(), memo.render());
            Ok(())
        }
        MemoCommand::List { event } => {
            let record = ctx.event(&event)?;
            if record.memos.is_empty() {
                println!("{}", "No memos yet".dimmed());
            }
            for memo in &record.memos {
                println!("{}\n", memo.render());
            }
            Ok(())
        }
        MemoCommand::Summarize { event, memo } => {
            let mut record = ctx.event(&event)?;
            let client = ctx.completion_client()?;
            let summary = with_spinner(
                "Summarizing...",
                summarize_memo(&client, &ctx.config.completion_settings(), record.memo(&memo)?),
            )
            .await?;

            let memo = record.set_memo_summary(&memo, summary)?.clone();
            ctx.store.save(&record)?;
            println!("{}", memo.render());
            Ok(())
        }
        MemoCommand::Suggest { event, memo } => {
            let mut record = ctx.event(&event)?;
            let client = ctx.completion_client()?;
            let suggestions = with_spinner(
                "Thinking of suggestions...",
                suggest_for_memo(&client, &ctx.config.completion_settings(), record.memo(&memo)?),
            )
            .await?;

            let memo = record.set_memo_suggestions(&memo, suggestions)?.clone();
            ctx.store.save(&record)?;
            println!("{}", memo.render());
            Ok(())
        }
        MemoCommand::Delete { event, memo } => {
            let mut record = ctx.event(&event)?;
            let removed = record.delete_memo(&memo)?;
            ctx.store.save(&record)?;
            println!("{} {}", "Deleted".red(), removed.title);
            Ok(())
        }
    }
}
