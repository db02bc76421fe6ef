//! TUI rendering traits for youthplan types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to youthplan-core types using owo_colors.

use owo_colors::OwoColorize;
use youthplan_core::event::{Checklist, ChecklistItem, Event, EventStatus, Memo};
use youthplan_core::game::{Game, ParsedGame};
use youthplan_core::program::Program;
use youthplan_core::schedule::{Overlap, TimelineEntry};
use youthplan_core::store::EventRecord;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Ids are UUIDs; the first eight characters are enough to type back.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

impl Render for EventStatus {
    fn render(&self) -> String {
        match self {
            EventStatus::Planning => self.label().yellow().to_string(),
            EventStatus::InProgress => self.label().cyan().to_string(),
            EventStatus::Completed => self.label().green().to_string(),
        }
    }
}

impl Render for Event {
    fn render(&self) -> String {
        format!(
            "{} {} {} ({}) {}",
            self.date.format("%Y-%m-%d").to_string().bold(),
            self.name,
            self.location.dimmed(),
            self.location_type.label().dimmed(),
            self.status.render()
        )
    }
}

impl Render for EventRecord {
    fn render(&self) -> String {
        format!("{} {}", self.event.render(), format!("[{}]", self.slug).dimmed())
    }
}

impl Render for Program {
    fn render(&self) -> String {
        let location = if self.location.is_empty() {
            self.location_type.label().to_string()
        } else {
            format!("{}, {}", self.location, self.location_type.label())
        };

        format!(
            "{} {} {} {} {}",
            short_id(&self.id).dimmed(),
            self.name.bold(),
            format!("{}분", self.duration).cyan(),
            format!("[{}]", self.category.label()).magenta(),
            location.dimmed()
        )
    }
}

impl Render for TimelineEntry {
    fn render(&self) -> String {
        let program = &self.block.program;
        format!(
            "{}-{} {} {} {}",
            self.start_label().bold(),
            self.end_label().bold(),
            program.name,
            format!("[{}]", program.category.label()).magenta(),
            short_id(&program.id).dimmed()
        )
    }
}

impl Render for Overlap {
    fn render(&self) -> String {
        format!(
            "{} {} and {} overlap by {} min",
            "!".red(),
            short_id(&self.first_id),
            short_id(&self.second_id),
            self.minutes
        )
    }
}

fn render_game_body(
    lines: &mut Vec<String>,
    description: &str,
    materials: &[String],
    rules: &[String],
) {
    lines.push(format!("   {}", description));
    if !materials.is_empty() {
        lines.push(format!("   {} {}", "준비물:".dimmed(), materials.join(", ")));
    }
    for (i, rule) in rules.iter().enumerate() {
        lines.push(format!("   {} {}", format!("{}.", i + 1).dimmed(), rule));
    }
}

impl Render for ParsedGame {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} {}",
            self.name.bold(),
            format!("{}-{}명", self.players.min, self.players.max).cyan(),
            format!("{}분", self.duration).cyan()
        )];
        render_game_body(&mut lines, &self.description, &self.materials, &self.rules);
        lines.join("\n")
    }
}

impl Render for Game {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} {} {} {}",
            short_id(&self.id).dimmed(),
            self.name.bold(),
            format!("{}-{}명", self.min_players, self.max_players).cyan(),
            format!("{}분", self.duration).cyan(),
            format!("[{}, {}]", self.category.label(), self.location.label()).magenta()
        )];
        render_game_body(&mut lines, &self.description, &self.materials, &self.rules);
        lines.join("\n")
    }
}

impl Render for Memo {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} {}", short_id(&self.id).dimmed(), self.title.bold()),
            format!("   {}", self.content),
        ];
        if let Some(ref summary) = self.ai_summary {
            lines.push(format!("   {} {}", "요약:".green(), summary));
        }
        if let Some(ref suggestions) = self.ai_suggestions {
            lines.push(format!("   {} {}", "제안:".green(), suggestions));
        }
        lines.join("\n")
    }
}

fn checkbox(done: bool) -> String {
    if done {
        "[x]".green().to_string()
    } else {
        "[ ]".dimmed().to_string()
    }
}

impl Render for ChecklistItem {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "   {} {} {}",
            checkbox(self.is_completed),
            self.title,
            short_id(&self.id).dimmed()
        )];
        for sub_item in &self.sub_items {
            lines.push(format!(
                "       {} {} {}",
                checkbox(sub_item.is_completed),
                sub_item.title,
                short_id(&sub_item.id).dimmed()
            ));
        }
        lines.join("\n")
    }
}

impl Render for Checklist {
    fn render(&self) -> String {
        let (done, total) = self.progress();
        let progress = format!("{}/{}", done, total);
        let progress = if self.is_completed() {
            progress.green().to_string()
        } else {
            progress.yellow().to_string()
        };

        let mut lines = vec![format!(
            "{} {} {} {}",
            short_id(&self.id).dimmed(),
            self.title.bold(),
            progress,
            format!("(due {})", self.due_date.format("%Y-%m-%d")).dimmed()
        )];
        lines.extend(self.items.iter().map(|item| item.render()));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0f8fad5b-d9cb-469f-a165-70867728950e"), "0f8fad5b");
        assert_eq!(short_id("abc"), "abc");
    }
}
