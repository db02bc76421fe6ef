//! Events and the planning material attached to them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlannerError;
use crate::program::LocationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Planning,
    InProgress,
    Completed,
}

impl EventStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Planning => "준비 중",
            EventStatus::InProgress => "진행 중",
            EventStatus::Completed => "완료",
        }
    }
}

impl FromStr for EventStatus {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "planning" => Ok(EventStatus::Planning),
            "in_progress" => Ok(EventStatus::InProgress),
            "completed" => Ok(EventStatus::Completed),
            other => Err(PlannerError::InvalidInput(format!(
                "Unknown event status '{}'. Expected planning, in-progress or completed",
                other
            ))),
        }
    }
}

/// A youth-group event (retreat, outing, service day, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub location_type: LocationType,
    #[serde(default)]
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        location: impl Into<String>,
        location_type: LocationType,
    ) -> Self {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            date,
            location: location.into(),
            location_type,
            status: EventStatus::Planning,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A meeting note or idea, optionally annotated by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_suggestions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Memo {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Memo {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            ai_summary: None,
            ai_suggestions: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSubItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<ChecklistSubItem>,
}

impl ChecklistItem {
    pub fn new(title: impl Into<String>) -> Self {
        ChecklistItem {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            is_completed: false,
            sub_items: Vec::new(),
        }
    }

    pub fn add_sub_item(&mut self, title: impl Into<String>) -> &ChecklistSubItem {
        self.sub_items.push(ChecklistSubItem {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            is_completed: false,
        });
        self.refresh_completion();
        &self.sub_items[self.sub_items.len() - 1]
    }

    /// An item with sub-items is complete exactly when all of them are.
    pub fn refresh_completion(&mut self) {
        if !self.sub_items.is_empty() {
            self.is_completed = self.sub_items.iter().all(|s| s.is_completed);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub title: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checklist {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        let now = Utc::now();
        Checklist {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            due_date,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|i| i.is_completed)
    }

    pub fn progress(&self) -> (usize, usize) {
        let done = self.items.iter().filter(|i| i.is_completed).count();
        (done, self.items.len())
    }

    pub fn item_titles(&self) -> Vec<String> {
        self.items.iter().map(|i| i.title.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_completion_rolls_up_from_sub_items() {
        let mut item = ChecklistItem::new("장소 준비");
        item.add_sub_item("의자 배치");
        item.add_sub_item("음향 점검");
        assert!(!item.is_completed);

        item.sub_items[0].is_completed = true;
        item.refresh_completion();
        assert!(!item.is_completed);

        item.sub_items[1].is_completed = true;
        item.refresh_completion();
        assert!(item.is_completed);

        item.add_sub_item("조명 점검");
        assert!(!item.is_completed);
    }

    #[test]
    fn test_item_without_sub_items_keeps_manual_state() {
        let mut item = ChecklistItem::new("간식 구매");
        item.is_completed = true;
        item.refresh_completion();
        assert!(item.is_completed);
    }

    #[test]
    fn test_checklist_progress() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        let mut checklist = Checklist::new("수련회 준비", date);
        assert!(!checklist.is_completed());

        checklist.items.push(ChecklistItem::new("a"));
        checklist.items.push(ChecklistItem::new("b"));
        checklist.items[0].is_completed = true;
        assert_eq!(checklist.progress(), (1, 2));
        assert!(!checklist.is_completed());
    }

    #[test]
    fn test_event_status_parse() {
        assert_eq!("in-progress".parse::<EventStatus>().unwrap(), EventStatus::InProgress);
        assert!("done".parse::<EventStatus>().is_err());
    }
}
