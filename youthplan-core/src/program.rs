//! Reusable program definitions (the building blocks of a schedule).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlannerError;
use crate::event::Memo;
use crate::game::Game;

/// Where an activity takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    #[default]
    Indoor,
    Outdoor,
    Both,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Indoor => "indoor",
            LocationType::Outdoor => "outdoor",
            LocationType::Both => "both",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationType::Indoor => "실내",
            LocationType::Outdoor => "야외",
            LocationType::Both => "실내/야외",
        }
    }
}

impl FromStr for LocationType {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indoor" => Ok(LocationType::Indoor),
            "outdoor" => Ok(LocationType::Outdoor),
            "both" => Ok(LocationType::Both),
            other => Err(PlannerError::InvalidInput(format!(
                "Unknown location type '{}'. Expected indoor, outdoor or both",
                other
            ))),
        }
    }
}

/// Program category (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramCategory {
    Game,
    Worship,
    Meal,
    /// Devotional reading
    Qt,
    IceBreak,
    Praise,
    /// Lecture or sermon
    Lecture,
    /// Small-group activity
    Group,
    Rest,
    #[default]
    Etc,
}

impl ProgramCategory {
    pub const ALL: [ProgramCategory; 10] = [
        ProgramCategory::Game,
        ProgramCategory::Worship,
        ProgramCategory::Meal,
        ProgramCategory::Qt,
        ProgramCategory::IceBreak,
        ProgramCategory::Praise,
        ProgramCategory::Lecture,
        ProgramCategory::Group,
        ProgramCategory::Rest,
        ProgramCategory::Etc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramCategory::Game => "game",
            ProgramCategory::Worship => "worship",
            ProgramCategory::Meal => "meal",
            ProgramCategory::Qt => "qt",
            ProgramCategory::IceBreak => "ice_break",
            ProgramCategory::Praise => "praise",
            ProgramCategory::Lecture => "lecture",
            ProgramCategory::Group => "group",
            ProgramCategory::Rest => "rest",
            ProgramCategory::Etc => "etc",
        }
    }

    /// Display label shown to organizers
    pub fn label(&self) -> &'static str {
        match self {
            ProgramCategory::Game => "게임",
            ProgramCategory::Worship => "예배",
            ProgramCategory::Meal => "식사",
            ProgramCategory::Qt => "큐티",
            ProgramCategory::IceBreak => "아이스브레이크",
            ProgramCategory::Praise => "찬양",
            ProgramCategory::Lecture => "강의/설교",
            ProgramCategory::Group => "조별 활동",
            ProgramCategory::Rest => "휴식",
            ProgramCategory::Etc => "기타",
        }
    }
}

impl FromStr for ProgramCategory {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ProgramCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.label() == s)
            .ok_or_else(|| {
                let valid: Vec<_> = ProgramCategory::ALL.iter().map(|c| c.as_str()).collect();
                PlannerError::InvalidInput(format!(
                    "Unknown program category '{}'. Expected one of: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for ProgramCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Game,
    Memo,
}

/// Where a program came from. Provenance only: deleting the source leaves
/// the program untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSource {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub id: String,
}

/// A reusable activity definition, independent of scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub name: String,
    /// Minutes
    pub duration: u32,
    pub location_type: LocationType,
    pub category: ProgramCategory,
    /// Free-text venue
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ProgramSource>,
}

/// Fields supplied when creating or editing a program.
#[derive(Debug, Clone, Default)]
pub struct ProgramInput {
    pub name: String,
    pub duration: u32,
    pub location_type: LocationType,
    pub category: ProgramCategory,
    pub location: String,
    pub description: Option<String>,
}

impl ProgramInput {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.name.trim().is_empty() {
            return Err(PlannerError::InvalidInput("Program name is required".into()));
        }
        if self.duration == 0 {
            return Err(PlannerError::InvalidInput(
                "Program duration must be at least one minute".into(),
            ));
        }
        Ok(())
    }
}

impl Program {
    pub fn new(input: ProgramInput) -> Self {
        Program {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            duration: input.duration,
            location_type: input.location_type,
            category: input.category,
            location: input.location,
            description: input.description,
            source: None,
        }
    }

    /// Apply edited fields, keeping id and provenance.
    pub fn update(&mut self, input: ProgramInput) {
        self.name = input.name.trim().to_string();
        self.duration = input.duration;
        self.location_type = input.location_type;
        self.category = input.category;
        self.location = input.location;
        self.description = input.description;
    }

    /// Turn a saved game into a schedulable program.
    pub fn from_game(game: &Game, location: impl Into<String>) -> Self {
        Program {
            id: Uuid::new_v4().to_string(),
            name: game.name.clone(),
            duration: game.duration,
            location_type: game.location,
            category: ProgramCategory::Game,
            location: location.into(),
            description: Some(game.description.clone()),
            source: Some(ProgramSource {
                kind: SourceKind::Game,
                id: game.id.clone(),
            }),
        }
    }

    /// Turn a memo (typically one analysed by the assistant) into a program.
    pub fn from_memo(
        memo: &Memo,
        duration: u32,
        category: ProgramCategory,
        location_type: LocationType,
        location: impl Into<String>,
    ) -> Self {
        let description = memo
            .ai_summary
            .clone()
            .unwrap_or_else(|| memo.content.clone());

        Program {
            id: Uuid::new_v4().to_string(),
            name: memo.title.clone(),
            duration,
            location_type,
            category,
            location: location.into(),
            description: Some(description),
            source: Some(ProgramSource {
                kind: SourceKind::Memo,
                id: memo.id.clone(),
            }),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameCategory, ParsedGame, PlayerRange};

    #[test]
    fn test_category_parses_from_value_or_label() {
        assert_eq!("ice_break".parse::<ProgramCategory>().unwrap(), ProgramCategory::IceBreak);
        assert_eq!("강의/설교".parse::<ProgramCategory>().unwrap(), ProgramCategory::Lecture);
        assert_eq!("QT".parse::<ProgramCategory>().unwrap(), ProgramCategory::Qt);
        assert!("party".parse::<ProgramCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&ProgramCategory::IceBreak).unwrap();
        assert_eq!(json, "\"ice_break\"");
    }

    #[test]
    fn test_program_from_game_keeps_provenance() {
        let parsed = ParsedGame {
            name: "몸으로 말해요".to_string(),
            description: "몸짓으로 단어를 설명하는 게임".to_string(),
            players: PlayerRange { min: 4, max: 20 },
            duration: 20,
            materials: vec!["단어 카드".to_string()],
            rules: vec![],
        };
        let game = Game::from_parsed(parsed, GameCategory::Team, LocationType::Indoor);
        let program = Program::from_game(&game, "본당");

        assert_eq!(program.category, ProgramCategory::Game);
        assert_eq!(program.duration, 20);
        assert_eq!(program.location, "본당");
        assert_eq!(
            program.source,
            Some(ProgramSource {
                kind: SourceKind::Game,
                id: game.id.clone()
            })
        );
    }

    #[test]
    fn test_program_input_rejects_zero_duration() {
        let input = ProgramInput {
            name: "찬양".into(),
            duration: 0,
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }
}
