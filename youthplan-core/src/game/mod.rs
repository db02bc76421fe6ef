//! Game recommendations and saved games.

mod parse;

pub use parse::parse_games;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlannerError;
use crate::program::LocationType;

/// Participant count bounds, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRange {
    pub min: u32,
    pub max: u32,
}

/// A game extracted from generated recommendation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedGame {
    pub name: String,
    pub description: String,
    pub players: PlayerRange,
    /// Minutes
    pub duration: u32,
    pub materials: Vec<String>,
    /// Steps in execution order
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameCategory {
    Icebreaker,
    Team,
    Individual,
    Quiet,
    Active,
    Spiritual,
}

impl GameCategory {
    pub const ALL: [GameCategory; 6] = [
        GameCategory::Icebreaker,
        GameCategory::Team,
        GameCategory::Individual,
        GameCategory::Quiet,
        GameCategory::Active,
        GameCategory::Spiritual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameCategory::Icebreaker => "icebreaker",
            GameCategory::Team => "team",
            GameCategory::Individual => "individual",
            GameCategory::Quiet => "quiet",
            GameCategory::Active => "active",
            GameCategory::Spiritual => "spiritual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameCategory::Icebreaker => "아이스브레이킹",
            GameCategory::Team => "팀 게임",
            GameCategory::Individual => "개인 게임",
            GameCategory::Quiet => "정적인 게임",
            GameCategory::Active => "활동적인 게임",
            GameCategory::Spiritual => "영적인 게임",
        }
    }
}

impl FromStr for GameCategory {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        GameCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.label() == s)
            .ok_or_else(|| {
                let valid: Vec<_> = GameCategory::ALL.iter().map(|c| c.as_str()).collect();
                PlannerError::InvalidInput(format!(
                    "Unknown game category '{}'. Expected one of: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for GameCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A game saved to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub category: GameCategory,
    pub min_players: u32,
    pub max_players: u32,
    pub duration: u32,
    pub location: LocationType,
    pub description: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
}

impl Game {
    pub fn from_parsed(parsed: ParsedGame, category: GameCategory, location: LocationType) -> Self {
        Game {
            id: Uuid::new_v4().to_string(),
            name: parsed.name,
            category,
            min_players: parsed.players.min,
            max_players: parsed.players.max,
            duration: parsed.duration,
            location,
            description: parsed.description,
            materials: parsed.materials,
            rules: parsed.rules,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
