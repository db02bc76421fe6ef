//! Extract structured games from generated recommendation text.
//!
//! The completion provider answers game requests with a numbered list:
//!
//! ```text
//! 1. 이름: 몸으로 말해요
//! - 설명: 몸짓만으로 단어를 설명하는 팀 게임
//! - 필요 인원: 6-20명
//! - 소요 시간: 20분
//! - 준비물: 단어 카드, 타이머
//! - 진행 방법:
//!   1) 팀을 나눈다
//!   2) 한 명이 단어를 보고 몸으로 표현한다
//! ```
//!
//! Parsing is lenient: a block missing a name, description, player count or
//! duration is skipped without an error.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::game::{ParsedGame, PlayerRange};

/// Lower bound applied when only a single participant count is given.
const MIN_PLAYERS: u32 = 2;

static GAME_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.\s*이름:").expect("valid game start regex"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*이름:\s*(.*)$").expect("valid name regex"));

static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]+[).]\s*(.*)$").expect("valid rule regex"));

static PLAYER_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^0-9]*([0-9]+)\s*(?:명)?\s*[-~]\s*([0-9]+)").expect("valid player range regex")
});

static PLAYER_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^0-9]*([0-9]+)").expect("valid player count regex"));

static FIRST_INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid integer regex"));

const DESCRIPTION_LABEL: &str = "- 설명:";
const PLAYERS_LABEL: &str = "- 필요 인원:";
const DURATION_LABEL: &str = "- 소요 시간:";
const MATERIALS_LABEL: &str = "- 준비물:";
const RULES_LABEL: &str = "- 진행 방법:";
const NO_MATERIALS: &str = "없음";

/// Parse every complete game out of `markdown`, in source order.
pub fn parse_games(markdown: &str) -> Vec<ParsedGame> {
    split_blocks(markdown)
        .into_iter()
        .filter_map(|block| {
            let game = GameDraft::scan(block).finish();
            if game.is_none() {
                debug!(
                    block = block.lines().next().unwrap_or_default().trim(),
                    "Skipping incomplete game block"
                );
            }
            game
        })
        .collect()
}

/// Split before each `<n>. 이름:` marker, keeping the marker in the block
/// that follows it. Blank blocks are dropped.
fn split_blocks(markdown: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut block_start = 0;

    for marker in GAME_START_RE.find_iter(markdown) {
        blocks.push(&markdown[block_start..marker.start()]);
        block_start = marker.start();
    }
    blocks.push(&markdown[block_start..]);

    blocks.retain(|b| !b.trim().is_empty());
    blocks
}

#[derive(Debug, Default)]
struct GameDraft {
    name: Option<String>,
    description: Option<String>,
    players: Option<PlayerRange>,
    duration: Option<u32>,
    materials: Vec<String>,
    rules: Vec<String>,
}

impl GameDraft {
    fn scan(block: &str) -> Self {
        let mut draft = GameDraft::default();
        let mut collecting_rules = false;

        for line in block.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if collecting_rules {
                if line.starts_with("- ") {
                    // Another field label: stop collecting and handle it below
                    collecting_rules = false;
                } else {
                    draft.push_rule_line(line);
                    continue;
                }
            }

            if let Some(caps) = NAME_RE.captures(line) {
                let name = unquote(&caps[1]);
                if !name.is_empty() {
                    draft.name = Some(name.to_string());
                }
            } else if let Some(rest) = line.strip_prefix(DESCRIPTION_LABEL) {
                let description = rest.trim();
                if !description.is_empty() {
                    draft.description = Some(description.to_string());
                }
            } else if let Some(rest) = line.strip_prefix(PLAYERS_LABEL) {
                draft.players = parse_players(rest.trim());
            } else if let Some(rest) = line.strip_prefix(DURATION_LABEL) {
                draft.duration = parse_duration(rest);
            } else if let Some(rest) = line.strip_prefix(MATERIALS_LABEL) {
                draft.materials = parse_materials(rest.trim());
            } else if line.starts_with(RULES_LABEL) {
                collecting_rules = true;
            }
        }

        draft
    }

    /// A numbered line starts a new step; anything else continues the last one.
    fn push_rule_line(&mut self, line: &str) {
        if let Some(caps) = RULE_RE.captures(line) {
            self.rules.push(caps[1].trim().to_string());
            return;
        }

        match self.rules.last_mut() {
            Some(last) if !last.is_empty() => {
                last.push(' ');
                last.push_str(line);
            }
            Some(last) => last.push_str(line),
            None => self.rules.push(line.to_string()),
        }
    }

    fn finish(self) -> Option<ParsedGame> {
        let rules = self
            .rules
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        Some(ParsedGame {
            name: self.name?,
            description: self.description?,
            players: self.players?,
            duration: self.duration?,
            materials: self.materials,
            rules,
        })
    }
}

/// Strip one pair of surrounding quotes, ASCII or typographic.
fn unquote(text: &str) -> &str {
    let text = text.trim();
    for (open, close) in [('"', '"'), ('“', '”'), ('\'', '\'')] {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    text
}

/// `4-10명` / `4~10명` give an explicit range. A single `n명` gives
/// `max = n` and `min = max(2, n / 2)`, never above `max`.
fn parse_players(text: &str) -> Option<PlayerRange> {
    if let Some(caps) = PLAYER_RANGE_RE.captures(text) {
        let a: u32 = caps[1].parse().ok()?;
        let b: u32 = caps[2].parse().ok()?;
        return Some(PlayerRange {
            min: a.min(b),
            max: a.max(b),
        });
    }

    let caps = PLAYER_COUNT_RE.captures(text)?;
    let max: u32 = caps[1].parse().ok()?;
    let min = (max / 2).max(MIN_PLAYERS).min(max);
    Some(PlayerRange { min, max })
}

/// First integer in the text, in minutes. Units are ignored.
fn parse_duration(text: &str) -> Option<u32> {
    let minutes: u32 = FIRST_INT_RE.find(text)?.as_str().parse().ok()?;
    (minutes > 0).then_some(minutes)
}

fn parse_materials(text: &str) -> Vec<String> {
    if text.is_empty() || text.to_lowercase() == NO_MATERIALS {
        return Vec::new();
    }

    text.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
