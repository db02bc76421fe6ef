//! Prompt builders and response cleanup for each assistant feature.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::completion::Prompt;
use crate::error::{PlannerError, PlannerResult};
use crate::game::GameCategory;
use crate::program::{LocationType, Program};
use crate::schedule::{ScheduleBlock, format_minutes, parse_minutes, renumber, sorted_by_start};

const MEMO_MAX_TOKENS: u32 = 500;
const CHECKLIST_MAX_TOKENS: u32 = 500;
const SCHEDULE_MAX_TOKENS: u32 = 1000;

static BULLET_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-•\s]+").expect("valid bullet prefix regex"));

/// Conditions for a game recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GameFilters {
    pub category: GameCategory,
    pub players: u32,
    /// Minutes
    pub duration: u32,
    pub location: LocationType,
}

pub fn game_recommendations(filters: &GameFilters) -> Prompt {
    let user = format!(
        "청년부 행사를 위한 게임을 추천해주세요.

조건:
- 카테고리: {category}
- 참여 인원: {players}명
- 소요 시간: {duration}분
- 장소: {location}

다음 형식으로 3개의 게임을 추천해주세요:
1. 이름: [게임 이름]
- 설명: (게임 방법과 목적을 간단히)
- 필요 인원: (최소-최대)
- 소요 시간: (분)
- 준비물: (필요한 경우)
- 진행 방법: (단계별로)

각 게임은 청년부 행사의 특성을 고려하여 재미있고 의미있는 활동이 되도록 해주세요.",
        category = filters.category.as_str(),
        players = filters.players,
        duration = filters.duration,
        location = filters.location.as_str(),
    );

    Prompt {
        system: "당신은 교회 청년부 행사 게임 전문가입니다. 주어진 조건에 맞는 최적의 게임을 추천해주세요."
            .to_string(),
        user,
        max_tokens: None,
        json_response: false,
    }
}

pub fn memo_summary(content: &str) -> Prompt {
    Prompt {
        system: "당신은 회의록과 메모를 요약하는 전문가입니다. 핵심 내용을 간단명료하게 정리해주세요."
            .to_string(),
        user: format!(
            "다음 회의록/메모 내용을 간단히 요약해주세요:\n\n{}\n\n핵심 내용만 간단명료하게 정리해주세요.",
            content
        ),
        max_tokens: Some(MEMO_MAX_TOKENS),
        json_response: false,
    }
}

pub fn memo_suggestions(content: &str) -> Prompt {
    Prompt {
        system: "당신은 교회 청년부 행사 기획 전문가입니다. 메모 내용을 분석하여 실용적인 제안을 해주세요."
            .to_string(),
        user: format!(
            "다음 회의록/메모 내용을 바탕으로 개선 아이디어나 추가로 고려해볼 사항을 제안해주세요:\n\n{}\n\n실용적이고 구체적인 제안을 해주세요.",
            content
        ),
        max_tokens: Some(MEMO_MAX_TOKENS),
        json_response: false,
    }
}

pub fn checklist_suggestions(
    event_title: &str,
    checklist_title: &str,
    current_items: &[String],
    count: usize,
) -> Prompt {
    let items = current_items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "교회 청년부 행사 \"{event_title}\"의 \"{checklist_title}\" 체크리스트에 대해 추가로 필요한 항목들을 추천해주세요.

현재 체크리스트 항목:
{items}

위 항목들을 검토하고, 보완/개선/추가로 필요한 사항을 정확히 {count}개 추천해주세요.
각 항목은 간단명료하게 작성하고, 줄바꿈으로 구분해주세요.

한 번에 한 가지 일을 추천해 주세요.
기존에 있는 항목에 무리한 보완/개선을 하지 말아주세요.

앞에 '-' 나 '•' 같은 기호를 붙이지 말아주세요.
기존 항목과 중복되지 않도록 해주세요.

예시:
장소 예약 확인
참가자 명단 작성
필요한 물품 구매"
    );

    Prompt {
        system: "당신은 교회 청년부 행사 준비를 돕는 전문가입니다. 기존 체크리스트를 검토하고 보완이 필요한 항목들을 추천해주세요."
            .to_string(),
        user,
        max_tokens: Some(CHECKLIST_MAX_TOKENS),
        json_response: false,
    }
}

/// One suggestion per non-empty line, bullets stripped, at most `count`.
pub fn parse_checklist_suggestions(text: &str, count: usize) -> Vec<String> {
    text.lines()
        .map(|line| BULLET_PREFIX_RE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(count)
        .collect()
}

pub fn schedule_draft(programs: &[Program], start_time: &str, memo: Option<&str>) -> Prompt {
    let program_lines = programs
        .iter()
        .map(|p| {
            format!(
                "- id: {} | 이름: {} | 소요 시간: {}분 | 분류: {} | 장소: {} ({})",
                p.id,
                p.name,
                p.duration,
                p.category.label(),
                p.location,
                p.location_type.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let memo_section = memo
        .map(|m| format!("\n추가 고려사항:\n{}\n", m))
        .unwrap_or_default();

    let user = format!(
        "다음 프로그램들로 청년부 행사 일정표를 만들어주세요.

시작 시간: {start_time}

프로그램 목록:
{program_lines}
{memo_section}
규칙:
- 모든 프로그램을 정확히 한 번씩 배치해주세요.
- 프로그램 시간이 서로 겹치지 않게 해주세요.
- 시간은 24시간제 HH:MM 형식으로 작성해주세요.
- 식사와 휴식은 자연스러운 시간대에 배치해주세요.

다음 JSON 형식으로만 응답해주세요:
{{\"schedule\": [{{\"programId\": \"프로그램 id\", \"startTime\": \"HH:MM\"}}]}}"
    );

    Prompt {
        system: "당신은 교회 청년부 행사 일정 전문가입니다. 주어진 프로그램으로 무리 없는 일정표를 JSON으로 작성해주세요."
            .to_string(),
        user,
        max_tokens: Some(SCHEDULE_MAX_TOKENS),
        json_response: true,
    }
}

#[derive(Deserialize)]
struct DraftResponse {
    schedule: Vec<DraftEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftEntry {
    program_id: String,
    start_time: String,
}

/// Turn a schedule-draft JSON answer into blocks sorted by start time.
/// Entries naming unknown programs or unreadable times are dropped, as is
/// any repeat of a program already placed; times are zero-padded.
pub fn parse_schedule_draft(text: &str, programs: &[Program]) -> PlannerResult<Vec<ScheduleBlock>> {
    let response: DraftResponse = serde_json::from_str(strip_code_fence(text)).map_err(|e| {
        PlannerError::Completion(format!("Could not read schedule draft: {}", e))
    })?;

    let by_id: HashMap<&str, &Program> = programs.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut placed: HashSet<String> = HashSet::new();

    let blocks: Vec<ScheduleBlock> = response
        .schedule
        .into_iter()
        .filter_map(|entry| {
            let Some(program) = by_id.get(entry.program_id.as_str()) else {
                warn!(program_id = %entry.program_id, "Draft names an unknown program");
                return None;
            };
            let Some(minutes) = parse_minutes(&entry.start_time) else {
                warn!(start_time = %entry.start_time, "Draft has an unreadable start time");
                return None;
            };
            if !placed.insert(entry.program_id.clone()) {
                warn!(program_id = %entry.program_id, "Draft places a program twice");
                return None;
            }
            Some(ScheduleBlock::at((*program).clone(), format_minutes(minutes)))
        })
        .collect();

    let mut blocks = sorted_by_start(&blocks);
    renumber(&mut blocks);
    Ok(blocks)
}

/// Models sometimes wrap JSON in a markdown code fence even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    match text.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{ProgramCategory, ProgramInput};

    fn program(name: &str, duration: u32) -> Program {
        Program::new(ProgramInput {
            name: name.to_string(),
            duration,
            category: ProgramCategory::Worship,
            location: "본당".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_game_prompt_carries_filters_and_format() {
        let prompt = game_recommendations(&GameFilters {
            category: GameCategory::Team,
            players: 20,
            duration: 30,
            location: LocationType::Outdoor,
        });

        assert!(prompt.user.contains("- 카테고리: team"));
        assert!(prompt.user.contains("- 참여 인원: 20명"));
        assert!(prompt.user.contains("- 장소: outdoor"));
        assert!(prompt.user.contains("1. 이름: [게임 이름]"));
        assert_eq!(prompt.max_tokens, None);
        assert!(!prompt.json_response);
    }

    #[test]
    fn test_checklist_prompt_lists_current_items() {
        let items = vec!["장소 예약".to_string(), "간식 구매".to_string()];
        let prompt = checklist_suggestions("여름 수련회", "사전 준비", &items, 3);

        assert!(prompt.user.contains("\"여름 수련회\"의 \"사전 준비\""));
        assert!(prompt.user.contains("- 장소 예약\n- 간식 구매"));
        assert!(prompt.user.contains("정확히 3개"));
    }

    #[test]
    fn test_parse_checklist_suggestions_strips_bullets() {
        let text = "- 장소 예약 확인\n\n• 참가자 명단 작성\n   필요한 물품 구매\n-\n비상 연락망 정리\n보험 가입";
        assert_eq!(
            parse_checklist_suggestions(text, 4),
            vec!["장소 예약 확인", "참가자 명단 작성", "필요한 물품 구매", "비상 연락망 정리"]
        );
    }

    #[test]
    fn test_parse_schedule_draft_joins_programs_and_sorts() {
        let worship = program("예배", 60);
        let lunch = program("점심", 60);
        let text = format!(
            r#"{{"schedule": [
                {{"programId": "{}", "startTime": "12:00"}},
                {{"programId": "unknown", "startTime": "10:00"}},
                {{"programId": "{}", "startTime": "09:00"}}
            ]}}"#,
            lunch.id, worship.id
        );

        let blocks = parse_schedule_draft(&text, &[worship.clone(), lunch.clone()]).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].program, worship);
        assert_eq!(blocks[0].start_time.as_deref(), Some("09:00"));
        assert_eq!(blocks[0].order, Some(0));
        assert_eq!(blocks[1].program, lunch);
    }

    #[test]
    fn test_parse_schedule_draft_pads_times() {
        let worship = program("예배", 60);
        let lunch = program("점심", 60);
        let text = format!(
            r#"{{"schedule": [
                {{"programId": "{}", "startTime": "12:00"}},
                {{"programId": "{}", "startTime": "9:30"}}
            ]}}"#,
            lunch.id, worship.id
        );

        let blocks = parse_schedule_draft(&text, &[worship, lunch]).unwrap();
        let times: Vec<_> = blocks.iter().filter_map(|b| b.start_time.as_deref()).collect();
        assert_eq!(times, vec!["09:30", "12:00"]);
    }

    #[test]
    fn test_parse_schedule_draft_keeps_first_placement() {
        let worship = program("예배", 60);
        let text = format!(
            r#"{{"schedule": [
                {{"programId": "{id}", "startTime": "13:00"}},
                {{"programId": "{id}", "startTime": "09:00"}}
            ]}}"#,
            id = worship.id
        );

        let blocks = parse_schedule_draft(&text, &[worship]).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_time.as_deref(), Some("13:00"));
    }

    #[test]
    fn test_parse_schedule_draft_accepts_code_fence() {
        let worship = program("예배", 60);
        let text = format!(
            "```json\n{{\"schedule\": [{{\"programId\": \"{}\", \"startTime\": \"09:00\"}}]}}\n```",
            worship.id
        );
        assert_eq!(parse_schedule_draft(&text, &[worship]).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_schedule_draft_rejects_prose() {
        let err = parse_schedule_draft("일정표를 만들 수 없습니다", &[]).unwrap_err();
        assert!(matches!(err, PlannerError::Completion(_)));
    }

    #[test]
    fn test_schedule_prompt_requests_json() {
        let worship = program("예배", 60);
        let prompt = schedule_draft(&[worship.clone()], "09:00", Some("점심은 12시"));
        assert!(prompt.json_response);
        assert!(prompt.user.contains(&worship.id));
        assert!(prompt.user.contains("점심은 12시"));
        assert!(prompt.user.contains("{\"schedule\": [{\"programId\""));
    }
}
