//! Assistant features: prompt, call the completion provider, parse the answer.

use tracing::info;

use crate::completion::prompts::{self, GameFilters};
use crate::completion::{CompletionProvider, CompletionRequest, CompletionSettings};
use crate::error::{PlannerError, PlannerResult};
use crate::event::Memo;
use crate::game::{ParsedGame, parse_games};
use crate::program::Program;
use crate::schedule::ScheduleBlock;

/// Raw recommendation text plus the games recognized in it.
#[derive(Debug, Clone)]
pub struct GameRecommendations {
    pub text: String,
    pub games: Vec<ParsedGame>,
}

pub async fn recommend_games<P: CompletionProvider>(
    provider: &P,
    settings: &CompletionSettings,
    filters: &GameFilters,
) -> PlannerResult<GameRecommendations> {
    let request = CompletionRequest::new(settings, prompts::game_recommendations(filters));
    let text = provider.complete(request).await?;
    let games = parse_games(&text);

    info!(recognized = games.len(), "Received game recommendations");
    Ok(GameRecommendations { text, games })
}

pub async fn summarize_memo<P: CompletionProvider>(
    provider: &P,
    settings: &CompletionSettings,
    memo: &Memo,
) -> PlannerResult<String> {
    let request = CompletionRequest::new(settings, prompts::memo_summary(&memo.content));
    non_empty(provider.complete(request).await?, "memo summary")
}

pub async fn suggest_for_memo<P: CompletionProvider>(
    provider: &P,
    settings: &CompletionSettings,
    memo: &Memo,
) -> PlannerResult<String> {
    let request = CompletionRequest::new(settings, prompts::memo_suggestions(&memo.content));
    non_empty(provider.complete(request).await?, "memo suggestions")
}

pub async fn suggest_checklist_items<P: CompletionProvider>(
    provider: &P,
    settings: &CompletionSettings,
    event_title: &str,
    checklist_title: &str,
    current_items: &[String],
    count: usize,
) -> PlannerResult<Vec<String>> {
    let prompt = prompts::checklist_suggestions(event_title, checklist_title, current_items, count);
    let text = provider.complete(CompletionRequest::new(settings, prompt)).await?;
    Ok(prompts::parse_checklist_suggestions(&text, count))
}

pub async fn draft_schedule<P: CompletionProvider>(
    provider: &P,
    settings: &CompletionSettings,
    programs: &[Program],
    start_time: &str,
    memo: Option<&str>,
) -> PlannerResult<Vec<ScheduleBlock>> {
    if programs.is_empty() {
        return Err(PlannerError::InvalidInput(
            "Add at least one program before drafting a schedule".into(),
        ));
    }

    let prompt = prompts::schedule_draft(programs, start_time, memo);
    let text = provider.complete(CompletionRequest::new(settings, prompt)).await?;
    prompts::parse_schedule_draft(&text, programs)
}

fn non_empty(text: String, what: &str) -> PlannerResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::Completion(format!("Empty {} from provider", what)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Role;
    use crate::game::{GameCategory, PlayerRange};
    use crate::program::{LocationType, ProgramInput};
    use std::sync::Mutex;

    /// Replies with a fixed answer and records what it was asked.
    struct CannedProvider {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl CannedProvider {
        fn new(reply: impl Into<String>) -> Self {
            CannedProvider {
                reply: reply.into(),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> CompletionRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl CompletionProvider for CannedProvider {
        async fn complete(&self, request: CompletionRequest) -> PlannerResult<String> {
            self.seen.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    fn settings() -> CompletionSettings {
        CompletionSettings {
            model: "test-model".to_string(),
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn test_recommend_games_parses_reply() {
        let provider = CannedProvider::new(
            "1. 이름: 풍선 터뜨리기\n- 설명: 발목의 풍선을 지킨다\n- 필요 인원: 10명\n- 소요 시간: 15분\n- 준비물: 풍선, 끈\n\n\
2. 이름: 미완성\n- 설명: 인원이 없다\n- 소요 시간: 10분\n",
        );
        let filters = GameFilters {
            category: GameCategory::Active,
            players: 10,
            duration: 15,
            location: LocationType::Outdoor,
        };

        let result = recommend_games(&provider, &settings(), &filters).await.unwrap();
        assert_eq!(result.games.len(), 1);
        assert_eq!(result.games[0].players, PlayerRange { min: 5, max: 10 });
        assert!(result.text.contains("미완성"));

        let request = provider.last_request();
        assert_eq!(request.model, "test-model");
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].role, Role::User);
    }

    #[tokio::test]
    async fn test_summarize_memo_rejects_blank_reply() {
        let provider = CannedProvider::new("   ");
        let memo = Memo::new("회의", "장소는 수련원으로 결정");
        let err = summarize_memo(&provider, &settings(), &memo).await.unwrap_err();
        assert!(matches!(err, PlannerError::Completion(_)));
    }

    #[tokio::test]
    async fn test_suggest_for_memo_uses_limited_prompt() {
        let provider = CannedProvider::new(" 우천 대비 실내 장소를 확보하세요 ");
        let memo = Memo::new("회의", "야외 활동 위주");
        let text = suggest_for_memo(&provider, &settings(), &memo).await.unwrap();
        assert_eq!(text, "우천 대비 실내 장소를 확보하세요");
        assert_eq!(provider.last_request().max_tokens, Some(500));
    }

    #[tokio::test]
    async fn test_suggest_checklist_items_truncates() {
        let provider = CannedProvider::new("- 하나\n- 둘\n- 셋\n- 넷");
        let items = suggest_checklist_items(&provider, &settings(), "수련회", "준비", &[], 2)
            .await
            .unwrap();
        assert_eq!(items, vec!["하나", "둘"]);
    }

    #[tokio::test]
    async fn test_draft_schedule_requires_programs() {
        let provider = CannedProvider::new("{}");
        let err = draft_schedule(&provider, &settings(), &[], "09:00", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_draft_schedule_uses_json_mode() {
        let program = Program::new(ProgramInput {
            name: "예배".into(),
            duration: 60,
            ..Default::default()
        });
        let provider = CannedProvider::new(format!(
            "{{\"schedule\": [{{\"programId\": \"{}\", \"startTime\": \"10:00\"}}]}}",
            program.id
        ));

        let blocks = draft_schedule(&provider, &settings(), &[program], "10:00", None)
            .await
            .unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(provider.last_request().json_response);
    }
}
