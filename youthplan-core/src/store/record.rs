use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PlannerError, PlannerResult};
use crate::event::{Checklist, ChecklistItem, ChecklistSubItem, Event, Memo};
use crate::game::Game;
use crate::program::{LocationType, Program, ProgramCategory, ProgramInput};
use crate::schedule::{ScheduleBlock, ScheduleSlot};
use crate::utils::resolve_index;

/// Everything stored for one event, persisted as `event.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Directory name; derived from the location on disk, never serialized.
    #[serde(skip)]
    pub slug: String,
    pub event: Event,
    #[serde(default)]
    pub programs: Vec<Program>,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub memos: Vec<Memo>,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

impl EventRecord {
    pub fn new(slug: String, event: Event) -> Self {
        EventRecord {
            slug,
            event,
            programs: Vec::new(),
            schedule: Vec::new(),
            games: Vec::new(),
            memos: Vec::new(),
            checklists: Vec::new(),
        }
    }

    // Programs

    pub fn program(&self, id: &str) -> PlannerResult<&Program> {
        let index = resolve_index(&self.programs, id, |p| p.id.as_str(), "Program")?;
        Ok(&self.programs[index])
    }

    pub fn add_program(&mut self, input: ProgramInput) -> PlannerResult<&Program> {
        input.validate()?;
        Ok(self.push_program(Program::new(input)))
    }

    pub fn update_program(&mut self, id: &str, input: ProgramInput) -> PlannerResult<&Program> {
        input.validate()?;
        let index = resolve_index(&self.programs, id, |p| p.id.as_str(), "Program")?;
        self.programs[index].update(input);
        self.event.touch();
        Ok(&self.programs[index])
    }

    /// Remove a program together with any schedule slot that places it.
    pub fn delete_program(&mut self, id: &str) -> PlannerResult<Program> {
        let index = resolve_index(&self.programs, id, |p| p.id.as_str(), "Program")?;
        let program = self.programs.remove(index);
        self.schedule.retain(|slot| slot.program_id != program.id);
        self.event.touch();
        Ok(program)
    }

    pub fn add_program_from_game(
        &mut self,
        game_id: &str,
        location: impl Into<String>,
    ) -> PlannerResult<&Program> {
        let program = Program::from_game(self.game(game_id)?, location);
        Ok(self.push_program(program))
    }

    pub fn add_program_from_memo(
        &mut self,
        memo_id: &str,
        duration: u32,
        category: ProgramCategory,
        location_type: LocationType,
        location: impl Into<String>,
    ) -> PlannerResult<&Program> {
        if duration == 0 {
            return Err(PlannerError::InvalidInput(
                "Duration must be at least one minute".into(),
            ));
        }
        let program = Program::from_memo(
            self.memo(memo_id)?,
            duration,
            category,
            location_type,
            location,
        );
        Ok(self.push_program(program))
    }

    fn push_program(&mut self, program: Program) -> &Program {
        self.programs.push(program);
        self.event.touch();
        &self.programs[self.programs.len() - 1]
    }

    /// Programs that have no slot on the schedule yet.
    pub fn unscheduled_programs(&self) -> Vec<&Program> {
        self.programs
            .iter()
            .filter(|p| !self.schedule.iter().any(|slot| slot.program_id == p.id))
            .collect()
    }

    // Schedule

    /// Join the stored slots with their programs, in `order`.
    pub fn schedule_blocks(&self) -> Vec<ScheduleBlock> {
        let by_id: HashMap<&str, &Program> =
            self.programs.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut slots: Vec<&ScheduleSlot> = self.schedule.iter().collect();
        slots.sort_by_key(|slot| slot.order);

        slots
            .into_iter()
            .filter_map(|slot| match by_id.get(slot.program_id.as_str()) {
                Some(program) => Some(ScheduleBlock {
                    program: (*program).clone(),
                    start_time: slot.start_time.clone(),
                    order: Some(slot.order),
                }),
                None => {
                    warn!(
                        event = %self.slug,
                        program_id = %slot.program_id,
                        "Schedule slot references a missing program"
                    );
                    None
                }
            })
            .collect()
    }

    /// Replace the stored slots; each block's position becomes its order.
    pub fn set_schedule(&mut self, blocks: &[ScheduleBlock]) {
        self.schedule = blocks
            .iter()
            .enumerate()
            .map(|(index, block)| ScheduleSlot {
                program_id: block.id().to_string(),
                start_time: block.start_time.clone(),
                order: index as u32,
            })
            .collect();
        self.event.touch();
    }

    // Games

    pub fn game(&self, id: &str) -> PlannerResult<&Game> {
        let index = resolve_index(&self.games, id, |g| g.id.as_str(), "Game")?;
        Ok(&self.games[index])
    }

    pub fn save_game(&mut self, game: Game) -> &Game {
        self.games.push(game);
        self.event.touch();
        &self.games[self.games.len() - 1]
    }

    pub fn delete_game(&mut self, id: &str) -> PlannerResult<Game> {
        let index = resolve_index(&self.games, id, |g| g.id.as_str(), "Game")?;
        self.event.touch();
        Ok(self.games.remove(index))
    }

    // Memos

    pub fn memo(&self, id: &str) -> PlannerResult<&Memo> {
        let index = resolve_index(&self.memos, id, |m| m.id.as_str(), "Memo")?;
        Ok(&self.memos[index])
    }

    pub fn add_memo(&mut self, memo: Memo) -> &Memo {
        self.memos.push(memo);
        self.event.touch();
        &self.memos[self.memos.len() - 1]
    }

    pub fn delete_memo(&mut self, id: &str) -> PlannerResult<Memo> {
        let index = resolve_index(&self.memos, id, |m| m.id.as_str(), "Memo")?;
        self.event.touch();
        Ok(self.memos.remove(index))
    }

    pub fn set_memo_summary(&mut self, id: &str, summary: String) -> PlannerResult<&Memo> {
        let memo = self.memo_mut(id)?;
        memo.ai_summary = Some(summary);
        memo.updated_at = chrono::Utc::now();
        self.memo(id)
    }

    pub fn set_memo_suggestions(&mut self, id: &str, suggestions: String) -> PlannerResult<&Memo> {
        let memo = self.memo_mut(id)?;
        memo.ai_suggestions = Some(suggestions);
        memo.updated_at = chrono::Utc::now();
        self.memo(id)
    }

    fn memo_mut(&mut self, id: &str) -> PlannerResult<&mut Memo> {
        let index = resolve_index(&self.memos, id, |m| m.id.as_str(), "Memo")?;
        self.event.touch();
        Ok(&mut self.memos[index])
    }

    // Checklists

    pub fn checklist(&self, id: &str) -> PlannerResult<&Checklist> {
        let index = resolve_index(&self.checklists, id, |c| c.id.as_str(), "Checklist")?;
        Ok(&self.checklists[index])
    }

    pub fn add_checklist(&mut self, checklist: Checklist) -> &Checklist {
        self.checklists.push(checklist);
        self.event.touch();
        &self.checklists[self.checklists.len() - 1]
    }

    pub fn delete_checklist(&mut self, id: &str) -> PlannerResult<Checklist> {
        let index = resolve_index(&self.checklists, id, |c| c.id.as_str(), "Checklist")?;
        self.event.touch();
        Ok(self.checklists.remove(index))
    }

    pub fn add_checklist_item(
        &mut self,
        checklist_id: &str,
        title: impl Into<String>,
    ) -> PlannerResult<&ChecklistItem> {
        let title = non_blank(title.into(), "Checklist item")?;
        let checklist = self.checklist_mut(checklist_id)?;
        checklist.items.push(ChecklistItem::new(title));
        Ok(&checklist.items[checklist.items.len() - 1])
    }

    pub fn add_checklist_sub_item(
        &mut self,
        checklist_id: &str,
        item_id: &str,
        title: impl Into<String>,
    ) -> PlannerResult<&ChecklistSubItem> {
        let title = non_blank(title.into(), "Sub-item")?;
        let item = self.checklist_item_mut(checklist_id, item_id)?;
        Ok(item.add_sub_item(title))
    }

    /// Mark an item done or not done. An item with sub-items passes the state
    /// down to all of them so the rollup stays consistent.
    pub fn set_item_completed(
        &mut self,
        checklist_id: &str,
        item_id: &str,
        completed: bool,
    ) -> PlannerResult<&ChecklistItem> {
        let item = self.checklist_item_mut(checklist_id, item_id)?;
        for sub_item in &mut item.sub_items {
            sub_item.is_completed = completed;
        }
        item.is_completed = completed;
        Ok(item)
    }

    pub fn set_sub_item_completed(
        &mut self,
        checklist_id: &str,
        item_id: &str,
        sub_item_id: &str,
        completed: bool,
    ) -> PlannerResult<&ChecklistItem> {
        let item = self.checklist_item_mut(checklist_id, item_id)?;
        let index = resolve_index(&item.sub_items, sub_item_id, |s| s.id.as_str(), "Sub-item")?;
        item.sub_items[index].is_completed = completed;
        item.refresh_completion();
        Ok(item)
    }

    fn checklist_mut(&mut self, id: &str) -> PlannerResult<&mut Checklist> {
        let index = resolve_index(&self.checklists, id, |c| c.id.as_str(), "Checklist")?;
        self.event.touch();
        let checklist = &mut self.checklists[index];
        checklist.updated_at = chrono::Utc::now();
        Ok(checklist)
    }

    fn checklist_item_mut(
        &mut self,
        checklist_id: &str,
        item_id: &str,
    ) -> PlannerResult<&mut ChecklistItem> {
        let checklist = self.checklist_mut(checklist_id)?;
        let index = resolve_index(&checklist.items, item_id, |i| i.id.as_str(), "Checklist item")?;
        Ok(&mut checklist.items[index])
    }
}

fn non_blank(title: String, kind: &str) -> PlannerResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PlannerError::InvalidInput(format!("{} title is required", kind)));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EventStore;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record() -> EventRecord {
        let event = Event::new(
            "여름 수련회",
            NaiveDate::from_ymd_opt(2025, 7, 20).unwrap(),
            "양평 수련원",
            LocationType::Indoor,
        );
        EventRecord::new("2025-07-20-여름-수련회".to_string(), event)
    }

    fn input(name: &str, duration: u32) -> ProgramInput {
        ProgramInput {
            name: name.to_string(),
            duration,
            location: "본당".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_program_validates_input() {
        let mut record = record();
        assert!(record.add_program(input("", 30)).is_err());
        assert!(record.add_program(input("예배", 0)).is_err());
        assert!(record.programs.is_empty());

        let id = record.add_program(input("예배", 60)).unwrap().id.clone();
        assert_eq!(record.program(&id[..6]).unwrap().name, "예배");
    }

    #[test]
    fn test_deleting_program_removes_its_slots() {
        let mut record = record();
        let worship = Program::new(input("예배", 60));
        let lunch = Program::new(input("점심", 60));
        record.programs = vec![worship.clone(), lunch.clone()];
        record.set_schedule(&[
            ScheduleBlock::at(worship.clone(), "10:00"),
            ScheduleBlock::at(lunch.clone(), "12:00"),
        ]);

        record.delete_program(&worship.id).unwrap();
        assert_eq!(record.schedule.len(), 1);
        assert_eq!(record.schedule[0].program_id, lunch.id);
    }

    #[test]
    fn test_removing_slot_keeps_program() {
        let mut record = record();
        let worship = Program::new(input("예배", 60));
        record.programs = vec![worship.clone()];
        record.set_schedule(&[ScheduleBlock::at(worship.clone(), "10:00")]);

        let blocks = crate::schedule::remove_block(record.schedule_blocks(), &worship.id);
        record.set_schedule(&blocks);

        assert!(record.schedule.is_empty());
        assert_eq!(record.programs.len(), 1);
        assert_eq!(record.unscheduled_programs().len(), 1);
    }

    #[test]
    fn test_schedule_blocks_follow_order_and_skip_missing() {
        let mut record = record();
        let worship = Program::new(input("예배", 60));
        let lunch = Program::new(input("점심", 60));
        record.programs = vec![worship.clone(), lunch.clone()];
        record.schedule = vec![
            ScheduleSlot {
                program_id: lunch.id.clone(),
                start_time: Some("12:00".into()),
                order: 1,
            },
            ScheduleSlot {
                program_id: "gone".into(),
                start_time: None,
                order: 2,
            },
            ScheduleSlot {
                program_id: worship.id.clone(),
                start_time: Some("10:00".into()),
                order: 0,
            },
        ];

        let blocks = record.schedule_blocks();
        let names: Vec<_> = blocks.iter().map(|b| b.program.name.as_str()).collect();
        assert_eq!(names, vec!["예배", "점심"]);
        assert_eq!(blocks[1].order, Some(1));
    }

    #[test]
    fn test_program_from_memo_prefers_summary() {
        let mut record = record();
        let memo_id = record.add_memo(Memo::new("찬양 집회", "긴 회의록")).id.clone();
        record
            .set_memo_summary(&memo_id, "저녁 찬양 집회".to_string())
            .unwrap();

        let program = record
            .add_program_from_memo(&memo_id, 90, ProgramCategory::Praise, LocationType::Indoor, "본당")
            .unwrap();
        assert_eq!(program.name, "찬양 집회");
        assert_eq!(program.description.as_deref(), Some("저녁 찬양 집회"));
        assert!(
            record
                .add_program_from_memo(&memo_id, 0, ProgramCategory::Etc, LocationType::Indoor, "")
                .is_err()
        );
    }

    #[test]
    fn test_checklist_sub_item_rollup() {
        let mut record = record();
        let checklist_id = record
            .add_checklist(Checklist::new("사전 준비", NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()))
            .id
            .clone();
        let item_id = record
            .add_checklist_item(&checklist_id, "장소 준비")
            .unwrap()
            .id
            .clone();
        let first = record
            .add_checklist_sub_item(&checklist_id, &item_id, "의자 배치")
            .unwrap()
            .id
            .clone();
        let second = record
            .add_checklist_sub_item(&checklist_id, &item_id, "음향 점검")
            .unwrap()
            .id
            .clone();

        let item = record
            .set_sub_item_completed(&checklist_id, &item_id, &first, true)
            .unwrap();
        assert!(!item.is_completed);

        let item = record
            .set_sub_item_completed(&checklist_id, &item_id, &second, true)
            .unwrap();
        assert!(item.is_completed);
        assert!(record.checklist(&checklist_id).unwrap().is_completed());

        let item = record
            .set_item_completed(&checklist_id, &item_id, false)
            .unwrap();
        assert!(item.sub_items.iter().all(|s| !s.is_completed));
        assert!(record.add_checklist_item(&checklist_id, "  ").is_err());
    }

    #[test]
    fn test_record_round_trips_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(dir.path());
        let mut record = store.create_event(record().event).unwrap();

        let program = record.add_program(input("예배", 60)).unwrap().clone();
        record.set_schedule(&[ScheduleBlock::at(program, "10:00")]);
        record.add_memo(Memo::new("회의", "장소 확정"));
        store.save(&record).unwrap();

        let loaded = store.load(&record.slug).unwrap();
        assert_eq!(loaded, record);
    }
}
