//! Minute arithmetic over "HH:MM" start times.
//!
//! Start times come from a time picker, so sorting compares the raw strings:
//! zero-padded 24h "HH:MM" sorts lexically in time order. Arithmetic parses
//! them into minutes since midnight. A start time that does not parse is
//! skipped (with a warning) rather than corrected.

use serde::Serialize;
use tracing::{debug, warn};

use crate::schedule::ScheduleBlock;

/// Span covered by all scheduled blocks, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl TimeRange {
    pub fn duration(&self) -> u32 {
        self.end_minutes - self.start_minutes
    }

    pub fn start_label(&self) -> String {
        format_minutes(self.start_minutes)
    }

    pub fn end_label(&self) -> String {
        format_minutes(self.end_minutes)
    }
}

/// A scheduled block with its derived start and end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub block: ScheduleBlock,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl TimelineEntry {
    pub fn start_label(&self) -> String {
        format_minutes(self.start_minutes)
    }

    pub fn end_label(&self) -> String {
        format_minutes(self.end_minutes)
    }
}

/// "HH:MM" to minutes since midnight. Hours past 23 are allowed; a value too
/// large for `u32` minutes does not parse.
pub fn parse_minutes(time: &str) -> Option<u32> {
    let (hours, minutes) = time.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Minutes to zero-padded "HH:MM". Does not wrap at midnight: 1500 is "25:00".
pub fn format_minutes(total_minutes: u32) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Derived end label for a scheduled block.
pub fn end_time(block: &ScheduleBlock) -> Option<String> {
    let start = parse_minutes(block.start_time.as_deref()?)?;
    Some(format_minutes(start.checked_add(block.duration())?))
}

/// Scheduled blocks only, ascending by start time. Stable for equal times.
pub fn sorted_by_start(blocks: &[ScheduleBlock]) -> Vec<ScheduleBlock> {
    let mut scheduled: Vec<ScheduleBlock> = blocks
        .iter()
        .filter(|b| b.start_time.is_some())
        .cloned()
        .collect();
    scheduled.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    scheduled
}

/// Earliest start and latest end across scheduled blocks.
/// `None` when nothing is scheduled.
pub fn time_range(blocks: &[ScheduleBlock]) -> Option<TimeRange> {
    scheduled_minutes(blocks).fold(None, |range, (start, end)| {
        Some(match range {
            None => TimeRange {
                start_minutes: start,
                end_minutes: end,
            },
            Some(r) => TimeRange {
                start_minutes: r.start_minutes.min(start),
                end_minutes: r.end_minutes.max(end),
            },
        })
    })
}

/// Scheduled blocks in start order with their derived start/end minutes.
pub fn timeline(blocks: &[ScheduleBlock]) -> Vec<TimelineEntry> {
    sorted_by_start(blocks)
        .into_iter()
        .filter_map(|block| {
            let (start_minutes, end_minutes) = block_minutes(&block)?;
            Some(TimelineEntry {
                block,
                start_minutes,
                end_minutes,
            })
        })
        .collect()
}

/// Set one block's start time and re-sort the whole set: scheduled blocks by
/// start time, unscheduled ones after them. An empty `new_time` unschedules
/// the block.
pub fn reorder_on_time_change(
    mut blocks: Vec<ScheduleBlock>,
    block_id: &str,
    new_time: &str,
) -> Vec<ScheduleBlock> {
    let new_time = new_time.trim();

    match blocks.iter_mut().find(|b| b.id() == block_id) {
        Some(block) => {
            block.start_time = (!new_time.is_empty()).then(|| new_time.to_string());
        }
        None => debug!(block_id, "No schedule block to retime"),
    }

    blocks.sort_by(|a, b| match (&a.start_time, &b.start_time) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    blocks
}

fn block_minutes(block: &ScheduleBlock) -> Option<(u32, u32)> {
    let start_time = block.start_time.as_deref()?;
    let Some(start) = parse_minutes(start_time) else {
        warn!(block = block.id(), start_time, "Ignoring malformed start time");
        return None;
    };
    let Some(end) = start.checked_add(block.duration()) else {
        warn!(
            block = block.id(),
            start_time,
            duration = block.duration(),
            "Ignoring block that ends out of range"
        );
        return None;
    };
    Some((start, end))
}

fn scheduled_minutes(blocks: &[ScheduleBlock]) -> impl Iterator<Item = (u32, u32)> + '_ {
    blocks.iter().filter_map(block_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{Program, ProgramInput};
    use proptest::prelude::*;

    fn block(name: &str, start: Option<&str>, duration: u32) -> ScheduleBlock {
        let program = Program::new(ProgramInput {
            name: name.to_string(),
            duration,
            ..Default::default()
        });
        ScheduleBlock {
            program,
            start_time: start.map(str::to_string),
            order: None,
        }
    }

    fn names(blocks: &[ScheduleBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.program.name.as_str()).collect()
    }

    #[test]
    fn test_single_block_time_range() {
        let blocks = vec![block("예배", Some("09:00"), 30)];
        let range = time_range(&blocks).unwrap();
        assert_eq!(
            range,
            TimeRange {
                start_minutes: 540,
                end_minutes: 570
            }
        );
        assert_eq!(format_minutes(range.end_minutes), "09:30");
    }

    #[test]
    fn test_time_range_spans_min_start_to_max_end() {
        let blocks = vec![
            block("점심", Some("12:00"), 60),
            block("예배", Some("09:00"), 90),
            block("긴 게임", Some("10:00"), 240),
            block("미정", None, 30),
        ];
        let range = time_range(&blocks).unwrap();
        assert_eq!(range.start_minutes, 540);
        assert_eq!(range.end_minutes, 840);
        assert_eq!(range.duration(), 300);
    }

    #[test]
    fn test_time_range_none_without_start_times() {
        assert_eq!(time_range(&[]), None);
        assert_eq!(time_range(&[block("미정", None, 30)]), None);
    }

    #[test]
    fn test_time_range_skips_malformed_start_times() {
        let blocks = vec![block("a", Some("nine"), 30), block("b", Some("10:00"), 30)];
        assert_eq!(
            time_range(&blocks),
            Some(TimeRange {
                start_minutes: 600,
                end_minutes: 630
            })
        );
    }

    #[test]
    fn test_format_minutes_pads_and_does_not_wrap() {
        assert_eq!(format_minutes(0), "00:00");
        assert_eq!(format_minutes(65), "01:05");
        assert_eq!(format_minutes(1439), "23:59");
        assert_eq!(format_minutes(1500), "25:00");
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("09:00"), Some(540));
        assert_eq!(parse_minutes("23:30"), Some(1410));
        assert_eq!(parse_minutes("25:00"), Some(1500));
        assert_eq!(parse_minutes("0930"), None);
        assert_eq!(parse_minutes("ab:cd"), None);
        assert_eq!(parse_minutes("09:75"), None);
        assert_eq!(parse_minutes("99999999:00"), None);
    }

    #[test]
    fn test_huge_duration_is_skipped_not_overflowed() {
        let blocks = vec![
            block("끝없는 게임", Some("09:00"), u32::MAX),
            block("점심", Some("12:00"), 60),
        ];
        assert_eq!(end_time(&blocks[0]), None);
        assert_eq!(
            time_range(&blocks),
            Some(TimeRange {
                start_minutes: 720,
                end_minutes: 780
            })
        );
        let scheduled: Vec<_> = timeline(&blocks).into_iter().map(|e| e.block).collect();
        assert_eq!(names(&scheduled), vec!["점심"]);
    }

    #[test]
    fn test_end_time_past_midnight() {
        assert_eq!(end_time(&block("야간 찬양", Some("23:30"), 60)).as_deref(), Some("24:30"));
        assert_eq!(end_time(&block("미정", None, 60)), None);
    }

    #[test]
    fn test_sorted_by_start_filters_and_orders() {
        let blocks = vec![
            block("점심", Some("12:00"), 60),
            block("미정", None, 30),
            block("아침", Some("08:00"), 30),
            block("찬양", Some("09:30"), 30),
        ];
        assert_eq!(names(&sorted_by_start(&blocks)), vec!["아침", "찬양", "점심"]);
    }

    #[test]
    fn test_reorder_on_time_change_moves_block() {
        let blocks = vec![
            block("아침", Some("08:00"), 30),
            block("미정", None, 30),
            block("점심", Some("12:00"), 60),
        ];
        let id = blocks[1].id().to_string();

        let reordered = reorder_on_time_change(blocks, &id, "10:00");
        assert_eq!(names(&reordered), vec!["아침", "미정", "점심"]);
        assert_eq!(reordered[1].start_time.as_deref(), Some("10:00"));

        let id = reordered[0].id().to_string();
        let reordered = reorder_on_time_change(reordered, &id, "13:00");
        assert_eq!(names(&reordered), vec!["미정", "점심", "아침"]);
    }

    #[test]
    fn test_reorder_with_empty_time_unschedules_block() {
        let blocks = vec![block("아침", Some("08:00"), 30), block("점심", Some("12:00"), 60)];
        let id = blocks[0].id().to_string();

        let reordered = reorder_on_time_change(blocks, &id, "");
        assert_eq!(names(&reordered), vec!["점심", "아침"]);
        assert_eq!(reordered[1].start_time, None);
    }

    #[test]
    fn test_reorder_unknown_id_only_sorts() {
        let blocks = vec![block("b", None, 10), block("a", Some("08:00"), 10)];
        let reordered = reorder_on_time_change(blocks, "missing", "09:00");
        assert_eq!(names(&reordered), vec!["a", "b"]);
    }

    #[test]
    fn test_timeline_labels() {
        let blocks = vec![block("찬양", Some("09:30"), 45), block("예배", Some("08:00"), 90)];
        let entries = timeline(&blocks);
        let labels: Vec<_> = entries
            .iter()
            .map(|e| (e.start_label(), e.end_label()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("08:00".to_string(), "09:30".to_string()),
                ("09:30".to_string(), "10:15".to_string())
            ]
        );
    }

    fn arb_start() -> impl Strategy<Value = Option<String>> {
        prop::option::of((0u32..24, 0u32..60).prop_map(|(h, m)| format!("{:02}:{:02}", h, m)))
    }

    proptest! {
        #[test]
        fn prop_sorted_by_start_is_idempotent(starts in prop::collection::vec(arb_start(), 0..20)) {
            let blocks: Vec<_> = starts
                .iter()
                .enumerate()
                .map(|(i, s)| block(&i.to_string(), s.as_deref(), 15))
                .collect();

            let once = sorted_by_start(&blocks);
            let twice = sorted_by_start(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.iter().all(|b| b.start_time.is_some()));
            prop_assert!(once.windows(2).all(|w| w[0].start_time <= w[1].start_time));
        }

        #[test]
        fn prop_reorder_puts_unscheduled_last(
            starts in prop::collection::vec(arb_start(), 1..20),
            pick in any::<prop::sample::Index>(),
            new_start in arb_start(),
        ) {
            let blocks: Vec<_> = starts
                .iter()
                .enumerate()
                .map(|(i, s)| block(&i.to_string(), s.as_deref(), 15))
                .collect();
            let id = blocks[pick.index(blocks.len())].id().to_string();

            let reordered = reorder_on_time_change(blocks.clone(), &id, new_start.as_deref().unwrap_or(""));
            prop_assert_eq!(reordered.len(), blocks.len());

            let first_unscheduled = reordered.iter().position(|b| b.start_time.is_none());
            if let Some(pos) = first_unscheduled {
                prop_assert!(reordered[pos..].iter().all(|b| b.start_time.is_none()));
            }
            let timed: Vec<_> = reordered.iter().filter(|b| b.start_time.is_some()).cloned().collect();
            prop_assert_eq!(sorted_by_start(&timed), timed);
        }
    }
}
