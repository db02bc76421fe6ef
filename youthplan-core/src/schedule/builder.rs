//! Editing operations on a schedule: placing, removing, packing.

use serde::Serialize;

use crate::error::{PlannerError, PlannerResult};
use crate::program::Program;
use crate::schedule::ScheduleBlock;
use crate::schedule::time::{format_minutes, parse_minutes, timeline};

/// Two scheduled blocks whose time intervals intersect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub first_id: String,
    pub second_id: String,
    /// Length of the shared interval
    pub minutes: u32,
}

/// Append a program as an unscheduled block at the end of the list.
pub fn place_program(mut blocks: Vec<ScheduleBlock>, program: Program) -> Vec<ScheduleBlock> {
    let order = blocks.len() as u32;
    blocks.push(ScheduleBlock {
        program,
        start_time: None,
        order: Some(order),
    });
    blocks
}

/// Remove a block from the schedule. The underlying program is not touched.
pub fn remove_block(mut blocks: Vec<ScheduleBlock>, block_id: &str) -> Vec<ScheduleBlock> {
    blocks.retain(|b| b.id() != block_id);
    blocks
}

/// Set each block's `order` to its position in the list.
pub fn renumber(blocks: &mut [ScheduleBlock]) {
    for (index, block) in blocks.iter_mut().enumerate() {
        block.order = Some(index as u32);
    }
}

/// Give every block a start time, back to back in list order, beginning at
/// `start` ("HH:MM").
pub fn pack_sequentially(
    mut blocks: Vec<ScheduleBlock>,
    start: &str,
) -> PlannerResult<Vec<ScheduleBlock>> {
    let mut cursor = parse_minutes(start).ok_or_else(|| {
        PlannerError::InvalidInput(format!("Invalid start time '{}'. Expected HH:MM", start))
    })?;

    for block in blocks.iter_mut() {
        block.start_time = Some(format_minutes(cursor));
        cursor = cursor.checked_add(block.duration()).ok_or_else(|| {
            PlannerError::InvalidInput(format!(
                "'{}' runs past the end of any schedule ({} min)",
                block.program.name,
                block.duration()
            ))
        })?;
    }
    renumber(&mut blocks);

    Ok(blocks)
}

/// Every pair of scheduled blocks that run at the same time.
pub fn find_overlaps(blocks: &[ScheduleBlock]) -> Vec<Overlap> {
    let mut entries = timeline(blocks);
    entries.sort_by_key(|e| e.start_minutes);
    let mut overlaps = Vec::new();

    for (i, first) in entries.iter().enumerate() {
        for second in &entries[i + 1..] {
            // Entries are sorted by start, so nothing later can overlap `first`
            if second.start_minutes >= first.end_minutes {
                break;
            }
            let shared = first.end_minutes.min(second.end_minutes) - second.start_minutes;
            if shared > 0 {
                overlaps.push(Overlap {
                    first_id: first.block.id().to_string(),
                    second_id: second.block.id().to_string(),
                    minutes: shared,
                });
            }
        }
    }

    overlaps
}
