//! Program blocks placed on an event's running order.

mod builder;
pub mod time;

pub use builder::{Overlap, find_overlaps, pack_sequentially, place_program, remove_block, renumber};
pub use time::{
    TimeRange, TimelineEntry, end_time, format_minutes, parse_minutes, reorder_on_time_change,
    sorted_by_start, time_range, timeline,
};

use serde::{Deserialize, Serialize};

use crate::program::Program;

/// A program placed on the schedule surface.
///
/// The end time is never stored; it is always `start_time + duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    #[serde(flatten)]
    pub program: Program,
    /// "HH:MM", `None` while unscheduled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl ScheduleBlock {
    pub fn new(program: Program) -> Self {
        ScheduleBlock {
            program,
            start_time: None,
            order: None,
        }
    }

    pub fn at(program: Program, start_time: impl Into<String>) -> Self {
        ScheduleBlock {
            program,
            start_time: Some(start_time.into()),
            order: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.program.id
    }

    pub fn duration(&self) -> u32 {
        self.program.duration
    }

    pub fn is_scheduled(&self) -> bool {
        self.start_time.is_some()
    }
}

/// Persisted form of a schedule block: a reference to a program plus its
/// placement. Joined back into `ScheduleBlock`s when loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub program_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub order: u32,
}
