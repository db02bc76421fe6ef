//! Core library for youthplan, a planner for church youth-group events.
//!
//! This crate provides everything except the terminal front end:
//! - `game` extracts structured games from Korean markdown recommendations
//! - `schedule` derives end times, ordering and spans for a running order
//! - `completion` and `assist` build prompts and read completion answers
//! - `store` keeps one JSON document per event under the data directory
//! - `ics` exports a schedule as an iCalendar file

pub mod assist;
pub mod completion;
pub mod config;
pub mod error;
pub mod event;
pub mod game;
pub mod ics;
pub mod program;
pub mod schedule;
pub mod store;
pub mod utils;

pub use error::{PlannerError, PlannerResult};
