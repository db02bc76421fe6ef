use chrono::{Duration, NaiveDate, NaiveDateTime};
use icalendar::{Calendar, Component, EventLike};

use crate::error::{PlannerError, PlannerResult};
use crate::event::Event;
use crate::schedule::{ScheduleBlock, TimelineEntry, timeline};

/// Render every timed block as a VEVENT on the event date. Unscheduled blocks
/// are left out; blocks running past midnight continue into the next day.
pub fn generate_schedule_ics(event: &Event, blocks: &[ScheduleBlock]) -> PlannerResult<String> {
    let mut cal = Calendar::new();
    cal.name(&event.name);

    let dtstamp = event.updated_at.format("%Y%m%dT%H%M%SZ").to_string();

    for entry in timeline(blocks) {
        let program = &entry.block.program;

        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&format!("{}@youthplan", program.id));
        ics_event.summary(&program.name);
        ics_event.add_property("DTSTAMP", &dtstamp);

        // Floating local times: the event happens wherever it happens
        let (start, end) = entry_datetimes(event.date, &entry)?;
        ics_event.add_property("DTSTART", start.format("%Y%m%dT%H%M%S").to_string());
        ics_event.add_property("DTEND", end.format("%Y%m%dT%H%M%S").to_string());

        let location = if program.location.is_empty() {
            &event.location
        } else {
            &program.location
        };
        if !location.is_empty() {
            ics_event.location(location);
        }

        if let Some(ref desc) = program.description {
            ics_event.description(desc);
        }

        ics_event.add_property("CATEGORIES", program.category.label());

        cal.push(ics_event.done());
    }

    let cal = cal.done();
    Ok(strip_ics_bloat(&cal.to_string()))
}

fn entry_datetimes(
    date: NaiveDate,
    entry: &TimelineEntry,
) -> PlannerResult<(NaiveDateTime, NaiveDateTime)> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| PlannerError::IcsGenerate(format!("Invalid event date {}", date)))?;

    let at = |minutes: u32| {
        midnight
            .checked_add_signed(Duration::minutes(i64::from(minutes)))
            .ok_or_else(|| {
                PlannerError::IcsGenerate(format!(
                    "Block '{}' is out of the calendar range",
                    entry.block.program.name
                ))
            })
    };

    Ok((at(entry.start_minutes)?, at(entry.end_minutes)?))
}

/// Replace the icalendar crate's PRODID and drop the default CALSCALE.
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:YOUTHPLAN\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
