//! iCalendar export of an event's running order (RFC 5545).

mod generate;

pub use generate::generate_schedule_ics;
