//! Wall-clock helpers.

use chrono::{DateTime, Local, TimeZone};

/// Render a point in time as the short `HH:MM` label shown next to messages.
pub fn format_clock_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M").to_string()
}

/// Current local wall-clock time as an `HH:MM` label.
pub fn current_clock_label() -> String {
    format_clock_label(&Local::now())
}
