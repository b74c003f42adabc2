//! Render free intervals and calendar lists for people.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveTime};

use crate::gateway::CalendarEntry;
use crate::interval::FreeInterval;

/// Opening line of the availability message.
pub const MESSAGE_HEADER: &str = "These are the times I am free:\n";

/// `Mon 03/16/2026`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a %m/%d/%Y").to_string()
}

/// `09:30`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// One line per free interval: `Mon 03/16/2026  09:00 - 10:00  (60 min)`.
pub fn render_table(free: &[FreeInterval]) -> String {
    if free.is_empty() {
        return "No free time in the requested window.\n".to_string();
    }
    let mut out = String::new();
    for slot in free {
        let _ = writeln!(
            out,
            "{}  {} - {}  ({} min)",
            format_date(slot.date()),
            format_time(slot.start()),
            format_time(slot.end()),
            slot.duration_minutes()
        );
    }
    out
}

/// The plain-text body a user sends to share their availability.
pub fn render_message(free: &[FreeInterval]) -> String {
    let mut out = String::from(MESSAGE_HEADER);
    for slot in free {
        let _ = write!(
            out,
            "{}:\nFrom {} to {}\n",
            slot.date(),
            format_time(slot.start()),
            format_time(slot.end())
        );
    }
    out
}

/// Pretty JSON array of `{date, start, end, duration_minutes}` objects.
pub fn render_json(free: &[FreeInterval]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(free)
}

/// One line per calendar: `id<TAB>summary`, flagged primary and/or selected.
pub fn render_calendar_list(calendars: &[CalendarEntry]) -> String {
    let mut out = String::new();
    for cal in calendars {
        let mut flags = Vec::new();
        if cal.primary {
            flags.push("primary");
        }
        if cal.selected {
            flags.push("selected");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        let _ = writeln!(out, "{}\t{}{}", cal.id, cal.summary, flags);
    }
    out
}
