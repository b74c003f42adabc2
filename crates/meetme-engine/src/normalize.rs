//! Turn raw provider event records into an ordered busy set.
//!
//! Timed records are parsed, converted into the request's local zone, split at
//! midnight when they span several dates, and kept only where they reach into the
//! daily window. All-day records carry no time-of-day and are dropped.

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{MeetError, Result};
use crate::interval::{end_of_day, BusyEvent, TimeWindow};

/// Whether a raw record has explicit timestamps or only a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Timed,
    AllDay,
}

/// A provider event mapped onto the shape the normalizer understands.
///
/// Timed records use `start`/`end` (RFC 3339, or offset-less local wall time);
/// all-day records use `date`. Values are kept as text so that parsing failures
/// surface here rather than at the provider boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl RawEvent {
    pub fn timed(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Timed,
            date: None,
            start: Some(start.into()),
            end: Some(end.into()),
            summary: None,
        }
    }

    pub fn all_day(date: impl Into<String>) -> Self {
        Self {
            kind: EventKind::AllDay,
            date: Some(date.into()),
            start: None,
            end: None,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    fn label(&self) -> &str {
        self.summary.as_deref().unwrap_or("(untitled)")
    }
}

/// What to do with a record that cannot be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log a warning, drop the record and keep going.
    #[default]
    Skip,
    /// Fail the whole normalization on the first bad record.
    Abort,
}

/// Parse a provider timestamp into wall-clock time in `zone`.
///
/// RFC 3339 values (with an offset or `Z`) are converted into `zone`. Offset-less
/// values (`2026-03-16T09:00:00` or `2026-03-16T09:00`) are already local.
///
/// # Errors
/// Returns [`MeetError::MalformedEvent`] if the text matches none of these forms.
pub fn parse_local_timestamp(text: &str, zone: Tz) -> Result<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return Err(MeetError::MalformedEvent("empty timestamp".to_string()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&zone).naive_local());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .map_err(|_| MeetError::MalformedEvent(format!("unparseable timestamp '{}'", text)))
}

/// Split `[start, end]` into one busy event per calendar date it touches.
///
/// Every day but the last ends at [`end_of_day`]; every day but the first starts at
/// midnight. An empty segment on a following day (an event ending exactly at
/// midnight) is dropped.
///
/// # Errors
/// Returns [`MeetError::InvalidRange`] if `end` is before `start`.
pub fn split_by_date(start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<BusyEvent>> {
    if end < start {
        return Err(MeetError::InvalidRange(format!(
            "event ends at {} before it starts at {}",
            end, start
        )));
    }

    let first = start.date();
    let last = end.date();
    let mut segments = Vec::new();
    for date in first.iter_days().take_while(|d| *d <= last) {
        let seg_start = if date == first { start.time() } else { NaiveTime::MIN };
        let seg_end = if date == last { end.time() } else { end_of_day() };
        if date != first && seg_end <= seg_start {
            continue;
        }
        segments.push(BusyEvent::new(date, seg_start, seg_end)?);
    }
    Ok(segments)
}

/// Normalize a single raw record into the busy events that reach into `window`.
///
/// All-day records yield nothing. Timed records yield one event per covered date,
/// filtered by `event.end > window.start && event.start < window.end`.
///
/// # Errors
/// [`MeetError::MalformedEvent`] for a missing or unparseable timestamp,
/// [`MeetError::InvalidRange`] when the record ends before it starts.
pub fn normalize_event(raw: &RawEvent, window: &TimeWindow, zone: Tz) -> Result<Vec<BusyEvent>> {
    if raw.kind == EventKind::AllDay {
        return Ok(Vec::new());
    }

    let start = raw
        .start
        .as_deref()
        .ok_or_else(|| MeetError::MalformedEvent("timed event has no start".to_string()))?;
    let end = raw
        .end
        .as_deref()
        .ok_or_else(|| MeetError::MalformedEvent("timed event has no end".to_string()))?;

    let start = parse_local_timestamp(start, zone)?;
    let end = parse_local_timestamp(end, zone)?;

    Ok(split_by_date(start, end)?
        .into_iter()
        .filter(|ev| window.overlaps(ev.start(), ev.end()))
        .collect())
}

/// Normalize raw records into busy events sorted by (date, start, end).
///
/// Overlapping events are kept as they are; merging belongs to the solver.
///
/// # Errors
/// Under [`MalformedPolicy::Abort`] the first failing record's error is returned.
/// Under [`MalformedPolicy::Skip`] failures are logged and never returned.
pub fn normalize(
    records: &[RawEvent],
    window: &TimeWindow,
    zone: Tz,
    policy: MalformedPolicy,
) -> Result<Vec<BusyEvent>> {
    let mut busy = Vec::with_capacity(records.len());
    let mut all_day = 0usize;
    let mut skipped = 0usize;

    for raw in records {
        if raw.kind == EventKind::AllDay {
            all_day += 1;
            continue;
        }
        match normalize_event(raw, window, zone) {
            Ok(events) => busy.extend(events),
            Err(err) => match policy {
                MalformedPolicy::Abort => return Err(err),
                MalformedPolicy::Skip => {
                    warn!("Skipping event '{}': {}", raw.label(), err);
                    skipped += 1;
                }
            },
        }
    }

    busy.sort_by_key(BusyEvent::sort_key);

    debug!(
        "Normalized {} raw events into {} busy events ({} all-day, {} skipped)",
        records.len(),
        busy.len(),
        all_day,
        skipped
    );

    Ok(busy)
}
