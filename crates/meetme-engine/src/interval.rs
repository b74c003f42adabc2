//! Value types for busy and free time.
//!
//! Every time-of-day is held at minute resolution: constructors drop seconds and
//! sub-second parts so that two times compare equal whenever their hour and minute do.
//! Dates are naive calendar dates already expressed in the request's local zone.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::error::{MeetError, Result};

/// Drop seconds and sub-second precision from a time-of-day.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// The last representable minute of a day (23:59).
///
/// Busy segments that run past midnight end here on every day but the last.
pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default()
}

fn hhmm<S: Serializer>(time: &NaiveTime, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format("%H:%M"))
}

/// The daily time-of-day range inside which free time is sought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    #[serde(serialize_with = "hhmm")]
    start: NaiveTime,
    #[serde(serialize_with = "hhmm")]
    end: NaiveTime,
}

impl TimeWindow {
    /// Build a window. Fails with [`MeetError::InvalidRange`] unless `start < end`
    /// once both are truncated to the minute. Windows never wrap past midnight.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        let start = truncate_to_minute(start);
        let end = truncate_to_minute(end);
        if start >= end {
            return Err(MeetError::InvalidRange(format!(
                "window start {} must be before end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// True when `[start, end]` reaches into the window: `end > window.start` and
    /// `start < window.end`.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        end > self.start && start < self.end
    }

    /// Clip `[start, end]` to the window. Returns `None` when nothing non-empty is left.
    pub fn clip(&self, start: NaiveTime, end: NaiveTime) -> Option<(NaiveTime, NaiveTime)> {
        let start = start.max(self.start);
        let end = end.min(self.end);
        (start < end).then_some((start, end))
    }
}

/// A span of a single date during which the user is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusyEvent {
    date: NaiveDate,
    #[serde(serialize_with = "hhmm")]
    start: NaiveTime,
    #[serde(serialize_with = "hhmm")]
    end: NaiveTime,
}

impl BusyEvent {
    /// Build a busy event. Zero-length events are allowed; `start > end` fails with
    /// [`MeetError::InvalidRange`].
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<Self> {
        let start = truncate_to_minute(start);
        let end = truncate_to_minute(end);
        if start > end {
            return Err(MeetError::InvalidRange(format!(
                "busy event on {} starts at {} after it ends at {}",
                date,
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { date, start, end })
    }

    /// Build from times already truncated and ordered by the caller.
    pub(crate) fn from_checked(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        debug_assert!(start <= end);
        Self { date, start, end }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Sort key used everywhere busy events are ordered.
    pub fn sort_key(&self) -> (NaiveDate, NaiveTime, NaiveTime) {
        (self.date, self.start, self.end)
    }
}

/// A span inside the daily window not covered by any busy event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeInterval {
    date: NaiveDate,
    #[serde(serialize_with = "hhmm")]
    start: NaiveTime,
    #[serde(serialize_with = "hhmm")]
    end: NaiveTime,
    duration_minutes: i64,
}

impl FreeInterval {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<Self> {
        let start = truncate_to_minute(start);
        let end = truncate_to_minute(end);
        if start >= end {
            return Err(MeetError::InvalidRange(format!(
                "free interval on {} must start before it ends ({} - {})",
                date,
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self {
            date,
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        })
    }

    /// Build from times already truncated with `start < end`.
    pub(crate) fn from_checked(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        debug_assert!(start < end);
        Self {
            date,
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    first: NaiveDate,
    last: NaiveDate,
}

impl DateRange {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        if first > last {
            return Err(MeetError::InvalidRange(format!(
                "date range starts on {} after it ends on {}",
                first, last
            )));
        }
        Ok(Self { first, last })
    }

    /// A range covering a single date.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            first: date,
            last: date,
        }
    }

    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn last(&self) -> NaiveDate {
        self.last
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Every date in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last;
        self.first.iter_days().take_while(move |d| *d <= last)
    }

    pub fn num_days(&self) -> i64 {
        (self.last - self.first).num_days() + 1
    }
}
