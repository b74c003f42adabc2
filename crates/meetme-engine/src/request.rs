//! Request-scoped configuration: which calendars, which dates, which daily window.
//!
//! A [`RequestConfig`] is the loose, user-facing form (a JSON file or CLI flags, all
//! fields optional, human-friendly text). [`RequestConfig::resolve`] validates it
//! into an [`AvailabilityRequest`], filling gaps with the defaults: tomorrow through
//! a week from today, 9am to 5pm, UTC.

use std::path::Path;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{MeetError, Result};
use crate::interval::{DateRange, TimeWindow};
use crate::normalize::MalformedPolicy;

pub const DEFAULT_START_TIME: &str = "9am";
pub const DEFAULT_END_TIME: &str = "5pm";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Parse a time of day written as `9am`, `1:30pm`, `1:30 pm` or `13:30`.
///
/// # Errors
/// Returns [`MeetError::InvalidTime`] for anything else.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime> {
    let invalid = || {
        MeetError::InvalidTime(format!(
            "'{}' didn't match accepted formats 13:30 or 1:30pm",
            text
        ))
    };

    let lower = text.trim().to_ascii_lowercase();
    let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim_end(), Some(true))
    } else {
        (lower.as_str(), None)
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) if m.len() == 2 => (h, m),
        // A bare hour is only accepted with am/pm ("9am").
        None if meridiem.is_some() => (clock, "00"),
        _ => return Err(invalid()),
    };
    if hour.is_empty() || hour.len() > 2 {
        return Err(invalid());
    }
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;

    let hour = match meridiem {
        Some(_) if !(1..=12).contains(&hour) => return Err(invalid()),
        Some(pm) => hour % 12 + if pm { 12 } else { 0 },
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Parse a date written as `MM/DD/YYYY` (or ISO `YYYY-MM-DD`).
///
/// # Errors
/// Returns [`MeetError::InvalidDate`] if neither form matches.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| {
            MeetError::InvalidDate(format!(
                "'{}' didn't fit expected format 12/31/2001",
                text
            ))
        })
}

/// Parse a date range written as `MM/DD/YYYY - MM/DD/YYYY`, or a single date.
///
/// # Errors
/// [`MeetError::InvalidDate`] for text of another shape or an unreadable date,
/// [`MeetError::InvalidRange`] when the first date is after the last.
pub fn parse_date_range(text: &str) -> Result<DateRange> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.as_slice() {
        [first, "-", last] => DateRange::new(parse_date(first)?, parse_date(last)?),
        [single] => Ok(DateRange::single(parse_date(single)?)),
        _ => Err(MeetError::InvalidDate(format!(
            "'{}' is not a range like 03/16/2026 - 03/20/2026",
            text
        ))),
    }
}

/// Parse an IANA zone name such as `America/Los_Angeles`.
///
/// # Errors
/// Returns [`MeetError::InvalidTimezone`] for unknown names.
pub fn parse_timezone(text: &str) -> Result<Tz> {
    text.trim()
        .parse()
        .map_err(|_| MeetError::InvalidTimezone(text.to_string()))
}

/// Everything one free-time computation needs, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRequest {
    /// Calendar ids to read. Empty means the account's default calendars.
    pub calendars: Vec<String>,
    pub dates: DateRange,
    pub window: TimeWindow,
    /// The single local zone every timestamp is converted into.
    pub zone: Tz,
    pub policy: MalformedPolicy,
}

impl AvailabilityRequest {
    pub fn new(dates: DateRange, window: TimeWindow) -> Self {
        Self {
            calendars: Vec::new(),
            dates,
            window,
            zone: Tz::UTC,
            policy: MalformedPolicy::default(),
        }
    }

    pub fn with_calendars<I, S>(mut self, calendars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calendars = calendars.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// User-facing request settings. Every field is optional; see
/// [`RequestConfig::resolve`] for the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestConfig {
    pub calendars: Vec<String>,
    /// `MM/DD/YYYY - MM/DD/YYYY`
    pub daterange: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub timezone: Option<String>,
    pub on_malformed: Option<MalformedPolicy>,
}

impl RequestConfig {
    /// # Errors
    /// Returns [`MeetError::Config`] if the text is not a valid request config.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| MeetError::Config(e.to_string()))
    }

    /// # Errors
    /// Returns [`MeetError::Config`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MeetError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Layer `overrides` on top of `self`: any field set in `overrides` wins.
    pub fn merged_with(self, overrides: RequestConfig) -> RequestConfig {
        RequestConfig {
            calendars: if overrides.calendars.is_empty() {
                self.calendars
            } else {
                overrides.calendars
            },
            daterange: overrides.daterange.or(self.daterange),
            start_time: overrides.start_time.or(self.start_time),
            end_time: overrides.end_time.or(self.end_time),
            timezone: overrides.timezone.or(self.timezone),
            on_malformed: overrides.on_malformed.or(self.on_malformed),
        }
    }

    /// Validate into an [`AvailabilityRequest`].
    ///
    /// Without a `daterange`, dates run from tomorrow to seven days from today, where
    /// "today" is `now` seen from the request's zone.
    ///
    /// # Errors
    /// Any parse error of the individual fields, or [`MeetError::InvalidRange`] when
    /// the window or date range is empty.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<AvailabilityRequest> {
        let zone = parse_timezone(self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE))?;

        let start = parse_time_of_day(self.start_time.as_deref().unwrap_or(DEFAULT_START_TIME))?;
        let end = parse_time_of_day(self.end_time.as_deref().unwrap_or(DEFAULT_END_TIME))?;
        let window = TimeWindow::new(start, end)?;

        let dates = match self.daterange.as_deref() {
            Some(text) => parse_date_range(text)?,
            None => default_date_range(now.with_timezone(&zone).date_naive())?,
        };

        Ok(AvailabilityRequest::new(dates, window)
            .with_calendars(self.calendars.iter().cloned())
            .with_zone(zone)
            .with_policy(self.on_malformed.unwrap_or_default()))
    }
}

/// Tomorrow through seven days from `today`.
pub fn default_date_range(today: NaiveDate) -> Result<DateRange> {
    let overflow = || MeetError::InvalidDate(format!("no default range after {}", today));
    let first = today.checked_add_days(Days::new(1)).ok_or_else(overflow)?;
    let last = today.checked_add_days(Days::new(7)).ok_or_else(overflow)?;
    DateRange::new(first, last)
}
