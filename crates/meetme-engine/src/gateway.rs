//! Calendar provider access.
//!
//! The engine only needs two things from a provider: the user's calendars and the
//! events of one calendar between two dates. [`CalendarGateway`] is that seam.
//! [`ExportGateway`] implements it over a JSON snapshot shaped like the Google
//! Calendar v3 `calendarList` and `events` resources, so free time can be computed
//! without network access or credentials.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MeetError, Result};
use crate::normalize::{EventKind, RawEvent};

/// One entry of the user's calendar list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    #[serde(default = "default_kind")]
    pub kind: String,
    pub id: String,
    pub summary: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub primary: bool,
}

fn default_kind() -> String {
    "calendar#calendarListEntry".to_string()
}

fn default_description() -> String {
    "(no description)".to_string()
}

/// Source of calendars and their events.
pub trait CalendarGateway {
    /// The user's calendars, in provider order.
    fn list_calendars(&self) -> Result<Vec<CalendarEntry>>;

    /// Events of one calendar that touch the dates `[time_min, time_max]`.
    fn list_events(
        &self,
        calendar_id: &str,
        time_min: NaiveDate,
        time_max: NaiveDate,
    ) -> Result<Vec<RawEvent>>;

    /// Events of several calendars, concatenated in the order the ids are given.
    fn list_events_across(
        &self,
        calendar_ids: &[String],
        time_min: NaiveDate,
        time_max: NaiveDate,
    ) -> Result<Vec<RawEvent>> {
        let mut events = Vec::new();
        for id in calendar_ids {
            events.extend(self.list_events(id, time_min, time_max)?);
        }
        Ok(events)
    }
}

/// Order calendars primary first, then selected, then by summary.
pub fn sort_calendars(calendars: &mut [CalendarEntry]) {
    calendars.sort_by(|a, b| {
        (!a.primary, !a.selected, &a.summary).cmp(&(!b.primary, !b.selected, &b.summary))
    });
}

/// Ids of the calendars to use when the user has not picked any: every selected
/// calendar, or the primary calendar if none is selected.
pub fn default_calendar_ids(calendars: &[CalendarEntry]) -> Vec<String> {
    let selected: Vec<String> = calendars
        .iter()
        .filter(|c| c.selected)
        .map(|c| c.id.clone())
        .collect();
    if !selected.is_empty() {
        return selected;
    }
    calendars
        .iter()
        .filter(|c| c.primary)
        .map(|c| c.id.clone())
        .collect()
}

/// Start or end of a provider event: `dateTime` for timed events, `date` for
/// all-day events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ProviderEventTime {
    /// The calendar date prefix of whichever field is set.
    fn calendar_date(&self) -> Option<NaiveDate> {
        let text = self.date_time.as_deref().or(self.date.as_deref())?;
        NaiveDate::parse_from_str(text.get(..10)?, "%Y-%m-%d").ok()
    }
}

/// A provider-native event as found in an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: ProviderEventTime,
    #[serde(default)]
    pub end: ProviderEventTime,
}

impl ProviderEvent {
    /// Whether the event touches `[time_min, time_max]`, judged on the dates written
    /// in the event with one day of slack on each side, since the local zone may move
    /// an event across midnight. Events whose dates cannot be read are kept so the
    /// normalizer can report them.
    fn touches(&self, time_min: NaiveDate, time_max: NaiveDate) -> bool {
        let time_min = time_min.pred_opt().unwrap_or(time_min);
        let time_max = time_max.succ_opt().unwrap_or(time_max);
        match (self.start.calendar_date(), self.end.calendar_date()) {
            (Some(start), Some(end)) => start <= time_max && end >= time_min,
            (Some(start), None) => start >= time_min && start <= time_max,
            _ => true,
        }
    }
}

impl From<&ProviderEvent> for RawEvent {
    fn from(event: &ProviderEvent) -> Self {
        let raw = match (&event.start.date_time, &event.start.date) {
            (None, Some(date)) => RawEvent::all_day(date.clone()),
            _ => RawEvent {
                kind: EventKind::Timed,
                date: None,
                start: event.start.date_time.clone(),
                end: event.end.date_time.clone(),
                summary: None,
            },
        };
        RawEvent {
            summary: event.summary.clone(),
            ..raw
        }
    }
}

/// On-disk snapshot of a provider account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarExport {
    #[serde(default)]
    pub calendars: Vec<CalendarEntry>,
    /// Events keyed by calendar id.
    #[serde(default)]
    pub events: BTreeMap<String, Vec<ProviderEvent>>,
}

/// [`CalendarGateway`] backed by a [`CalendarExport`].
#[derive(Debug, Clone, Default)]
pub struct ExportGateway {
    export: CalendarExport,
}

impl ExportGateway {
    pub fn new(export: CalendarExport) -> Self {
        Self { export }
    }

    /// Parse an export from JSON text.
    ///
    /// # Errors
    /// Returns [`MeetError::Gateway`] if the text is not a valid export.
    pub fn from_json(text: &str) -> Result<Self> {
        let export: CalendarExport = serde_json::from_str(text)
            .map_err(|e| MeetError::Gateway(format!("invalid calendar export: {}", e)))?;
        debug!(
            "Loaded export with {} calendars and {} event lists",
            export.calendars.len(),
            export.events.len()
        );
        Ok(Self::new(export))
    }

    /// Read and parse an export file.
    ///
    /// # Errors
    /// Returns [`MeetError::Gateway`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MeetError::Gateway(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    fn knows(&self, calendar_id: &str) -> bool {
        self.export.events.contains_key(calendar_id)
            || self.export.calendars.iter().any(|c| c.id == calendar_id)
    }
}

impl CalendarGateway for ExportGateway {
    fn list_calendars(&self) -> Result<Vec<CalendarEntry>> {
        Ok(self.export.calendars.clone())
    }

    fn list_events(
        &self,
        calendar_id: &str,
        time_min: NaiveDate,
        time_max: NaiveDate,
    ) -> Result<Vec<RawEvent>> {
        if !self.knows(calendar_id) {
            return Err(MeetError::Gateway(format!(
                "unknown calendar '{}'",
                calendar_id
            )));
        }

        let events: Vec<RawEvent> = self
            .export
            .events
            .get(calendar_id)
            .map(|list| {
                list.iter()
                    .filter(|e| e.touches(time_min, time_max))
                    .map(RawEvent::from)
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            "Calendar '{}' has {} events between {} and {}",
            calendar_id,
            events.len(),
            time_min,
            time_max
        );
        Ok(events)
    }
}
