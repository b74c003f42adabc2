//! One free-time request end to end: gateway → normalizer → solver.

use log::{debug, warn};
use serde::Serialize;

use crate::error::Result;
use crate::freetime::compute_free_intervals;
use crate::gateway::{default_calendar_ids, CalendarGateway};
use crate::interval::{BusyEvent, FreeInterval};
use crate::normalize::normalize;
use crate::request::AvailabilityRequest;

/// Result of a free-time request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Availability {
    /// Calendar ids that were read.
    pub calendars: Vec<String>,
    /// Busy events inside the requested dates that reach into the window, sorted by
    /// (date, start). Not merged.
    pub busy: Vec<BusyEvent>,
    /// Free intervals sorted by (date, start).
    pub free: Vec<FreeInterval>,
}

/// Compute free time for `request` across the union of its calendars.
///
/// With no calendars in the request, the gateway's selected calendars are used
/// (or its primary calendar). Busy events that land outside the requested dates
/// after conversion into the local zone are ignored.
///
/// # Errors
/// Gateway failures, and normalization failures when the request policy is
/// [`MalformedPolicy::Abort`](crate::normalize::MalformedPolicy::Abort).
pub fn compute_availability<G>(gateway: &G, request: &AvailabilityRequest) -> Result<Availability>
where
    G: CalendarGateway + ?Sized,
{
    let calendars = if request.calendars.is_empty() {
        default_calendar_ids(&gateway.list_calendars()?)
    } else {
        request.calendars.clone()
    };
    if calendars.is_empty() {
        warn!("No calendars to read; every requested date is free");
    }

    let dates = request.dates;
    let raw = gateway.list_events_across(&calendars, dates.first(), dates.last())?;
    debug!(
        "Fetched {} raw events from {} calendars",
        raw.len(),
        calendars.len()
    );

    let busy: Vec<BusyEvent> = normalize(&raw, &request.window, request.zone, request.policy)?
        .into_iter()
        .filter(|event| dates.contains(event.date()))
        .collect();

    let free = compute_free_intervals(&busy, &request.window, &dates);

    Ok(Availability {
        calendars,
        busy,
        free,
    })
}
