//! Compute free intervals from busy events.
//!
//! Clips busy events to the daily window, groups them by date, merges overlapping or
//! touching periods, then sweeps each date left to right collecting the gaps.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};
use log::debug;

use crate::interval::{BusyEvent, DateRange, FreeInterval, TimeWindow};

type Span = (NaiveTime, NaiveTime);

/// Clip every event to the window and bucket the non-empty remainders by date.
fn clip_by_date(events: &[BusyEvent], window: &TimeWindow) -> BTreeMap<NaiveDate, Vec<Span>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Span>> = BTreeMap::new();
    for event in events {
        if let Some(span) = window.clip(event.start(), event.end()) {
            by_date.entry(event.date()).or_default().push(span);
        }
    }
    by_date
}

/// Sort spans and coalesce any that overlap or touch.
fn merge_spans(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_unstable();

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                // Overlapping or adjacent: extend the current span.
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

/// Gaps between merged spans of one date, bounded by the window.
fn gaps(date: NaiveDate, merged: &[Span], window: &TimeWindow, out: &mut Vec<FreeInterval>) {
    let mut cursor = window.start();

    for &(busy_start, busy_end) in merged {
        if busy_start > cursor {
            out.push(FreeInterval::from_checked(date, cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    // Trailing free interval after the last busy span.
    if cursor < window.end() {
        out.push(FreeInterval::from_checked(date, cursor, window.end()));
    }
}

/// Clip busy events to the window and merge them per date.
///
/// Returns non-overlapping busy events sorted by (date, start). Events that fall
/// entirely outside the window are dropped. Merging an already merged set returns
/// it unchanged.
pub fn merge_busy(events: &[BusyEvent], window: &TimeWindow) -> Vec<BusyEvent> {
    clip_by_date(events, window)
        .into_iter()
        .flat_map(|(date, spans)| {
            merge_spans(spans)
                .into_iter()
                .map(move |(start, end)| BusyEvent::from_checked(date, start, end))
        })
        .collect()
}

/// Compute the free intervals inside `window` for every date of `range` and every
/// date that carries at least one busy event.
///
/// Busy events may arrive in any order and may overlap. For each date, the free
/// intervals and the merged busy periods together cover the window exactly, and
/// touching busy events never leave a zero-length gap. A date without busy events
/// yields one interval spanning the whole window.
///
/// The result is sorted by date, then by start time.
pub fn compute_free_intervals(
    busy: &[BusyEvent],
    window: &TimeWindow,
    range: &DateRange,
) -> Vec<FreeInterval> {
    let mut by_date = clip_by_date(busy, window);

    let mut dates: BTreeSet<NaiveDate> = range.days().collect();
    dates.extend(busy.iter().map(BusyEvent::date));

    let mut free = Vec::with_capacity(dates.len());
    for date in dates {
        let merged = by_date.remove(&date).map(merge_spans).unwrap_or_default();
        gaps(date, &merged, window, &mut free);
    }

    debug!(
        "Computed {} free intervals from {} busy events over {} days",
        free.len(),
        busy.len(),
        range.num_days()
    );

    free
}

/// Free intervals lasting at least `min_duration_minutes`.
pub fn free_intervals_at_least(
    busy: &[BusyEvent],
    window: &TimeWindow,
    range: &DateRange,
    min_duration_minutes: i64,
) -> Vec<FreeInterval> {
    compute_free_intervals(busy, window, range)
        .into_iter()
        .filter(|slot| slot.duration_minutes() >= min_duration_minutes)
        .collect()
}

/// Find the earliest free interval of at least `min_duration_minutes`.
///
/// Delegates to [`compute_free_intervals`] and returns the first interval meeting
/// the minimum duration requirement.
pub fn find_first_free_interval(
    busy: &[BusyEvent],
    window: &TimeWindow,
    range: &DateRange,
    min_duration_minutes: i64,
) -> Option<FreeInterval> {
    compute_free_intervals(busy, window, range)
        .into_iter()
        .find(|slot| slot.duration_minutes() >= min_duration_minutes)
}
