use std::hint::black_box;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use meetme_engine::{
    compute_free_intervals, merge_busy, normalize, BusyEvent, DateRange, MalformedPolicy,
    RawEvent, TimeWindow,
};

fn window() -> TimeWindow {
    TimeWindow::new(
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    )
    .unwrap()
}

fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

/// `per_day` overlapping half-hour-ish events on each of `days` dates.
fn busy_events(days: u32, per_day: u32) -> Vec<BusyEvent> {
    let mut events = Vec::new();
    for day in 0..days {
        let date = first_day() + chrono::Days::new(day as u64);
        for i in 0..per_day {
            let start = 7 * 60 + (i * 37) % 600;
            let end = start + 20 + i % 45;
            events.push(
                BusyEvent::new(
                    date,
                    NaiveTime::from_hms_opt(start / 60, start % 60, 0).unwrap(),
                    NaiveTime::from_hms_opt(end / 60, end % 60, 0).unwrap(),
                )
                .unwrap(),
            );
        }
    }
    events
}

fn bench_free_intervals(c: &mut Criterion) {
    let mut group = c.benchmark_group("free_intervals");
    let window = window();

    for &(days, per_day) in &[(1u32, 5u32), (7, 20), (30, 50)] {
        let events = busy_events(days, per_day);
        let range = DateRange::new(
            first_day(),
            first_day() + chrono::Days::new(days as u64 - 1),
        )
        .unwrap();
        group.bench_with_input(
            BenchmarkId::new("compute", events.len()),
            &events,
            |b, events| {
                b.iter(|| compute_free_intervals(black_box(events), &window, &range));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("merge_busy", events.len()),
            &events,
            |b, events| {
                b.iter(|| merge_busy(black_box(events), &window));
            },
        );
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let window = window();

    let records: Vec<RawEvent> = (0..500)
        .map(|i| {
            let day = 16 + i % 10;
            let hour = 8 + i % 9;
            RawEvent::timed(
                format!("2026-03-{:02}T{:02}:00:00Z", day, hour),
                format!("2026-03-{:02}T{:02}:45:00Z", day, hour),
            )
        })
        .collect();

    group.bench_function("500_records_utc", |b| {
        b.iter(|| normalize(black_box(&records), &window, Tz::UTC, MalformedPolicy::Skip));
    });
    group.bench_function("500_records_los_angeles", |b| {
        b.iter(|| {
            normalize(
                black_box(&records),
                &window,
                Tz::America__Los_Angeles,
                MalformedPolicy::Skip,
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_free_intervals, bench_normalize);
criterion_main!(benches);
