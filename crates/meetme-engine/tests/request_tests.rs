//! Tests for request parsing, layering and resolution.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use meetme_engine::request::{
    default_date_range, parse_date, parse_date_range, parse_time_of_day, parse_timezone,
};
use meetme_engine::{AvailabilityRequest, MalformedPolicy, MeetError, RequestConfig};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

// ── Times of day ────────────────────────────────────────────────────────────

#[test]
fn accepted_time_formats() {
    let cases = [
        ("9am", t(9, 0)),
        ("9 AM", t(9, 0)),
        ("1:30pm", t(13, 30)),
        ("1:30 pm", t(13, 30)),
        ("13:30", t(13, 30)),
        ("0:15", t(0, 15)),
        ("12am", t(0, 0)),
        ("12:30am", t(0, 30)),
        ("12pm", t(12, 0)),
        (" 5pm ", t(17, 0)),
    ];
    for (text, expected) in cases {
        assert_eq!(parse_time_of_day(text).unwrap(), expected, "{:?}", text);
    }
}

#[test]
fn rejected_time_formats() {
    for text in ["", "9", "13pm", "0am", "9:5", "9:5pm", "25:00", "10:60", "noon", "9:30xm"] {
        assert!(
            matches!(parse_time_of_day(text), Err(MeetError::InvalidTime(_))),
            "{:?} should be rejected",
            text
        );
    }
}

#[test]
fn time_error_names_the_accepted_formats() {
    let err = parse_time_of_day("noon").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid time: 'noon' didn't match accepted formats 13:30 or 1:30pm"
    );
}

// ── Dates ───────────────────────────────────────────────────────────────────

#[test]
fn dates_parse_in_us_and_iso_form() {
    assert_eq!(parse_date("03/16/2026").unwrap(), d(16));
    assert_eq!(parse_date("2026-03-16").unwrap(), d(16));
    assert!(matches!(parse_date("16/03/2026"), Err(MeetError::InvalidDate(_))));
    assert!(matches!(parse_date("March 16"), Err(MeetError::InvalidDate(_))));
}

#[test]
fn date_ranges() {
    let range = parse_date_range("03/16/2026 - 03/20/2026").unwrap();
    assert_eq!((range.first(), range.last()), (d(16), d(20)));

    let single = parse_date_range("03/16/2026").unwrap();
    assert_eq!((single.first(), single.last()), (d(16), d(16)));

    assert!(matches!(
        parse_date_range("03/20/2026 - 03/16/2026"),
        Err(MeetError::InvalidRange(_))
    ));
    assert!(matches!(
        parse_date_range("03/16/2026-03/20/2026"),
        Err(MeetError::InvalidDate(_))
    ));
    assert!(matches!(
        parse_date_range("03/16/2026 to 03/20/2026"),
        Err(MeetError::InvalidDate(_))
    ));
}

#[test]
fn default_range_is_tomorrow_through_a_week() {
    let range = default_date_range(d(15)).unwrap();
    assert_eq!((range.first(), range.last()), (d(16), d(22)));
    assert_eq!(range.num_days(), 7);
}

#[test]
fn timezones() {
    assert_eq!(parse_timezone("UTC").unwrap(), Tz::UTC);
    assert_eq!(
        parse_timezone("America/Los_Angeles").unwrap(),
        Tz::America__Los_Angeles
    );
    assert!(matches!(
        parse_timezone("Mars/Olympus_Mons"),
        Err(MeetError::InvalidTimezone(_))
    ));
}

// ── RequestConfig ───────────────────────────────────────────────────────────

#[test]
fn empty_config_resolves_to_defaults() {
    let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
    let request = RequestConfig::default().resolve(now).unwrap();

    assert!(request.calendars.is_empty());
    assert_eq!((request.dates.first(), request.dates.last()), (d(16), d(22)));
    assert_eq!(request.window.start(), t(9, 0));
    assert_eq!(request.window.end(), t(17, 0));
    assert_eq!(request.zone, Tz::UTC);
    assert_eq!(request.policy, MalformedPolicy::Skip);
}

#[test]
fn default_dates_follow_the_request_zone() {
    // 12:00 UTC on the 15th is already the 16th in Auckland.
    let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
    let config = RequestConfig {
        timezone: Some("Pacific/Auckland".to_string()),
        ..RequestConfig::default()
    };
    let request = config.resolve(now).unwrap();
    assert_eq!((request.dates.first(), request.dates.last()), (d(17), d(23)));
}

#[test]
fn config_parses_from_json() {
    let config = RequestConfig::from_json(
        r#"{
            "calendars": ["me@example.com"],
            "daterange": "03/16/2026 - 03/18/2026",
            "start_time": "10am",
            "end_time": "4:30pm",
            "timezone": "America/Los_Angeles",
            "on_malformed": "abort"
        }"#,
    )
    .unwrap();

    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let request = config.resolve(now).unwrap();
    assert_eq!(request.calendars, vec!["me@example.com".to_string()]);
    assert_eq!((request.dates.first(), request.dates.last()), (d(16), d(18)));
    assert_eq!(request.window.start(), t(10, 0));
    assert_eq!(request.window.end(), t(16, 30));
    assert_eq!(request.zone, Tz::America__Los_Angeles);
    assert_eq!(request.policy, MalformedPolicy::Abort);
}

#[test]
fn unknown_config_fields_are_rejected() {
    assert!(matches!(
        RequestConfig::from_json(r#"{"date_range": "03/16/2026"}"#),
        Err(MeetError::Config(_))
    ));
}

#[test]
fn overrides_win_over_file_values() {
    let file = RequestConfig {
        calendars: vec!["a".to_string()],
        daterange: Some("03/16/2026".to_string()),
        start_time: Some("8am".to_string()),
        timezone: Some("Europe/London".to_string()),
        ..RequestConfig::default()
    };
    let flags = RequestConfig {
        start_time: Some("10am".to_string()),
        on_malformed: Some(MalformedPolicy::Abort),
        ..RequestConfig::default()
    };

    let merged = file.merged_with(flags);
    assert_eq!(merged.calendars, vec!["a".to_string()]);
    assert_eq!(merged.daterange.as_deref(), Some("03/16/2026"));
    assert_eq!(merged.start_time.as_deref(), Some("10am"));
    assert_eq!(merged.end_time, None);
    assert_eq!(merged.timezone.as_deref(), Some("Europe/London"));
    assert_eq!(merged.on_malformed, Some(MalformedPolicy::Abort));
}

#[test]
fn empty_window_is_rejected() {
    let config = RequestConfig {
        start_time: Some("5pm".to_string()),
        end_time: Some("9am".to_string()),
        ..RequestConfig::default()
    };
    let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
    assert!(matches!(config.resolve(now), Err(MeetError::InvalidRange(_))));
}

#[test]
fn builder_sets_request_fields() {
    let window = meetme_engine::TimeWindow::new(t(9, 0), t(12, 0)).unwrap();
    let dates = meetme_engine::DateRange::single(d(16));
    let request = AvailabilityRequest::new(dates, window)
        .with_calendars(["a", "b"])
        .with_zone(Tz::Europe__Berlin)
        .with_policy(MalformedPolicy::Abort);

    assert_eq!(request.calendars, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(request.zone, Tz::Europe__Berlin);
    assert_eq!(request.policy, MalformedPolicy::Abort);
}
