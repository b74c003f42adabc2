//! # meetme-engine
//!
//! Deterministic free-time computation for meeting scheduling.
//!
//! Given the busy events of one or more calendars, a daily time window (say 9am to
//! 5pm) and a range of dates, the engine returns the free intervals of every date:
//! the complement of the merged busy periods inside the window. The computation is
//! pure and per-request; provider access sits behind [`CalendarGateway`].
//!
//! ## Modules
//!
//! - [`interval`]: TimeWindow, BusyEvent, FreeInterval, DateRange value types
//! - [`normalize`]: raw provider records → sorted busy events
//! - [`freetime`]: merge busy periods and compute free intervals per date
//! - [`gateway`]: calendar provider seam and a JSON export implementation
//! - [`request`]: request-scoped configuration and its text parsers
//! - [`availability`]: gateway → normalizer → solver for one request
//! - [`report`]: text, message and JSON rendering
//! - [`error`]: Error types

pub mod availability;
pub mod error;
pub mod freetime;
pub mod gateway;
pub mod interval;
pub mod normalize;
pub mod report;
pub mod request;

pub use availability::{compute_availability, Availability};
pub use error::MeetError;
pub use freetime::{
    compute_free_intervals, find_first_free_interval, free_intervals_at_least, merge_busy,
};
pub use gateway::{CalendarEntry, CalendarGateway, ExportGateway};
pub use interval::{BusyEvent, DateRange, FreeInterval, TimeWindow};
pub use normalize::{normalize, MalformedPolicy, RawEvent};
pub use request::{AvailabilityRequest, RequestConfig};
