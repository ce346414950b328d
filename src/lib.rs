//! # UK Tide Times Core Library
//!
//! This library turns a day's worth of discrete high/low tide events into
//! everything a display needs to draw a tide chart: a dense, smooth curve of
//! tide height, the time/height to pixel mappings, axis ticks, path geometry
//! and per-event markers.
//!
//! ## Design Philosophy
//!
//! ### Pure recomputation
//! - **No hidden state**: every stage is a plain function of its inputs, so a
//!   new date, a new station or a resized surface simply rebuilds the chart
//! - **Never fails**: an empty or degenerate tide day degrades to an empty or
//!   flat chart rather than an error
//! - **Serialization-friendly**: all derived structures implement `Serialize`
//!   so a front-end can consume them as plain data
//!
//! ### Data Flow
//! 1. **Source**: fetch events from the tide feed (or the offline model)
//! 2. **Normalize**: sort by time and drop duplicate timestamps
//! 3. **Interpolate**: raised-cosine transition between consecutive extrema
//! 4. **Scale**: map time to x and height to y inside the chart margins
//! 5. **Ticks & paths**: nice height ticks, fixed-hour time ticks, B-spline
//!    stroke and fill area, labelled markers
//!
//! ## Core Types
//!
//! - [`TideExtremum`]: a single high or low water event
//! - [`SamplePoint`]: a synthetic point on the interpolated curve
//! - [`TideDay`]: one station's extrema for one date, with an offline flag

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Module declarations
pub mod chart;
pub mod config;
pub mod curve;
pub mod fallback;
pub mod normalize;
pub mod path;
pub mod renderer;
pub mod scale;
pub mod stations;
pub mod ticks;
pub mod tide_data;

pub use chart::{ChartOptions, TideChart};
pub use curve::DenseCurve;
pub use normalize::ExtremumSequence;

/// Whether an extremum is a high or a low water.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideKind {
    High,
    Low,
}

/// Raised when a raw feed value cannot be turned into a typed extremum.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Event type is neither a high nor a low water
    #[error("unknown tide event type: {0:?}")]
    UnknownKind(String),

    /// Timestamp is neither RFC 3339 nor a naive ISO-8601 date-time
    #[error("invalid tide timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// Height is NaN or infinite
    #[error("invalid tide height: {0}")]
    InvalidHeight(f64),
}

impl FromStr for TideKind {
    type Err = IngestError;

    /// Accepts the feed spellings (`HighWater`, `LowWater`) as well as the
    /// short forms used by the app (`high`, `low`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "highwater" | "high_water" => Ok(TideKind::High),
            "low" | "lowwater" | "low_water" => Ok(TideKind::Low),
            _ => Err(IngestError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for TideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TideKind::High => write!(f, "High"),
            TideKind::Low => write!(f, "Low"),
        }
    }
}

/// A single high or low water event.
///
/// Times carry their UTC offset so that labels and day boundaries are
/// computed in the offset the events were produced for.
///
/// # Example
/// ```
/// use tide_times_lib::{TideExtremum, TideKind};
///
/// let high = TideExtremum::parse(TideKind::High, "2025-07-24T06:00:00+01:00", 6.0).unwrap();
/// assert_eq!(high.height_m, 6.0);
/// assert_eq!(high.time.format("%H:%M").to_string(), "06:00");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideExtremum {
    pub kind: TideKind,
    pub time: DateTime<FixedOffset>,
    /// Height above chart datum in metres
    pub height_m: f64,
}

impl TideExtremum {
    pub fn new(kind: TideKind, time: DateTime<FixedOffset>, height_m: f64) -> Self {
        Self {
            kind,
            time,
            height_m,
        }
    }

    /// Build an extremum from an ISO-8601 timestamp string.
    ///
    /// RFC 3339 strings keep their own offset; naive timestamps such as
    /// `2025-07-24T06:00:00` are read as UTC.
    pub fn parse(kind: TideKind, timestamp: &str, height_m: f64) -> Result<Self, IngestError> {
        if !height_m.is_finite() {
            return Err(IngestError::InvalidHeight(height_m));
        }
        Ok(Self::new(kind, parse_timestamp(timestamp)?, height_m))
    }
}

/// Parse a feed timestamp, accepting RFC 3339 or naive (UTC) ISO-8601.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, IngestError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    raw.parse::<chrono::NaiveDateTime>()
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|_| IngestError::InvalidTimestamp(raw.to_string()))
}

/// A synthetic point on the interpolated tide curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub time: DateTime<FixedOffset>,
    pub height_m: f64,
}

/// One station's tide events for one calendar date.
///
/// # Offline Behavior
/// When `offline = true` the extrema come from the approximate model in
/// [`fallback`] rather than the tide feed, and displays say so.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TideDay {
    pub station_id: String,
    pub date: NaiveDate,
    pub extrema: Vec<TideExtremum>,
    /// True if using the offline model instead of feed data
    pub offline: bool,
}
