//! # Axis Ticks
//!
//! Height ticks are evenly spaced "nice" numbers (1, 2, 2.5 or 5 times a
//! power of ten) chosen so that roughly the requested number of ticks covers
//! the height domain. Time ticks sit on fixed hours of the day and are only
//! emitted where the curve actually has data.

use crate::scale::{HeightScale, TimeScale};
use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use serde::Serialize;

/// Hours of the day labelled on the time axis; 24 is the following midnight.
pub const CANONICAL_HOURS: [u32; 5] = [0, 6, 12, 18, 24];

/// Height tick count used by the app chart.
pub const DEFAULT_HEIGHT_TICKS: usize = 5;

const NICE_MULTIPLES: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeightTick {
    pub value: f64,
    /// e.g. `"3.0m"`
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeTick {
    pub time: DateTime<FixedOffset>,
    /// 24-hour `HH:MM`
    pub label: String,
}

/// Tick spacing for `span` split into about `count` intervals.
///
/// Picks the nice multiple closest to `span / count` on a log scale, so
/// 1.24 rounds to 1 and 1.6 rounds to 2. Empty or invalid spans give 1.
pub fn nice_step(span: f64, count: usize) -> f64 {
    let raw = span.abs() / count.max(1) as f64;
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }

    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let multiple = NICE_MULTIPLES
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (fraction / a).ln().abs();
            let db = (fraction / b).ln().abs();
            da.total_cmp(&db)
        })
        .unwrap_or(1.0);

    multiple * magnitude
}

/// Every multiple of the nice step inside the height domain, ends included.
pub fn height_ticks(scale: &HeightScale, count: usize) -> Vec<HeightTick> {
    let (lo, hi) = scale.domain();
    let step = nice_step(hi - lo, count);

    // Integer indices keep values free of accumulated float drift
    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;

    (first..=last)
        .map(|i| {
            // Adding 0.0 turns -0.0 into 0.0 for the label
            let value = i as f64 * step + 0.0;
            HeightTick {
                value,
                label: format_height(value),
            }
        })
        .collect()
}

/// Fixed hours of each calendar day the domain touches, kept only inside
/// the domain. Days are taken in the domain start's UTC offset.
pub fn time_ticks(scale: &TimeScale, hours: &[u32]) -> Vec<TimeTick> {
    let Some((start, end)) = scale.domain() else {
        return Vec::new();
    };
    let offset = *start.offset();
    let end_day = end.with_timezone(&offset).date_naive();

    let mut ticks: Vec<TimeTick> = Vec::new();
    let mut day = start.date_naive();
    while day <= end_day {
        let midnight = day
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| offset.from_local_datetime(&naive).single());

        if let Some(midnight) = midnight {
            for &hour in hours {
                let time = midnight + Duration::hours(i64::from(hour));
                if scale.contains(&time) {
                    ticks.push(TimeTick {
                        time,
                        label: time.format("%H:%M").to_string(),
                    });
                }
            }
        }

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    // Hour lists may be unordered, and hour 24 repeats the next midnight
    ticks.sort_by_key(|t| t.time);
    ticks.dedup_by_key(|t| t.time);
    ticks
}

/// One decimal place plus the unit, as shown on markers and the axis.
pub fn format_height(value: f64) -> String {
    format!("{:.1}m", value)
}
