//! # Offline Tide Model
//!
//! Provides high and low waters for a date when the tide feed is unavailable.
//! The model is a single semidiurnal wave whose amplitude follows the
//! spring-neap cycle:
//!
//! - **Period**: 12.42 hours (lunar M2), high waters every period and low
//!   waters half a period later
//! - **Amplitude**: M2 plus a solar S2 term that adds at new and full moon
//!   and subtracts at the quarters
//! - **Moon age**: days since a reference new moon, modulo the mean synodic
//!   month
//!
//! ### Accuracy Trade-offs
//! - ✅ **Correct rhythm**: roughly four extrema per day, drifting ~50 minutes
//!   later each day like real tides
//! - ✅ **Spring-neap envelope**: larger ranges near new/full moon
//! - ❌ **Not station-specific**: every station gets the same times
//! - ❌ **Symmetric**: no diurnal inequality or shallow-water distortion
//!
//! Days built here are flagged `offline` so displays can say so.

use crate::{TideDay, TideExtremum, TideKind};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

/// Lunar semidiurnal period in seconds (12.42 h).
const M2_PERIOD_SECS: f64 = 12.42 * 3600.0;

/// Mean synodic month in days.
const SYNODIC_MONTH_DAYS: f64 = 29.530_588_2;

/// Unix time of the new moon of 2000-01-06 18:14 UTC.
const NEW_MOON_EPOCH_SECS: f64 = 947_182_440.0;

/// Tunable constants of the approximation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OfflineModel {
    /// Mean level above chart datum, metres
    pub mean_level_m: f64,
    /// Lunar M2 amplitude, metres
    pub m2_amplitude_m: f64,
    /// Solar S2 amplitude, metres (must stay below M2)
    pub s2_amplitude_m: f64,
    /// Unix time of a reference high water
    pub reference_high_water_secs: f64,
}

impl Default for OfflineModel {
    /// Typical south-coast ranges: about 5.8 m at springs, 3 m at neaps.
    fn default() -> Self {
        Self {
            mean_level_m: 3.6,
            m2_amplitude_m: 2.2,
            s2_amplitude_m: 0.7,
            reference_high_water_secs: NEW_MOON_EPOCH_SECS,
        }
    }
}

/// Age of the moon in days since the last new moon.
pub fn moon_age_days(unix_secs: f64) -> f64 {
    ((unix_secs - NEW_MOON_EPOCH_SECS) / 86_400.0).rem_euclid(SYNODIC_MONTH_DAYS)
}

impl OfflineModel {
    /// Half-range of the tide at `unix_secs`, largest at new and full moon.
    pub fn amplitude_at(&self, unix_secs: f64) -> f64 {
        let moon_angle = moon_age_days(unix_secs) / SYNODIC_MONTH_DAYS * std::f64::consts::TAU;
        self.m2_amplitude_m + self.s2_amplitude_m * (2.0 * moon_angle).cos()
    }

    /// High and low waters falling on `date` in `offset`, in time order.
    pub fn extrema_on(&self, date: NaiveDate, offset: FixedOffset) -> Vec<TideExtremum> {
        let Some(start) = local_midnight(date, offset) else {
            return Vec::new();
        };
        let Some(end) = date.succ_opt().and_then(|next| local_midnight(next, offset)) else {
            return Vec::new();
        };

        let half_period = M2_PERIOD_SECS / 2.0;
        let start_secs = start.timestamp() as f64;
        let end_secs = end.timestamp() as f64;
        let first = ((start_secs - self.reference_high_water_secs) / half_period).floor() as i64;
        let last = ((end_secs - self.reference_high_water_secs) / half_period).ceil() as i64;

        (first..=last)
            .filter_map(|n| {
                let secs = self.reference_high_water_secs + n as f64 * half_period;
                // Published tables give times to the minute
                let rounded = (secs / 60.0).round() as i64 * 60;
                let time = DateTime::from_timestamp(rounded, 0)?.with_timezone(&offset);
                if time < start || time >= end {
                    return None;
                }

                let amplitude = self.amplitude_at(secs);
                let (kind, height) = if n.rem_euclid(2) == 0 {
                    (TideKind::High, self.mean_level_m + amplitude)
                } else {
                    (TideKind::Low, self.mean_level_m - amplitude)
                };
                // Two decimals, like the feed
                let height_m = (height * 100.0).round() / 100.0;
                Some(TideExtremum::new(kind, time, height_m))
            })
            .collect()
    }
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    offset.from_local_datetime(&naive).single()
}

/// Approximate tide day for a station using the default model.
pub fn approximate(station_id: &str, date: NaiveDate, offset: FixedOffset) -> TideDay {
    TideDay {
        station_id: station_id.to_string(),
        date,
        extrema: OfflineModel::default().extrema_on(date, offset),
        offline: true,
    }
}
