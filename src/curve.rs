//! # Tide Curve Interpolation
//!
//! A tide between a low and a high water looks like half a sine wave, not a
//! ramp. Between each pair of consecutive extrema the height follows a
//! raised-cosine ease while time advances linearly:
//!
//! ```text
//! e(f)   = 0.5 - 0.5 * cos(pi * f)        f = j / steps, j = 0..=steps
//! height = h0 + (h1 - h0) * e(f)
//! time   = t0 + (t1 - t0) * f
//! ```
//!
//! Segments share their boundary sample, which is emitted once, so a curve
//! built from `n >= 2` extrema holds exactly `(n - 1) * steps + 1` points.

use crate::{ExtremumSequence, SamplePoint, TideExtremum};
use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;
use std::f64::consts::PI;

/// Samples per segment used by the app chart.
pub const DEFAULT_STEPS: usize = 50;

/// Raised-cosine ease: monotonic, `ease(0) = 0`, `ease(1) = 1`, symmetric
/// about `f = 0.5`. Input is clamped to `[0, 1]`.
pub fn ease(f: f64) -> f64 {
    let f = f.clamp(0.0, 1.0);
    0.5 - 0.5 * (PI * f).cos()
}

/// Dense, ordered samples spanning the first to the last extremum.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DenseCurve {
    pub points: Vec<SamplePoint>,
}

impl DenseCurve {
    /// Interpolate `steps` samples per segment. A resolution of 0 is treated
    /// as 1; fewer than two extrema give an empty curve.
    pub fn interpolate(sequence: &ExtremumSequence, steps: usize) -> Self {
        let steps = steps.max(1);
        let extrema = sequence.as_slice();
        if extrema.len() < 2 {
            return Self::default();
        }

        let mut points = Vec::with_capacity((extrema.len() - 1) * steps + 1);
        for (index, pair) in extrema.windows(2).enumerate() {
            // Later segments start where the previous one ended
            let first_step = if index == 0 { 0 } else { 1 };
            points.extend((first_step..=steps).map(|j| sample(&pair[0], &pair[1], j, steps)));
        }

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn time_extent(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        Some((self.points.first()?.time, self.points.last()?.time))
    }

    /// Lowest and highest sampled heights.
    pub fn height_extent(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        Some(
            self.points
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
                    (min.min(p.height_m), max.max(p.height_m))
                }),
        )
    }
}

/// Sample `j` of `steps` between two extrema. Endpoints are copied verbatim
/// so every segment starts at `h0` and ends at `h1` exactly.
fn sample(from: &TideExtremum, to: &TideExtremum, j: usize, steps: usize) -> SamplePoint {
    if j == 0 {
        return SamplePoint {
            time: from.time,
            height_m: from.height_m,
        };
    }
    if j >= steps {
        return SamplePoint {
            time: to.time,
            height_m: to.height_m,
        };
    }

    let f = j as f64 / steps as f64;
    let span_ms = (to.time - from.time).num_milliseconds() as f64;
    let time = from.time + Duration::milliseconds((span_ms * f).round() as i64);
    let height_m = from.height_m + (to.height_m - from.height_m) * ease(f);

    SamplePoint { time, height_m }
}
