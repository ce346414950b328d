//! # Data to Pixel Scales
//!
//! Two affine maps place the dense curve on the drawing surface:
//! - **Time** runs left to right between the left and right margins
//! - **Height** runs bottom to top, so the range is inverted: the lowest
//!   domain value lands on the bottom margin
//!
//! Degenerate inputs never divide by zero. A time domain of zero width (or
//! no domain at all) maps everything to the left margin; a height domain of
//! zero width is widened to one metre.

use crate::ticks;
use crate::DenseCurve;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Space kept clear around the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 30.0,
            bottom: 30.0,
            left: 40.0,
        }
    }
}

/// How the height axis domain is derived from the sampled heights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeightDomain {
    /// `[0, max]`: chart datum stays visible. Heights below datum extend
    /// the domain downwards.
    #[default]
    ZeroBased,
    /// `[min - padding, max + padding]`
    Padded { padding: f64 },
}

/// Blend two values; exact at `u = 0` and `u = 1`.
fn lerp(a: f64, b: f64, u: f64) -> f64 {
    a * (1.0 - u) + b * u
}

/// Time to x mapping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TimeScale {
    domain: Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)>,
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(
        domain: Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)>,
        range: (f64, f64),
    ) -> Self {
        Self { domain, range }
    }

    /// Domain spans the curve; range spans the surface between the margins.
    pub fn for_curve(curve: &DenseCurve, width: f64, margins: &Margins) -> Self {
        Self::new(curve.time_extent(), (margins.left, width - margins.right))
    }

    pub fn domain(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map an instant to x. Instants outside the domain extrapolate.
    pub fn map(&self, time: &DateTime<FixedOffset>) -> f64 {
        let Some((start, end)) = self.domain else {
            return self.range.0;
        };
        let span = (end - start).num_milliseconds();
        if span <= 0 {
            return self.range.0;
        }
        let u = (*time - start).num_milliseconds() as f64 / span as f64;
        lerp(self.range.0, self.range.1, u)
    }

    /// Whether `time` falls inside the domain, ends included.
    pub fn contains(&self, time: &DateTime<FixedOffset>) -> bool {
        self.domain
            .map(|(start, end)| start <= *time && *time <= end)
            .unwrap_or(false)
    }
}

/// Height to y mapping. The range is stored as `(bottom, top)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeightScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl HeightScale {
    /// Build a scale, widening an empty or inverted domain to width 1.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (lo, hi) = domain;
        let domain = if lo.is_finite() && hi.is_finite() && hi > lo {
            (lo, hi)
        } else if lo.is_finite() {
            (lo, lo + 1.0)
        } else {
            (0.0, 1.0)
        };
        Self { domain, range }
    }

    /// Derive the domain from the curve's heights under `policy`.
    ///
    /// With `nice_ticks = Some(n)` the bounds are rounded outward to the tick
    /// step chosen for `n` ticks.
    pub fn for_curve(
        curve: &DenseCurve,
        height: f64,
        margins: &Margins,
        policy: HeightDomain,
        nice_ticks: Option<usize>,
    ) -> Self {
        let domain = match (curve.height_extent(), policy) {
            (None, _) => (0.0, 1.0),
            (Some((min, max)), HeightDomain::ZeroBased) => (min.min(0.0), max.max(0.0)),
            (Some((min, max)), HeightDomain::Padded { padding }) => (min - padding, max + padding),
        };

        let scale = Self::new(domain, (height - margins.bottom, margins.top));
        match nice_ticks {
            Some(count) => scale.nice(count),
            None => scale,
        }
    }

    /// Round the domain outward to multiples of the nice tick step.
    pub fn nice(self, tick_count: usize) -> Self {
        let (lo, hi) = self.domain;
        let step = ticks::nice_step(hi - lo, tick_count);
        Self::new(
            ((lo / step).floor() * step, (hi / step).ceil() * step),
            self.range,
        )
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// `(bottom, top)` in pixels.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// The pixel row where the fill area closes.
    pub fn baseline(&self) -> f64 {
        self.range.0
    }

    pub fn map(&self, height_m: f64) -> f64 {
        let (lo, hi) = self.domain;
        lerp(self.range.0, self.range.1, (height_m - lo) / (hi - lo))
    }
}
