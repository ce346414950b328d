//! # Tide Chart Assembly
//!
//! Runs the whole pipeline for one tide day and one surface size:
//! normalize, interpolate, scale, pick ticks, build paths and markers. The
//! result is plain data; drawing it is left to the renderers.

use crate::curve::{DenseCurve, DEFAULT_STEPS};
use crate::normalize::ExtremumSequence;
use crate::path::{self, Marker, RenderPath, DEFAULT_EDGE_THRESHOLD};
use crate::scale::{HeightDomain, HeightScale, Margins, TimeScale};
use crate::ticks::{self, HeightTick, TimeTick, CANONICAL_HOURS, DEFAULT_HEIGHT_TICKS};
use crate::TideExtremum;
use serde::Serialize;
use tracing::debug;

/// Widest chart the app lays out, in pixels.
pub const MAX_CHART_WIDTH: f64 = 600.0;

/// Horizontal padding around the chart card in the app layout.
const VIEWPORT_PADDING: f64 = 32.0;

/// Everything that shapes a chart besides the tide data itself.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartOptions {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    /// Samples per segment between two extrema
    pub steps: usize,
    pub height_domain: HeightDomain,
    /// Round the height domain outward to the tick step
    pub nice_domain: bool,
    pub height_tick_count: usize,
    pub time_tick_hours: Vec<u32>,
    pub marker_edge_threshold: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: MAX_CHART_WIDTH,
            height: 200.0,
            margins: Margins::default(),
            steps: DEFAULT_STEPS,
            height_domain: HeightDomain::ZeroBased,
            nice_domain: false,
            height_tick_count: DEFAULT_HEIGHT_TICKS,
            time_tick_hours: CANONICAL_HOURS.to_vec(),
            marker_edge_threshold: DEFAULT_EDGE_THRESHOLD,
        }
    }
}

impl ChartOptions {
    /// Fit the chart into a window: full width less padding, capped at 600.
    pub fn for_viewport(window_width: f64) -> Self {
        Self::default().with_width(window_width - VIEWPORT_PADDING)
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width.clamp(0.0, MAX_CHART_WIDTH);
        self
    }
}

/// All derived chart data for one tide day.
#[derive(Clone, Debug, Serialize)]
pub struct TideChart {
    pub extrema: ExtremumSequence,
    pub curve: DenseCurve,
    pub time_scale: TimeScale,
    pub height_scale: HeightScale,
    pub height_ticks: Vec<HeightTick>,
    pub time_ticks: Vec<TimeTick>,
    pub stroke: RenderPath,
    pub area: RenderPath,
    pub markers: Vec<Marker>,
}

impl TideChart {
    /// Build the chart. Never fails: an empty day yields empty paths.
    pub fn build(extrema: Vec<TideExtremum>, options: &ChartOptions) -> Self {
        let extrema = ExtremumSequence::from_unordered(extrema);
        let curve = DenseCurve::interpolate(&extrema, options.steps);

        let time_scale = TimeScale::for_curve(&curve, options.width, &options.margins);
        let height_scale = HeightScale::for_curve(
            &curve,
            options.height,
            &options.margins,
            options.height_domain,
            options.nice_domain.then_some(options.height_tick_count),
        );

        let height_ticks = ticks::height_ticks(&height_scale, options.height_tick_count);
        let time_ticks = ticks::time_ticks(&time_scale, &options.time_tick_hours);

        let stroke = path::stroke_path(&curve, &time_scale, &height_scale);
        let area = path::area_path(&curve, &time_scale, &height_scale);
        // Without a curve the scales are placeholders, so nothing is marked
        let markers = if curve.is_empty() {
            Vec::new()
        } else {
            path::markers(
                &extrema,
                &time_scale,
                &height_scale,
                options.marker_edge_threshold,
            )
        };

        debug!(
            extrema = extrema.len(),
            samples = curve.len(),
            width = options.width,
            "built tide chart"
        );

        Self {
            extrema,
            curve,
            time_scale,
            height_scale,
            height_ticks,
            time_ticks,
            stroke,
            area,
            markers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }
}
