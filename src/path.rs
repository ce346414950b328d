//! # Chart Path Geometry
//!
//! Converts the projected dense curve into drawable geometry:
//! - **Stroke**: a uniform cubic B-spline through the samples. With 50
//!   samples per tide segment it hugs the extrema closely while keeping
//!   direction changes smooth
//! - **Area**: the stroke closed down to the chart baseline, for the fill
//! - **Markers**: one labelled point per tide event
//!
//! Paths are plain command lists; [`RenderPath::to_svg`] writes them as SVG
//! path data.

use crate::scale::{HeightScale, TimeScale};
use crate::ticks::format_height;
use crate::{DenseCurve, ExtremumSequence, TideKind};
use serde::Serialize;
use std::fmt::Write;

/// Markers closer than this to the left margin are left-aligned.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 20.0;

/// Marker labels sit this far above the marker.
pub const LABEL_OFFSET: f64 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    Close,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderPath {
    pub commands: Vec<PathCommand>,
}

impl RenderPath {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// SVG path data, e.g. `M40.00,20.00L...`.
    pub fn to_svg(&self) -> String {
        let mut data = String::new();
        for command in &self.commands {
            // Writing to a String cannot fail
            let _ = match command {
                PathCommand::MoveTo(p) => write!(data, "M{:.2},{:.2}", p.x, p.y),
                PathCommand::LineTo(p) => write!(data, "L{:.2},{:.2}", p.x, p.y),
                PathCommand::CubicTo { c1, c2, to } => write!(
                    data,
                    "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                ),
                PathCommand::Close => write!(data, "Z"),
            };
        }
        data
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
}

/// A labelled point drawn on top of the curve for each high/low water.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub kind: TideKind,
    pub position: Point,
    /// Baseline of the label text
    pub label_position: Point,
    pub label: String,
    pub anchor: TextAnchor,
}

/// Uniform cubic B-spline through `points`, as Bezier segments.
///
/// Starts exactly at the first point and ends exactly at the last; interior
/// points act as control points.
pub fn basis_spline(points: &[Point]) -> Vec<PathCommand> {
    let (first, second) = match points {
        [] => return Vec::new(),
        [only] => return vec![PathCommand::MoveTo(*only)],
        [first, second] => return vec![PathCommand::MoveTo(*first), PathCommand::LineTo(*second)],
        [first, second, ..] => (*first, *second),
    };

    let mut commands = Vec::with_capacity(points.len() + 2);
    commands.push(PathCommand::MoveTo(first));
    commands.push(PathCommand::LineTo(Point::new(
        (5.0 * first.x + second.x) / 6.0,
        (5.0 * first.y + second.y) / 6.0,
    )));

    let (mut p0, mut p1) = (first, second);
    for &p in &points[2..] {
        commands.push(bezier(p0, p1, p));
        p0 = p1;
        p1 = p;
    }
    commands.push(bezier(p0, p1, p1));
    commands.push(PathCommand::LineTo(p1));

    commands
}

fn bezier(p0: Point, p1: Point, p: Point) -> PathCommand {
    PathCommand::CubicTo {
        c1: Point::new((2.0 * p0.x + p1.x) / 3.0, (2.0 * p0.y + p1.y) / 3.0),
        c2: Point::new((p0.x + 2.0 * p1.x) / 3.0, (p0.y + 2.0 * p1.y) / 3.0),
        to: Point::new((p0.x + 4.0 * p1.x + p.x) / 6.0, (p0.y + 4.0 * p1.y + p.y) / 6.0),
    }
}

/// Project every curve sample into pixel space.
pub fn project(curve: &DenseCurve, time: &TimeScale, height: &HeightScale) -> Vec<Point> {
    curve
        .points
        .iter()
        .map(|s| Point::new(time.map(&s.time), height.map(s.height_m)))
        .collect()
}

pub fn stroke_path(curve: &DenseCurve, time: &TimeScale, height: &HeightScale) -> RenderPath {
    RenderPath {
        commands: basis_spline(&project(curve, time, height)),
    }
}

/// The stroke, then down to the baseline at the last x, back along the
/// baseline to the first x, and closed.
pub fn area_path(curve: &DenseCurve, time: &TimeScale, height: &HeightScale) -> RenderPath {
    let points = project(curve, time, height);
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return RenderPath::default();
    };

    let baseline = height.baseline();
    let mut commands = basis_spline(&points);
    commands.push(PathCommand::LineTo(Point::new(last.x, baseline)));
    commands.push(PathCommand::LineTo(Point::new(first.x, baseline)));
    commands.push(PathCommand::Close);

    RenderPath { commands }
}

/// One marker per extremum. Labels near the left margin switch to a start
/// anchor so they are not clipped off the surface.
pub fn markers(
    sequence: &ExtremumSequence,
    time: &TimeScale,
    height: &HeightScale,
    edge_threshold: f64,
) -> Vec<Marker> {
    let left = time.range().0;
    sequence
        .iter()
        .map(|extremum| {
            let position = Point::new(time.map(&extremum.time), height.map(extremum.height_m));
            let anchor = if position.x - left < edge_threshold {
                TextAnchor::Start
            } else {
                TextAnchor::Middle
            };
            Marker {
                kind: extremum.kind,
                position,
                label_position: Point::new(position.x, position.y - LABEL_OFFSET),
                label: format_height(extremum.height_m),
                anchor,
            }
        })
        .collect()
}
