//! # Tide Chart Rendering
//!
//! This module draws a built [`TideChart`] onto two surfaces:
//! - **Terminal**: a tide table plus a character-grid plot, for the CLI
//! - **SVG**: the app's chart card (grid, gradient fill, axes, curve,
//!   labelled markers) as a standalone document
//!
//! Neither surface computes anything about the tide itself; all positions
//! come from the chart's scales, ticks and paths.

use crate::chart::TideChart;
use crate::path::TextAnchor;
use crate::scale::{HeightScale, TimeScale};
use crate::ticks::format_height;
use crate::{TideDay, TideKind};

/// Character grid size for the terminal plot.
const ROWS: usize = 12;
const COLS: usize = 60;
/// Space for Y-axis labels
const Y_AXIS_WIDTH: usize = 7;

const PRIMARY: &str = "#007AFF";
const OUTLINE: &str = "#79747E";
const ON_SURFACE: &str = "#1C1B1F";

/// Tide table: one line per high/low water, in time order.
pub fn tide_table(station_name: &str, day: &TideDay, chart: &TideChart) -> String {
    let mut lines = vec![format!(
        "{} ({}) - {}",
        station_name,
        day.station_id,
        day.date.format("%A, %-d %B %Y")
    )];

    if day.offline {
        lines.push("⚠ OFFLINE: approximate tide times".to_string());
    }

    if chart.extrema.is_empty() {
        lines.push("  No tide events for this date".to_string());
    }
    for extremum in &chart.extrema {
        let label = match extremum.kind {
            TideKind::High => "High Tide",
            TideKind::Low => "Low Tide",
        };
        lines.push(format!(
            "  {:<10} {}  {:>6}",
            label,
            extremum.time.format("%H:%M"),
            format_height(extremum.height_m)
        ));
    }

    lines.join("\n")
}

/// Character plot of the dense curve with `H`/`L` at the extrema.
pub fn ascii_chart(chart: &TideChart) -> String {
    if chart.is_empty() {
        return String::new();
    }

    // Same domains as the chart, projected onto the character grid
    let time = TimeScale::new(chart.time_scale.domain(), (0.0, (COLS - 1) as f64));
    let height = HeightScale::new(chart.height_scale.domain(), ((ROWS - 1) as f64, 0.0));
    let cell = |x: f64, y: f64| {
        let col = (x.round().max(0.0) as usize).min(COLS - 1);
        let row = (y.round().max(0.0) as usize).min(ROWS - 1);
        (row, col)
    };

    let mut grid = vec![vec![' '; COLS]; ROWS];
    for sample in &chart.curve.points {
        let (row, col) = cell(time.map(&sample.time), height.map(sample.height_m));
        grid[row][col] = '*';
    }
    for extremum in &chart.extrema {
        let (row, col) = cell(time.map(&extremum.time), height.map(extremum.height_m));
        grid[row][col] = match extremum.kind {
            TideKind::High => 'H',
            TideKind::Low => 'L',
        };
    }

    let mut labels = vec![String::new(); ROWS];
    for tick in &chart.height_ticks {
        let (row, _) = cell(0.0, height.map(tick.value));
        labels[row] = tick.label.clone();
    }

    let mut lines: Vec<String> = grid
        .iter()
        .zip(&labels)
        .map(|(row, label)| {
            let body: String = row.iter().collect();
            format!("{:>width$} |{}", label, body.trim_end(), width = Y_AXIS_WIDTH - 2)
        })
        .collect();

    lines.push(format!("{}+{}", " ".repeat(Y_AXIS_WIDTH - 1), "-".repeat(COLS)));

    // Time labels under the axis, skipped where they would overlap
    let mut axis = vec![' '; COLS + 5];
    let mut next_free = 0;
    for tick in &chart.time_ticks {
        let (_, col) = cell(time.map(&tick.time), 0.0);
        let start = col.saturating_sub(2).max(next_free);
        if start + tick.label.len() > axis.len() {
            continue;
        }
        for (i, c) in tick.label.chars().enumerate() {
            axis[start + i] = c;
        }
        next_free = start + tick.label.len() + 1;
    }
    let axis: String = axis.into_iter().collect();
    lines.push(format!("{}{}", " ".repeat(Y_AXIS_WIDTH), axis.trim_end()));

    lines.join("\n")
}

/// Render the table and plot to stdout.
pub fn draw_ascii(station_name: &str, day: &TideDay, chart: &TideChart) {
    println!("{}", tide_table(station_name, day, chart));
    let plot = ascii_chart(chart);
    if !plot.is_empty() {
        println!();
        println!("{}", plot);
    }
}

/// Standalone SVG document for the chart at `width` x `height` pixels.
pub fn render_svg(chart: &TideChart, width: f64, height: f64) -> String {
    let (left, right) = chart.time_scale.range();
    let (bottom, top) = chart.height_scale.range();
    let mut content: Vec<String> = Vec::new();

    // Grid lines
    for tick in &chart.height_ticks {
        let y = chart.height_scale.map(tick.value);
        content.push(format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"0.5\" opacity=\"0.2\"/>",
            left, y, right, y, OUTLINE
        ));
    }

    if !chart.area.is_empty() {
        content.push(format!(
            "<path d=\"{}\" fill=\"url(#areaGradient)\"/>",
            chart.area.to_svg()
        ));
    }

    // Axes
    content.push(format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
        left, top, left, bottom, OUTLINE
    ));
    content.push(format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
        left, bottom, right, bottom, OUTLINE
    ));

    for tick in &chart.height_ticks {
        let y = chart.height_scale.map(tick.value);
        content.push(format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            left - 5.0, y, left, y, OUTLINE
        ));
        content.push(format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" dominant-baseline=\"middle\" font-size=\"11\" fill=\"{}\">{}</text>",
            left - 10.0, y, ON_SURFACE, tick.label
        ));
    }

    for tick in &chart.time_ticks {
        content.push(format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"11\" fill=\"{}\">{}</text>",
            chart.time_scale.map(&tick.time),
            bottom + 20.0,
            ON_SURFACE,
            tick.label
        ));
    }

    if !chart.stroke.is_empty() {
        content.push(format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"2.5\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
            chart.stroke.to_svg(),
            PRIMARY
        ));
    }

    for marker in &chart.markers {
        let anchor = match marker.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
        };
        content.push(format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"5\" fill=\"#FFFFFF\" stroke=\"{}\" stroke-width=\"2\"/>",
            marker.position.x, marker.position.y, PRIMARY
        ));
        content.push(format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" font-size=\"12\" font-weight=\"500\" fill=\"{}\">{}</text>",
            marker.label_position.x, marker.label_position.y, anchor, PRIMARY, marker.label
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <defs>
    <linearGradient id="areaGradient" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{p}" stop-opacity="0.2"/><stop offset="1" stop-color="{p}" stop-opacity="0"/></linearGradient>
  </defs>
  {body}
</svg>
"#,
        w = width,
        h = height,
        p = PRIMARY,
        body = content.join("\n  ")
    )
}
