//! # Tide Chart Pipeline Tests
//!
//! End-to-end checks of the chart pipeline: a day of high/low waters goes in,
//! and the curve, scales, ticks, paths and markers that come out are verified
//! against hand-computed values.

use chrono::NaiveDate;
use tide_times_lib::chart::{ChartOptions, TideChart};
use tide_times_lib::path::{PathCommand, TextAnchor};
use tide_times_lib::stations::{find_nearest, UK_TIDE_STATIONS};
use tide_times_lib::{fallback, parse_timestamp, TideExtremum, TideKind};

fn extremum(kind: TideKind, timestamp: &str, height_m: f64) -> TideExtremum {
    TideExtremum::parse(kind, timestamp, height_m).unwrap()
}

/// HIGH 06:00 6.0 m, LOW 12:00 1.0 m, HIGH 18:00 6.2 m, LOW 00:00 0.8 m.
fn spring_day() -> Vec<TideExtremum> {
    vec![
        extremum(TideKind::High, "2025-07-24T06:00:00Z", 6.0),
        extremum(TideKind::Low, "2025-07-24T12:00:00Z", 1.0),
        extremum(TideKind::High, "2025-07-24T18:00:00Z", 6.2),
        extremum(TideKind::Low, "2025-07-25T00:00:00Z", 0.8),
    ]
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// The worked example: four extrema on a 600x200 chart with 50 steps.
#[test]
fn spring_day_builds_expected_chart() {
    let chart = TideChart::build(spring_day(), &ChartOptions::default());

    // Three segments of 50 steps sharing their boundary samples
    assert_eq!(
        chart.curve.len(),
        151,
        "Expected 3 * 50 + 1 samples, got {}",
        chart.curve.len()
    );

    let (min, max) = chart.curve.height_extent().unwrap();
    assert!(close(min, 0.8), "Curve minimum should be 0.8 m, got {}", min);
    assert!(close(max, 6.2), "Curve maximum should be 6.2 m, got {}", max);

    let tick_values: Vec<f64> = chart.height_ticks.iter().map(|t| t.value).collect();
    for expected in [1.0, 3.0, 5.0] {
        assert!(
            tick_values.iter().any(|v| close(*v, expected)),
            "Height ticks {:?} should include {}",
            tick_values,
            expected
        );
    }

    let labels: Vec<&str> = chart.time_ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["06:00", "12:00", "18:00", "00:00"],
        "Midnight at the start of the day lies before the first event"
    );
}

/// Pixel mappings land on the plot margins.
#[test]
fn scales_map_domain_ends_to_margins() {
    let chart = TideChart::build(spring_day(), &ChartOptions::default());
    let first = parse_timestamp("2025-07-24T06:00:00Z").unwrap();
    let last = parse_timestamp("2025-07-25T00:00:00Z").unwrap();

    assert!(close(chart.time_scale.map(&first), 40.0));
    assert!(close(chart.time_scale.map(&last), 570.0));

    // Zero-based height domain, drawn upwards from the bottom margin
    assert!(close(chart.height_scale.map(0.0), 170.0));
    assert!(close(chart.height_scale.map(6.2), 20.0));
    assert!(
        chart.height_scale.map(6.0) < chart.height_scale.map(1.0),
        "Higher water must be drawn higher on screen"
    );
}

/// Interpolated heights never leave the band of their two extrema.
#[test]
fn curve_never_overshoots_extrema() {
    let chart = TideChart::build(spring_day(), &ChartOptions::default());
    let extrema = chart.extrema.as_slice();

    for sample in &chart.curve.points {
        let segment = extrema
            .windows(2)
            .find(|pair| pair[0].time <= sample.time && sample.time <= pair[1].time)
            .expect("every sample lies between two extrema");
        let lo = segment[0].height_m.min(segment[1].height_m);
        let hi = segment[0].height_m.max(segment[1].height_m);
        assert!(
            sample.height_m >= lo - 1e-9 && sample.height_m <= hi + 1e-9,
            "Sample {} m at {} outside [{}, {}]",
            sample.height_m,
            sample.time,
            lo,
            hi
        );
    }

    for pair in chart.curve.points.windows(2) {
        assert!(pair[0].time < pair[1].time, "Samples must be strictly increasing");
    }
}

/// Input order does not matter and rebuilding gives identical output.
#[test]
fn build_is_order_independent_and_idempotent() {
    let options = ChartOptions::default();
    let ordered = TideChart::build(spring_day(), &options);

    let mut shuffled = spring_day();
    shuffled.reverse();
    shuffled.swap(0, 2);
    let reordered = TideChart::build(shuffled, &options);

    let a = serde_json::to_string(&ordered).unwrap();
    let b = serde_json::to_string(&reordered).unwrap();
    let c = serde_json::to_string(&TideChart::build(spring_day(), &options)).unwrap();
    assert_eq!(a, b, "Chart should not depend on input order");
    assert_eq!(a, c, "Rebuilding should give the same chart");
}

/// The stroke starts and ends on the first and last samples; the area
/// closes along the bottom of the plot.
#[test]
fn paths_start_end_and_close_correctly() {
    let chart = TideChart::build(spring_day(), &ChartOptions::default());

    match chart.stroke.commands.first() {
        Some(PathCommand::MoveTo(p)) => {
            assert!(close(p.x, 40.0));
            assert!(close(p.y, chart.height_scale.map(6.0)));
        }
        other => panic!("Stroke should begin with MoveTo, got {:?}", other),
    }
    match chart.stroke.commands.last() {
        Some(PathCommand::LineTo(p)) => assert!(close(p.x, 570.0)),
        other => panic!("Stroke should end with LineTo, got {:?}", other),
    }

    let n = chart.area.commands.len();
    assert_eq!(chart.area.commands[n - 1], PathCommand::Close);
    match (&chart.area.commands[n - 3], &chart.area.commands[n - 2]) {
        (PathCommand::LineTo(a), PathCommand::LineTo(b)) => {
            assert!(close(a.y, 170.0) && close(b.y, 170.0));
            assert!(close(a.x, 570.0) && close(b.x, 40.0));
        }
        other => panic!("Area should drop to the baseline, got {:?}", other),
    }
}

/// One marker per extremum; only the one near the left edge is left-aligned.
#[test]
fn markers_label_each_extremum() {
    let chart = TideChart::build(spring_day(), &ChartOptions::default());
    assert_eq!(chart.markers.len(), 4);

    let labels: Vec<&str> = chart.markers.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["6.0m", "1.0m", "6.2m", "0.8m"]);

    assert_eq!(chart.markers[0].anchor, TextAnchor::Start);
    for marker in &chart.markers[1..] {
        assert_eq!(marker.anchor, TextAnchor::Middle);
        assert!(close(marker.label_position.y, marker.position.y - 12.0));
    }
}

/// Days with fewer than two events give an empty chart rather than failing.
#[test]
fn sparse_days_give_empty_charts() {
    let options = ChartOptions::default();

    let empty = TideChart::build(Vec::new(), &options);
    assert!(empty.is_empty());
    assert!(empty.stroke.is_empty() && empty.area.is_empty());

    let single = TideChart::build(
        vec![extremum(TideKind::High, "2025-07-24T06:00:00Z", 5.0)],
        &options,
    );
    assert!(single.is_empty(), "One event cannot make a curve");
    assert!(single.time_ticks.is_empty());
    assert!(
        single.markers.is_empty(),
        "A lone event has no scale to be placed on, got {:?}",
        single.markers
    );
    assert!(single.stroke.is_empty() && single.area.is_empty());
}

/// A narrow viewport shrinks the plot but keeps the right margin.
#[test]
fn viewport_width_drives_time_range() {
    let options = ChartOptions::for_viewport(400.0);
    let chart = TideChart::build(spring_day(), &options);
    let last = parse_timestamp("2025-07-25T00:00:00Z").unwrap();
    assert!(close(chart.time_scale.map(&last), 368.0 - 30.0));
}

/// The offline model feeds straight into the chart pipeline.
#[test]
fn offline_day_renders_a_chart() {
    let date = NaiveDate::from_ymd_opt(2025, 7, 24).unwrap();
    let day = fallback::approximate("0068", date, chrono::FixedOffset::east_opt(0).unwrap());
    assert!(day.offline, "Fallback days should be marked as offline");

    let chart = TideChart::build(day.extrema.clone(), &ChartOptions::default());
    assert!(!chart.is_empty());
    assert_eq!(chart.markers.len(), day.extrema.len());
}

/// Nearest-station lookup picks Dover for a point just off the harbour.
#[test]
fn nearest_station_to_dover_harbour() {
    let station = find_nearest(51.12, 1.33, UK_TIDE_STATIONS).unwrap();
    assert_eq!(station.name, "Dover");
    assert!(find_nearest(51.12, 1.33, &[]).is_none());
}
