//! # UK Tide Times Application Entry Point
//!
//! This binary crate provides the command-line front-end: it resolves a
//! station, fetches the day's tide events (or approximates them offline),
//! builds the tide chart and prints it as a table and character plot, as
//! JSON, or as an SVG file.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use std::env;
use std::fs;
use tide_times_lib::config::Config;
use tide_times_lib::stations::{self, TideStation, UK_TIDE_STATIONS};
use tide_times_lib::tide_data::TideClient;
use tide_times_lib::{fallback, renderer, TideChart};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "usage: uk-tide-times [--station ID|NAME] [--near LAT,LON] [--date YYYY-MM-DD] \
[--search QUERY] [--svg PATH] [--offline] [--json] [--verbose]";

/// Parsed command-line options.
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub station: Option<String>,
    pub near: Option<(f64, f64)>,
    pub date: Option<NaiveDate>,
    pub search: Option<String>,
    pub svg: Option<String>,
    pub offline: bool,
    pub json: bool,
    pub verbose: bool,
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("{} needs a value\n{}", flag, USAGE))
            };
            match arg.as_str() {
                "--station" => parsed.station = Some(value("--station")?),
                "--near" => parsed.near = Some(parse_coordinates(&value("--near")?)?),
                "--date" => {
                    let raw = value("--date")?;
                    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .with_context(|| format!("invalid date '{}'", raw))?;
                    parsed.date = Some(date);
                }
                "--search" => parsed.search = Some(value("--search")?),
                "--svg" => parsed.svg = Some(value("--svg")?),
                "--offline" => parsed.offline = true,
                "--json" => parsed.json = true,
                "--verbose" | "-v" => parsed.verbose = true,
                other => bail!("unknown argument '{}'\n{}", other, USAGE),
            }
        }

        Ok(parsed)
    }
}

/// Parse "LAT,LON" in decimal degrees.
pub fn parse_coordinates(raw: &str) -> anyhow::Result<(f64, f64)> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("expected LAT,LON, got '{}'", raw))?;
    let lat: f64 = lat.trim().parse().context("invalid latitude")?;
    let lon: f64 = lon.trim().parse().context("invalid longitude")?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        bail!("coordinates out of range: {},{}", lat, lon);
    }
    Ok((lat, lon))
}

/// The station a run is for.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedStation {
    pub id: String,
    pub name: String,
}

impl From<&TideStation> for SelectedStation {
    fn from(station: &TideStation) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.to_string(),
        }
    }
}

/// Pick the station: explicit id or name, then nearest to a position, then
/// the configured default.
pub fn select_station(args: &CliArgs, config: &Config) -> anyhow::Result<SelectedStation> {
    if let Some(wanted) = &args.station {
        return stations::resolve(wanted)
            .map(SelectedStation::from)
            .ok_or_else(|| anyhow!("unknown station '{}' (try --search)", wanted));
    }

    if let Some((lat, lon)) = args.near {
        let station = stations::find_nearest(lat, lon, UK_TIDE_STATIONS)
            .ok_or_else(|| anyhow!("no stations available"))?;
        info!(station = station.name, "nearest station to {},{}", lat, lon);
        return Ok(station.into());
    }

    // Configured stations outside the directory still work with the feed
    if stations::find_by_id(&config.station.id).is_none() {
        warn!(id = %config.station.id, "configured station not in directory");
    }
    Ok(SelectedStation {
        id: config.station.id.clone(),
        name: config.station.name.clone(),
    })
}

fn print_search(query: &str) {
    let matches = stations::search(query);
    if matches.is_empty() {
        println!("No stations match '{}'", query);
        return;
    }
    for station in matches {
        println!("{}  {:<28} {}", station.id, station.name, station.region);
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse(env::args().skip(1))?;

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    if let Some(query) = &args.search {
        print_search(query);
        return Ok(());
    }

    let config = Config::load();
    let station = select_station(&args, &config)?;
    let offset = config.display.utc_offset();
    let date = args
        .date
        .unwrap_or_else(|| Local::now().with_timezone(&offset).date_naive());

    let day = if args.offline {
        info!("offline mode, using approximate tide times");
        fallback::approximate(&station.id, date, offset)
    } else {
        // Create Tokio runtime for async operations
        let rt = tokio::runtime::Runtime::new()?;
        let fetched = TideClient::from_config(&config)
            .and_then(|client| rt.block_on(client.fetch_day(&station.id, date)));

        match fetched {
            Ok(day) if !day.extrema.is_empty() => day,
            Ok(_) => {
                warn!(station = %station.id, %date, "feed has no events for this date");
                warn!("falling back to offline model");
                fallback::approximate(&station.id, date, offset)
            }
            Err(error) => {
                warn!("tide data fetch failed: {}", error);
                warn!("falling back to offline model");
                fallback::approximate(&station.id, date, offset)
            }
        }
    };

    let options = config.display.chart_options();
    let chart = TideChart::build(day.extrema.clone(), &options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
    } else {
        renderer::draw_ascii(&station.name, &day, &chart);
    }

    if let Some(path) = &args.svg {
        let svg = renderer::render_svg(&chart, options.width, options.height);
        fs::write(path, svg).with_context(|| format!("writing {}", path))?;
        info!(path = %path, "wrote SVG chart");
    }

    Ok(())
}
