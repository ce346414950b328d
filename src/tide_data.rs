//! # Tidal Event Fetching and Caching
//!
//! This module handles all network operations for fetching high and low
//! water predictions from the UK tidal events API. It includes a per-station
//! cache to minimize network requests and validates every event into a typed
//! [`TideExtremum`] at the boundary.
//!
//! ## Data Source
//!
//! - **Endpoint**: `{api_url}/Stations/{station}/TidalEvents?duration={days}`
//! - **Auth**: `Ocp-Apim-Subscription-Key` header
//! - **Format**: JSON array of events:
//!
//! ```json
//! [{ "EventType": "HighWater", "DateTime": "2025-07-24T05:32:00",
//!    "IsDateApproximated": false, "Height": 6.1, "IsHeightApproximated": false }]
//! ```
//!
//! Timestamps without an offset are UTC. Events are converted to the
//! configured display offset before being grouped by calendar date.
//!
//! ## Caching Strategy
//! - **Location**: `{cache_dir}/tide_cache_{station}.json`
//! - **Format**: the raw event array, as received
//! - **TTL**: file modification time checked against the configured TTL
//! - **Miss**: a stale, missing, corrupt cache, or one without the requested
//!   date, triggers a network fetch
//!
//! All errors propagate through [`TideError`]; callers fall back to
//! [`crate::fallback::approximate`].

use crate::config::{Config, API_KEY_ENV};
use crate::{IngestError, TideDay, TideExtremum};
use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use std::{fs, io};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while fetching and validating tidal events.
#[derive(Error, Debug)]
pub enum TideError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No subscription key in the environment or the config file
    #[error("no API key configured (set {} or source.api_key)", API_KEY_ENV)]
    MissingApiKey,

    /// The feed returned an event we cannot interpret
    #[error("bad tide event: {0}")]
    Ingest(#[from] IngestError),

    /// Cache file operations failed (permissions, disk space, corruption)
    #[error("cache IO: {0}")]
    Cache(#[from] io::Error),
}

/// HTTP timeout for the whole request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One event as the feed sends it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTideEvent {
    pub event_type: String,
    pub date_time: String,
    pub height: f64,
    #[serde(default, alias = "IsHeightApproximated")]
    pub is_approximate_height: bool,
    #[serde(default, alias = "IsDateApproximated")]
    pub is_approximate_time: bool,
}

impl RawTideEvent {
    pub fn to_extremum(&self) -> Result<TideExtremum, IngestError> {
        TideExtremum::parse(self.event_type.parse()?, &self.date_time, self.height)
    }
}

/// Validate `events` and keep those on `date` as seen in `offset`.
///
/// Any invalid event rejects the whole payload.
pub fn extrema_for_date(
    events: &[RawTideEvent],
    date: NaiveDate,
    offset: FixedOffset,
) -> Result<Vec<TideExtremum>, IngestError> {
    let mut extrema = Vec::new();
    for event in events {
        let mut extremum = event.to_extremum()?;
        extremum.time = extremum.time.with_timezone(&offset);
        if extremum.time.date_naive() == date {
            extrema.push(extremum);
        }
    }
    Ok(extrema)
}

/// Client for the tidal events API with a file cache in front of it.
pub struct TideClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    duration_days: u32,
    cache_dir: PathBuf,
    ttl: Duration,
    offset: FixedOffset,
}

impl TideClient {
    pub fn from_config(config: &Config) -> Result<Self, TideError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url: config.source.api_url.trim_end_matches('/').to_string(),
            api_key: config.source.resolved_api_key(),
            duration_days: config.source.duration_days.max(1),
            cache_dir: PathBuf::from(&config.source.cache_dir),
            ttl: Duration::from_secs(config.source.cache_ttl_minutes * 60),
            offset: config.display.utc_offset(),
        })
    }

    /// Fetch one station's extrema for `date`, cache first.
    ///
    /// # Returns
    /// - `Ok(TideDay)`: events for the date (possibly none if the feed does
    ///   not cover it)
    /// - `Err(TideError)`: network, payload, or missing key
    pub async fn fetch_day(&self, station_id: &str, date: NaiveDate) -> Result<TideDay, TideError> {
        let cache = self.cache_path(station_id);

        // Try cache first - much faster than network fetch
        if let Ok(events) = load_cache(&cache, self.ttl) {
            let extrema = extrema_for_date(&events, date, self.offset)?;
            if !extrema.is_empty() {
                debug!(station = station_id, %date, "serving tide events from cache");
                return Ok(self.day(station_id, date, extrema));
            }
        }

        let events = self.request(station_id).await?;

        // Save for future requests (ignore cache write failures)
        if let Err(err) = save_cache(&cache, &events) {
            debug!("could not write tide cache: {}", err);
        }

        let extrema = extrema_for_date(&events, date, self.offset)?;
        Ok(self.day(station_id, date, extrema))
    }

    async fn request(&self, station_id: &str) -> Result<Vec<RawTideEvent>, TideError> {
        let key = self.api_key.as_deref().ok_or(TideError::MissingApiKey)?;
        let url = format!("{}/Stations/{}/TidalEvents", self.api_url, station_id);

        info!(station = station_id, days = self.duration_days, "fetching tidal events");
        let events = self
            .http
            .get(&url)
            .query(&[("duration", self.duration_days)])
            .header("Ocp-Apim-Subscription-Key", key)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RawTideEvent>>()
            .await?;

        info!(station = station_id, events = events.len(), "received tidal events");
        Ok(events)
    }

    fn day(&self, station_id: &str, date: NaiveDate, extrema: Vec<TideExtremum>) -> TideDay {
        TideDay {
            station_id: station_id.to_string(),
            date,
            extrema,
            offline: false,
        }
    }

    fn cache_path(&self, station_id: &str) -> PathBuf {
        let safe: String = station_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        self.cache_dir.join(format!("tide_cache_{}.json", safe))
    }
}

/// Load cached events if the file is younger than `ttl`.
///
/// Returns an error for stale, missing, or corrupted cache files.
pub fn load_cache(path: &Path, ttl: Duration) -> Result<Vec<RawTideEvent>, io::Error> {
    let meta = fs::metadata(path)?;

    // Check if cache has expired based on file modification time
    let age = SystemTime::now()
        .duration_since(meta.modified()?)
        .map_err(|_| io::Error::other("time error"))?;

    if age > ttl {
        return Err(io::Error::other("stale"));
    }

    let data = fs::read(path)?;
    let events = serde_json::from_slice(&data)?;

    Ok(events)
}

/// Save events to the cache file. Failure is non-fatal for callers.
pub fn save_cache(path: &Path, events: &[RawTideEvent]) -> Result<(), io::Error> {
    let data = serde_json::to_vec(events)?;
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TideKind;
    use tempfile::{NamedTempFile, TempDir};

    const PAYLOAD: &str = r#"[
        {"EventType": "LowWater", "DateTime": "2025-07-23T23:40:00", "IsDateApproximated": false,
         "Height": 0.9, "IsHeightApproximated": false, "Filtered": false},
        {"EventType": "HighWater", "DateTime": "2025-07-24T05:32:00", "IsDateApproximated": false,
         "Height": 6.1, "IsHeightApproximated": false, "Filtered": false},
        {"EventType": "LowWater", "DateTime": "2025-07-24T11:58:00.5", "Height": 1.2},
        {"EventType": "HighWater", "DateTime": "2025-07-24T23:30:00", "Height": 6.3}
    ]"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn events() -> Vec<RawTideEvent> {
        serde_json::from_str(PAYLOAD).unwrap()
    }

    #[test]
    fn test_payload_parses_both_flag_spellings() {
        let events = events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].event_type, "LowWater");
        assert!(!events[0].is_approximate_height);

        let app_style: RawTideEvent = serde_json::from_str(
            r#"{"EventType": "high", "DateTime": "2025-07-24T05:32:00Z", "Height": 6.1,
                "IsApproximateHeight": true, "IsApproximateTime": false}"#,
        )
        .unwrap();
        assert!(app_style.is_approximate_height);
        assert_eq!(app_style.to_extremum().unwrap().kind, TideKind::High);
    }

    #[test]
    fn test_extrema_grouped_by_utc_date() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let extrema = extrema_for_date(&events(), date(2025, 7, 24), utc).unwrap();
        let heights: Vec<f64> = extrema.iter().map(|e| e.height_m).collect();
        assert_eq!(heights, vec![6.1, 1.2, 6.3]);
    }

    #[test]
    fn test_extrema_grouped_by_local_date() {
        // In BST the 23:40 UTC low water belongs to the 24th, the 23:30 high to the 25th
        let bst = FixedOffset::east_opt(3600).unwrap();
        let extrema = extrema_for_date(&events(), date(2025, 7, 24), bst).unwrap();
        let heights: Vec<f64> = extrema.iter().map(|e| e.height_m).collect();
        assert_eq!(heights, vec![0.9, 6.1, 1.2]);
        assert_eq!(extrema[0].time.format("%H:%M").to_string(), "00:40");
    }

    #[test]
    fn test_unknown_event_rejects_payload() {
        let mut events = events();
        events[2].event_type = "Slack".to_string();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(matches!(
            extrema_for_date(&events, date(2025, 7, 24), utc),
            Err(IngestError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_cache_roundtrip() {
        let temp_file = NamedTempFile::new().unwrap();
        let events = events();

        save_cache(temp_file.path(), &events).unwrap();
        let loaded = load_cache(temp_file.path(), Duration::from_secs(1800)).unwrap();

        assert_eq!(loaded, events);
    }

    #[test]
    fn test_stale_and_corrupt_cache_are_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        save_cache(temp_file.path(), &events()).unwrap();

        let an_hour_ago = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(temp_file.path())
            .unwrap()
            .set_modified(an_hour_ago)
            .unwrap();
        assert!(load_cache(temp_file.path(), Duration::from_secs(1800)).is_err());

        fs::write(temp_file.path(), b"not json").unwrap();
        assert!(load_cache(temp_file.path(), Duration::from_secs(1800)).is_err());
    }

    fn client_with_cache(dir: &TempDir, api_key: Option<&str>) -> TideClient {
        let mut config = Config::default();
        config.source.cache_dir = dir.path().to_string_lossy().into_owned();
        config.source.api_key = api_key.map(str::to_string);
        let mut client = TideClient::from_config(&config).unwrap();
        // Ignore any key in the test environment
        client.api_key = api_key.map(str::to_string);
        client
    }

    #[tokio::test]
    async fn test_fetch_day_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let client = client_with_cache(&dir, None);
        save_cache(&client.cache_path("0113"), &events()).unwrap();

        let day = client.fetch_day("0113", date(2025, 7, 24)).await.unwrap();
        assert!(!day.offline);
        assert_eq!(day.station_id, "0113");
        assert_eq!(day.extrema.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_day_without_key_or_cache_fails() {
        let dir = TempDir::new().unwrap();
        let client = client_with_cache(&dir, None);

        let result = client.fetch_day("0113", date(2025, 7, 24)).await;
        assert!(matches!(result, Err(TideError::MissingApiKey)));
    }

    #[test]
    fn test_cache_path_is_sanitized() {
        let dir = TempDir::new().unwrap();
        let client = client_with_cache(&dir, None);
        let path = client.cache_path("../01/13");
        assert_eq!(path, dir.path().join("tide_cache_0113.json"));
    }
}
