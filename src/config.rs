//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! tide-config.toml file. It provides a centralized way to configure the
//! default station, chart layout, and the tide feed.

use crate::chart::ChartOptions;
use crate::scale::{HeightDomain, Margins};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "tide-config.toml";

/// Environment variable that overrides `source.api_key`.
pub const API_KEY_ENV: &str = "ADMIRALTY_API_KEY";

/// Application configuration loaded from tide-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Station shown when none is given on the command line
    pub station: StationConfig,
    /// Chart layout configuration
    pub display: DisplayConfig,
    /// Tide feed and cache configuration
    pub source: SourceConfig,
}

/// Default tide station
#[derive(Debug, Deserialize, Serialize)]
pub struct StationConfig {
    /// Admiralty station ID (e.g., "0113" for London Bridge)
    pub id: String,
    /// Human-readable station name for reference
    pub name: String,
}

/// Chart layout and labelling configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Chart width in pixels (capped at 600)
    pub width: f64,
    /// Chart height in pixels
    pub height: f64,
    /// Interpolated samples between two consecutive tide events
    pub steps: usize,
    /// Approximate number of height axis ticks
    pub height_ticks: usize,
    /// Round the height axis outward to whole tick steps
    pub nice_domain: bool,
    /// Minutes east of UTC used for times and day boundaries (60 for BST)
    pub utc_offset_minutes: i32,
    /// Marker labels closer than this to the left margin are left-aligned
    pub marker_edge_threshold: f64,
    /// Plot area margins in pixels
    pub margins: Margins,
    /// Zero-based or padded height axis
    pub height_domain: HeightDomain,
}

/// Tide feed configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Base URL of the UK tidal events API
    pub api_url: String,
    /// Subscription key; `ADMIRALTY_API_KEY` takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Days of events requested per fetch
    pub duration_days: u32,
    /// Directory holding per-station cache files
    pub cache_dir: String,
    /// Cache TTL in minutes
    pub cache_ttl_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            station: StationConfig {
                id: "0113".to_string(),
                name: "London Bridge".to_string(),
            },
            display: DisplayConfig {
                width: 600.0,
                height: 200.0,
                steps: 50,
                height_ticks: 5,
                nice_domain: false,
                utc_offset_minutes: 0,
                marker_edge_threshold: 20.0,
                margins: Margins::default(),
                height_domain: HeightDomain::ZeroBased,
            },
            source: SourceConfig {
                api_url: "https://admiraltyapi.azure-api.net/uktidalapi/api/V1".to_string(),
                api_key: None,
                duration_days: 7,
                cache_dir: "/tmp".to_string(),
                cache_ttl_minutes: 30,
            },
        }
    }
}

impl Config {
    /// Load configuration from tide-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(station = %config.station.name, "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!("invalid config file format: {}", e);
                    warn!("using default configuration (London Bridge)");
                    Self::default()
                }
            },
            Err(_) => {
                info!("no config file found, using default configuration (London Bridge)");
                Self::default()
            }
        }
    }

    /// Save current configuration to `path`
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Save current configuration to tide-config.toml
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(CONFIG_FILE)
    }
}

impl DisplayConfig {
    /// Chart options for this layout.
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            height: self.height,
            margins: self.margins,
            steps: self.steps,
            height_domain: self.height_domain,
            nice_domain: self.nice_domain,
            height_tick_count: self.height_ticks,
            marker_edge_threshold: self.marker_edge_threshold,
            ..ChartOptions::default()
        }
        .with_width(self.width)
    }

    /// The configured UTC offset, or UTC if it is out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

impl SourceConfig {
    /// API key from the environment, falling back to the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}
