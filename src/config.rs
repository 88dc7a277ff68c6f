//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the moon-config.toml file.
//! It provides the observer location, the local civil offset used to define
//! "today", display refresh settings and the optional override feed.

use crate::GeoCoordinate;
use chrono::{FixedOffset, Offset, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "moon-config.toml";

/// Reasons a configuration cannot be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),

    #[error("UTC offset {0}h outside [-12, 14]")]
    Offset(i32),

    #[error("refresh interval must be at least one second")]
    Refresh,

    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from moon-config.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Where the Moon is observed from
    pub observer: ObserverConfig,
    /// Display and UI configuration
    pub display: DisplayConfig,
    /// Optional higher-precision override feed
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Observer location and civil time zone
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObserverConfig {
    /// Human-readable place name for the panel header
    pub name: String,
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
    /// Whole-hour offset of local civil time from UTC (no DST)
    pub utc_offset_hours: i32,
}

/// Display and refresh configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Seconds between scheduler ticks
    pub refresh_seconds: u64,
    /// Width of the ASCII arc in characters
    pub arc_width: usize,
}

/// Override feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// JSON endpoint with rise/set/illumination overrides; disabled when absent
    pub url: Option<String>,
    /// Cache TTL in minutes
    #[serde(default = "default_feed_ttl")]
    pub cache_ttl_minutes: u64,
}

fn default_feed_ttl() -> u64 {
    30
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            url: None,
            cache_ttl_minutes: default_feed_ttl(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            observer: ObserverConfig {
                name: "Chiba, JP".to_string(),
                latitude: 35.78,
                longitude: 139.88,
                utc_offset_hours: 9,
            },
            display: DisplayConfig {
                refresh_seconds: 60,
                arc_width: 48,
            },
            feed: FeedConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from moon-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load(&path) {
            Ok(config) => {
                info!("Loaded configuration for observer: {}", config.observer.name);
                config
            }
            Err(ConfigError::Io(_)) => {
                info!("No config file found, using default configuration (Chiba, JP)");
                Self::default()
            }
            Err(e) => {
                warn!("Unusable config file {}: {}", path.as_ref().display(), e);
                warn!("Using default configuration (Chiba, JP)");
                Self::default()
            }
        }
    }

    /// Load and validate without falling back
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges the engine assumes but does not enforce
    pub fn validate(&self) -> Result<(), ConfigError> {
        let o = &self.observer;
        if !(-90.0..=90.0).contains(&o.latitude) {
            return Err(ConfigError::Latitude(o.latitude));
        }
        if !(-180.0..=180.0).contains(&o.longitude) {
            return Err(ConfigError::Longitude(o.longitude));
        }
        if !(-12..=14).contains(&o.utc_offset_hours) {
            return Err(ConfigError::Offset(o.utc_offset_hours));
        }
        if self.display.refresh_seconds == 0 {
            return Err(ConfigError::Refresh);
        }
        Ok(())
    }

    /// Save current configuration to the given path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn observer(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.observer.latitude, self.observer.longitude)
    }

    /// Local civil offset. Out-of-range values (only reachable by skipping
    /// `validate`) fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.observer.utc_offset_hours * 3600).unwrap_or(Utc.fix())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.display.refresh_seconds)
    }

    pub fn feed_ttl(&self) -> Duration {
        Duration::from_secs(self.feed.cache_ttl_minutes * 60)
    }
}
