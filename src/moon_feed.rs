//! # Override Feed Fetching and Caching
//!
//! This module fetches optional display overrides (rise/set clock times,
//! directions, illumination, age) from a higher-precision external JSON
//! feed. The engine never depends on it: on any failure the panel simply
//! shows the computed values.
//!
//! ## Data Source
//! - **URL**: configured in `[feed] url`; the feed is disabled when absent
//! - **Format**: a JSON object with any subset of the [`Overrides`] fields
//!
//! ```json
//! { "rise": "08:10", "set": "20:01", "illumination_percent": 13 }
//! ```
//!
//! ## Caching Strategy
//! - **Location**: `/tmp/moon_override_cache.json` by default (cleared on reboot)
//! - **TTL**: `[feed] cache_ttl_minutes`, checked against file modification time
//! - **Write failures**: ignored, the fetched value is still returned
//! - **Failures**: [`OverrideFeed`] stops asking the feed for one TTL after a
//!   failed fetch, so a dead feed costs one request per TTL rather than one
//!   per tick
//!
//! All errors propagate through [`FeedError`].

use crate::display::Overrides;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use std::{fs, io};
use thiserror::Error;

/// Default cache file location
pub const CACHE: &str = "/tmp/moon_override_cache.json";

/// Errors that can occur while fetching overrides.
#[derive(Error, Debug)]
pub enum FeedError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not a valid overrides object
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Cache file operations failed
    #[error("cache IO: {0}")]
    Cache(#[from] io::Error),
}

/// Fetch overrides from cache or the feed.
///
/// Cache-first: a cache file younger than `ttl` is returned without touching
/// the network.
pub async fn fetch(url: &str, cache: &Path, ttl: Duration) -> Result<Overrides, FeedError> {
    if let Ok(overrides) = load_cache(cache, ttl) {
        debug!("Override feed served from cache {}", cache.display());
        return Ok(overrides);
    }

    let overrides = download(url).await?;

    if let Err(e) = save_cache(cache, &overrides) {
        debug!("Could not write override cache: {}", e);
    }

    Ok(overrides)
}

/// Override feed with failure backoff, owned by the tick loop.
#[derive(Debug, Clone)]
pub struct OverrideFeed {
    url: Option<String>,
    cache: PathBuf,
    ttl: Duration,
    failed_at: Option<Instant>,
}

impl OverrideFeed {
    pub fn new(url: Option<String>, cache: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            url,
            cache: cache.into(),
            ttl,
            failed_at: None,
        }
    }

    /// When the last fetch failed, if it is still inside its backoff window.
    pub fn failed_at(&self) -> Option<Instant> {
        self.failed_at
    }

    /// Whether a fetch may be attempted at `now`.
    pub fn should_fetch(&self, now: Instant) -> bool {
        match self.failed_at {
            Some(failed) => now.saturating_duration_since(failed) >= self.ttl,
            None => true,
        }
    }

    /// Current overrides, or none at all when the feed is disabled, failing,
    /// or backing off after a failure.
    pub async fn overrides(&mut self) -> Overrides {
        let Some(url) = self.url.as_deref() else {
            return Overrides::default();
        };
        let now = Instant::now();
        if !self.should_fetch(now) {
            debug!("Override feed backing off after a failure");
            return Overrides::default();
        }

        match fetch(url, &self.cache, self.ttl).await {
            Ok(overrides) => {
                self.failed_at = None;
                overrides
            }
            Err(error) => {
                warn!(
                    "Override feed unavailable, retrying in {}s: {}",
                    self.ttl.as_secs(),
                    error
                );
                self.failed_at = Some(now);
                Overrides::default()
            }
        }
    }
}

// -- Private Implementation --

async fn download(url: &str) -> Result<Overrides, FeedError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;
    let overrides = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Overrides>()
        .await?;
    Ok(overrides)
}

/// Load overrides from the cache file if still valid.
fn load_cache(path: &Path, ttl: Duration) -> Result<Overrides, FeedError> {
    let meta = fs::metadata(path)?;

    let age = SystemTime::now()
        .duration_since(meta.modified()?)
        .map_err(|_| io::Error::other("time error"))?;

    if age > ttl {
        return Err(io::Error::other("stale").into());
    }

    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

fn save_cache(path: &Path, overrides: &Overrides) -> Result<(), FeedError> {
    let data = serde_json::to_vec(overrides)?;
    fs::write(path, data)?;
    Ok(())
}
