//! # Moon Tracker Core Library
//!
//! This library provides the celestial position and timing engine behind the
//! moon panel of the weather dashboard. Given an instant and an observer's
//! coordinates it computes the Moon's phase and illumination, its current
//! altitude and azimuth, the times it crosses the local horizon today, and a
//! normalized "how far along its visible arc" value for the display marker.
//!
//! ## Design Philosophy
//!
//! ### Pure Engine
//! - **Total functions**: every engine call maps explicit inputs to outputs,
//!   with no I/O and no error returns
//! - **Value types**: all results are small `Copy` structs, recomputed rather
//!   than mutated
//! - **One cache**: the only retained state is the day's [`horizon::HorizonCrossing`],
//!   owned by [`tracker::MoonTracker`] and refreshed on day or location change
//!
//! ### Precision Band
//! The model targets a consumer display. Rise and set times are expected to
//! land within a few minutes of published almanac values; positions are good
//! to roughly a degree.
//!
//! ### Data Flow
//! 1. **Tick**: scheduler supplies `now` (about once per minute)
//! 2. **Engine**: phase → position → (cached) horizon crossings → arc progress
//! 3. **Boundary**: optional feed overrides merged over computed display fields
//! 4. **Render**: ASCII panel in development mode
//!
//! ## Core Types
//! - [`Instant`]: an absolute UTC point in time
//! - [`GeoCoordinate`]: observer latitude/longitude in degrees

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod arc;
pub mod config;
pub mod display;
pub mod horizon;
pub mod julian;
pub mod lunar;
pub mod moon_feed;
pub mod position;
pub mod renderer;
pub mod tracker;

/// An absolute point in time. Local civil time is derived with a
/// [`chrono::FixedOffset`] where needed.
pub type Instant = DateTime<Utc>;

/// Observer location on the Earth's surface.
///
/// Latitude is expected in [-90, 90] and longitude in [-180, 180], east
/// positive. The engine does not validate these; [`config::Config::validate`]
/// does at the edge.
///
/// # Example
/// ```
/// use moon_tracker_lib::GeoCoordinate;
///
/// let chiba = GeoCoordinate::new(35.78, 139.88);
/// assert_eq!(chiba.latitude, 35.78);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Degrees north of the equator
    pub latitude: f64,
    /// Degrees east of Greenwich
    pub longitude: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Reduce an angle in degrees to [0, 360).
pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}
