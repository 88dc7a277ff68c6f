//! Moonrise and moonset search.
//!
//! The Moon's altitude is sampled once a minute from local midnight through
//! the following midnight, and every change of sign is located by linear
//! interpolation between the two bracketing samples. A fixed correction lowers the geocentric altitude
//! to what an observer on the ground sees at the horizon.
//!
//! ## Edge cases
//! - A rise with no later set that day sets `set_is_next_day`; tomorrow's
//!   search finds the set.
//! - Neither crossing is a valid outcome (the Moon stays up, or stays down,
//!   for the whole day at high latitudes).
//! - Without an azimuth the direction label falls back to a coarse guess from
//!   the moon's age; see [`rise_direction`].

use crate::lunar::HALF_MONTH_AGE;
use crate::position::position_of;
use crate::{normalize_degrees, GeoCoordinate, Instant};
use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Added to the geocentric altitude before testing its sign, degrees.
///
/// Empirical fit: combines lunar parallax (~0.95°) with the disc and
/// refraction terms well enough for minute-level rise/set times at mid
/// northern latitudes. Not validated elsewhere.
pub const PARALLAX_CORRECTION: f64 = -0.95;

/// One-minute intervals per local day. The last one closes on the next
/// midnight, so every minute of the day is searched exactly once.
pub const SAMPLES_PER_DAY: i64 = 1440;

const STEP_SECONDS: i64 = 60;

/// Result of one day's horizon search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizonCrossing {
    /// Local midnight the search started from, as UTC
    pub anchor: Instant,
    /// First rise of the day
    pub rise: Option<Instant>,
    /// First set of the day; may precede `rise` when the Moon rose yesterday
    pub set: Option<Instant>,
    pub rise_azimuth: Option<f64>,
    pub set_azimuth: Option<f64>,
    /// A rise was found and the set that ends it falls on the next local day
    pub set_is_next_day: bool,
    /// Yesterday's rise, when yesterday's set spilled into this day. Filled
    /// in by [`crate::tracker::MoonTracker`]; always `None` from
    /// [`crossings_for`].
    pub prior_rise: Option<Instant>,
}

impl HorizonCrossing {
    /// True when a set was recorded before the rise, i.e. the morning end of
    /// an arc that began the previous day.
    pub fn has_morning_set(&self) -> bool {
        match (self.rise, self.set) {
            (Some(rise), Some(set)) => set < rise,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

/// One altitude/azimuth sample with the horizon correction applied.
#[derive(Clone, Copy, Debug)]
struct Sample {
    at: Instant,
    altitude: f64,
    azimuth: f64,
}

fn sample(at: Instant, observer: GeoCoordinate) -> Sample {
    let pos = position_of(at, observer);
    Sample {
        at,
        altitude: pos.altitude + PARALLAX_CORRECTION,
        azimuth: pos.azimuth,
    }
}

/// Altitude as used by the horizon test: geocentric altitude plus
/// [`PARALLAX_CORRECTION`].
pub fn corrected_altitude(at: Instant, observer: GeoCoordinate) -> f64 {
    sample(at, observer).altitude
}

/// UTC instant of local midnight starting `day` at `offset`.
pub fn local_midnight(day: NaiveDate, offset: FixedOffset) -> Instant {
    let local = day.and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&(local - Duration::seconds(offset.local_minus_utc() as i64)))
}

/// Interpolated crossing between two samples whose altitudes straddle zero.
fn interpolate(prev: &Sample, cur: &Sample) -> (Instant, f64) {
    let span = prev.altitude - cur.altitude;
    let frac = if span == 0.0 {
        0.0
    } else {
        (prev.altitude / span).clamp(0.0, 1.0)
    };
    let at = prev.at + Duration::milliseconds((frac * (STEP_SECONDS * 1000) as f64).round() as i64);
    (at, lerp_azimuth(prev.azimuth, cur.azimuth, frac))
}

/// Interpolate along the short way round the circle.
fn lerp_azimuth(from: f64, to: f64, frac: f64) -> f64 {
    let delta = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    normalize_degrees(from + delta * frac)
}

/// Search `local_day` for the Moon's first rise and first set at `observer`.
pub fn crossings_for(
    local_day: NaiveDate,
    offset: FixedOffset,
    observer: GeoCoordinate,
) -> HorizonCrossing {
    let anchor = local_midnight(local_day, offset);

    let mut rise = None;
    let mut set = None;
    let mut prev = sample(anchor, observer);

    for step in 1..=SAMPLES_PER_DAY {
        let cur = sample(anchor + Duration::seconds(step * STEP_SECONDS), observer);

        if rise.is_none() && prev.altitude < 0.0 && cur.altitude >= 0.0 {
            rise = Some(interpolate(&prev, &cur));
        } else if set.is_none() && prev.altitude >= 0.0 && cur.altitude < 0.0 {
            set = Some(interpolate(&prev, &cur));
        }

        if rise.is_some() && set.is_some() {
            break;
        }
        prev = cur;
    }

    let rise_at = rise.map(|(at, _)| at);
    let set_at = set.map(|(at, _)| at);
    let set_is_next_day = match (rise_at, set_at) {
        (Some(r), Some(s)) => s < r,
        (Some(_), None) => true,
        _ => false,
    };

    HorizonCrossing {
        anchor,
        rise: rise_at,
        set: set_at,
        rise_azimuth: rise.map(|(_, az)| az),
        set_azimuth: set.map(|(_, az)| az),
        set_is_next_day,
        prior_rise: None,
    }
}

#[rustfmt::skip]
const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

/// Sixteen-point compass name for an azimuth in degrees.
pub fn compass_point(azimuth: f64) -> &'static str {
    let idx = (normalize_degrees(azimuth + 11.25) / 22.5).floor() as usize;
    COMPASS_POINTS[idx % COMPASS_POINTS.len()]
}

/// Direction label for the rise. Falls back to ESE before full moon and ENE
/// after when no azimuth was found.
pub fn rise_direction(crossing: &HorizonCrossing, age_days: f64) -> &'static str {
    match crossing.rise_azimuth {
        Some(az) => compass_point(az),
        None if age_days < HALF_MONTH_AGE => "ESE",
        None => "ENE",
    }
}

/// Direction label for the set. Falls back to WSW before full moon and WNW
/// after when no azimuth was found.
pub fn set_direction(crossing: &HorizonCrossing, age_days: f64) -> &'static str {
    match crossing.set_azimuth {
        Some(az) => compass_point(az),
        None if age_days < HALF_MONTH_AGE => "WSW",
        None => "WNW",
    }
}
