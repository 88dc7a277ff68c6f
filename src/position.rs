//! Low-precision lunar sky position.
//!
//! Mean elements with a single equation-of-centre term give the ecliptic
//! longitude to within a degree or two; that is rotated into equatorial and
//! then horizontal coordinates for the observer. The result is geocentric:
//! no parallax or refraction is applied here. The horizon search applies
//! its own fixed correction instead.

use crate::julian::{to_julian_date, JulianDate};
use crate::{normalize_degrees, GeoCoordinate, Instant};
use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Amplitude of the main elliptic term in ecliptic longitude, degrees.
const EQUATION_OF_CENTRE: f64 = 6.29;

/// Amplitude of the main term in ecliptic latitude, degrees.
const LATITUDE_AMPLITUDE: f64 = 5.13;

/// Intermediate ecliptic and equatorial angles, all in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LunarCoordinates {
    /// λ in [0, 360)
    pub ecliptic_longitude: f64,
    /// β; reported only, the equatorial rotation assumes β = 0
    pub ecliptic_latitude: f64,
    /// ε
    pub obliquity: f64,
    /// α in [0, 360)
    pub right_ascension: f64,
    /// δ
    pub declination: f64,
}

/// Where the Moon is in the observer's sky.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    /// Degrees above the horizon (negative below)
    pub altitude: f64,
    /// Degrees east of north, in [0, 360)
    pub azimuth: f64,
    /// Coarse estimate of today's culmination, clamped to [0, 90]
    pub estimated_max_altitude: f64,
    pub declination: f64,
    pub right_ascension: f64,
}

/// Ecliptic and equatorial coordinates at a Julian Date.
pub fn lunar_coordinates(jd: JulianDate) -> LunarCoordinates {
    let t = jd.centuries_since_j2000();

    let mean_longitude = normalize_degrees(218.316 + 481_267.881 * t);
    let mean_anomaly = normalize_degrees(134.963 + 477_198.867 * t);
    let arg_latitude = normalize_degrees(93.272 + 483_202.017 * t);

    let lambda =
        normalize_degrees(mean_longitude + EQUATION_OF_CENTRE * mean_anomaly.to_radians().sin());
    let beta = LATITUDE_AMPLITUDE * arg_latitude.to_radians().sin();

    let obliquity = 23.439 - 0.000_000_4 * jd.days_since_j2000();

    let (sin_l, cos_l) = lambda.to_radians().sin_cos();
    let (sin_e, cos_e) = obliquity.to_radians().sin_cos();
    let declination = (sin_e * sin_l).asin().to_degrees();
    let right_ascension = normalize_degrees((cos_e * sin_l).atan2(cos_l).to_degrees());

    LunarCoordinates {
        ecliptic_longitude: lambda,
        ecliptic_latitude: beta,
        obliquity,
        right_ascension,
        declination,
    }
}

/// Local sidereal time in degrees.
///
/// The `0.985647·d` term is the daily drift of sidereal against solar time.
/// The Earth's rotation through the day comes from `15°·h + 0.25°·m`, with
/// seconds folded into `m`.
pub fn local_sidereal_time(instant: Instant, jd: JulianDate, longitude: f64) -> f64 {
    let minutes = instant.minute() as f64 + instant.second() as f64 / 60.0;
    normalize_degrees(
        100.46
            + 0.985_647 * jd.days_since_j2000()
            + longitude
            + 15.0 * instant.hour() as f64
            + 0.25 * minutes,
    )
}

/// Altitude and azimuth of the Moon for `observer` at `instant`.
pub fn position_of(instant: Instant, observer: GeoCoordinate) -> SkyPosition {
    let jd = to_julian_date(instant);
    let coords = lunar_coordinates(jd);

    let lst = local_sidereal_time(instant, jd, observer.longitude);
    let hour_angle = normalize_degrees(lst - coords.right_ascension);

    let (sin_phi, cos_phi) = observer.latitude.to_radians().sin_cos();
    let dec = coords.declination.to_radians();
    let (sin_ha, cos_ha) = hour_angle.to_radians().sin_cos();

    let altitude = (sin_phi * dec.sin() + cos_phi * dec.cos() * cos_ha)
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees();
    let azimuth = normalize_degrees(
        sin_ha
            .atan2(cos_ha * sin_phi - dec.tan() * cos_phi)
            .to_degrees()
            + 180.0,
    );

    SkyPosition {
        altitude,
        azimuth,
        estimated_max_altitude: (90.0 - observer.latitude + coords.declination).clamp(0.0, 90.0),
        declination: coords.declination,
        right_ascension: coords.right_ascension,
    }
}
