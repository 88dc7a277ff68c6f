//! Calendar instant → Julian Date.
//!
//! Standard Gregorian formula (Meeus ch. 7): January and February are treated
//! as months 13 and 14 of the previous year so the century leap-year
//! correction lands in the right place.

use crate::Instant;
use chrono::{Datelike, Timelike};

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT, treated as UTC here).
pub const J2000: f64 = 2_451_545.0;

/// Days in a Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Continuous day count; one unit is 24 hours.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct JulianDate(pub f64);

impl JulianDate {
    /// Days elapsed since J2000.0 (negative before it).
    pub fn days_since_j2000(self) -> f64 {
        self.0 - J2000
    }

    /// Julian centuries since J2000.0, the `T` of most series expansions.
    pub fn centuries_since_j2000(self) -> f64 {
        self.days_since_j2000() / DAYS_PER_CENTURY
    }
}

/// Convert a UTC instant to a Julian Date.
///
/// Sub-second precision is kept so that the result is strictly monotonic in
/// the instant.
pub fn to_julian_date(instant: Instant) -> JulianDate {
    let (mut y, mut m) = (instant.year() as f64, instant.month() as f64);
    if m < 3.0 {
        y -= 1.0;
        m += 12.0;
    }

    // Gregorian century correction
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    let seconds = instant.hour() as f64 * 3600.0
        + instant.minute() as f64 * 60.0
        + instant.second() as f64
        + instant.nanosecond() as f64 / 1e9;
    let day = instant.day() as f64 + seconds / 86_400.0;

    JulianDate((365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day + b - 1524.5)
}
