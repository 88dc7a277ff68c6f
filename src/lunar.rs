//! Moon age, illuminated fraction and phase naming.
//!
//! Mean-phase model: the age is the time since a known new moon folded into
//! the mean synodic month. Good to about ±1 day against true new/full times,
//! which is plenty for a phase label and a percentage on the dashboard.

use crate::Instant;
use chrono::{TimeZone, Utc};
use core::f64::consts::TAU;
use serde::{Deserialize, Serialize};

/// Mean synodic month in days.
pub const SYNODIC_MONTH: f64 = 29.530_588_67;

/// Age (days) used as the middle of the month: full moon, and the switch
/// point between the southerly and northerly fallback directions.
pub const HALF_MONTH_AGE: f64 = 14.77;

/// Illuminated fraction at or above which a moon is labelled full
/// regardless of age.
const FULL_ILLUMINATION: f64 = 0.98;

/// Reference new moon: 2000-01-06 18:14 UTC.
pub fn reference_new_moon() -> Instant {
    // Fixed, valid calendar fields; cannot be ambiguous in UTC.
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .unwrap_or_default()
}

/// Discrete phase classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLabel {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl PhaseLabel {
    /// Human-readable name for the dashboard.
    pub fn name(self) -> &'static str {
        match self {
            PhaseLabel::New => "New Moon",
            PhaseLabel::WaxingCrescent => "Waxing Crescent",
            PhaseLabel::FirstQuarter => "First Quarter",
            PhaseLabel::WaxingGibbous => "Waxing Gibbous",
            PhaseLabel::Full => "Full Moon",
            PhaseLabel::WaningGibbous => "Waning Gibbous",
            PhaseLabel::LastQuarter => "Last Quarter",
            PhaseLabel::WaningCrescent => "Waning Crescent",
        }
    }

    /// Phase index 0 – 7 (0 = new, 4 = full).
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Lower age bound (days) of each bin, ascending. The principal phases get
/// a ±1 day window; the in-between phases fill the rest.
#[rustfmt::skip]
const PHASE_TABLE: [(f64, PhaseLabel); 9] = [
    ( 0.00, PhaseLabel::New),
    ( 1.00, PhaseLabel::WaxingCrescent),
    ( 6.38, PhaseLabel::FirstQuarter),
    ( 8.38, PhaseLabel::WaxingGibbous),
    (13.77, PhaseLabel::Full),
    (15.77, PhaseLabel::WaningGibbous),
    (21.15, PhaseLabel::LastQuarter),
    (23.15, PhaseLabel::WaningCrescent),
    (28.53, PhaseLabel::New),
];

/// Everything the phase model produces for one instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonEphemeris {
    /// Days since the last mean new moon, in [0, SYNODIC_MONTH).
    pub age_days: f64,
    /// `age_days / SYNODIC_MONTH`, in [0, 1).
    pub phase_fraction: f64,
    /// Illuminated fraction of the disc, in [0, 1].
    pub illumination: f64,
    pub label: PhaseLabel,
}

impl MoonEphemeris {
    /// Build the ephemeris from an age in days. Ages outside one month are
    /// folded back into [0, SYNODIC_MONTH).
    pub fn from_age(age_days: f64) -> Self {
        let mut age_days = age_days.rem_euclid(SYNODIC_MONTH);
        if age_days >= SYNODIC_MONTH {
            age_days = 0.0;
        }
        let phase_fraction = age_days / SYNODIC_MONTH;
        let illumination = ((1.0 - (TAU * phase_fraction).cos()) / 2.0).clamp(0.0, 1.0);

        MoonEphemeris {
            age_days,
            phase_fraction,
            illumination,
            label: classify(age_days, illumination),
        }
    }
}

/// Phase and illumination at `instant`.
pub fn phase_of(instant: Instant) -> MoonEphemeris {
    let elapsed = instant - reference_new_moon();
    let days = elapsed.num_milliseconds() as f64 / 86_400_000.0;
    MoonEphemeris::from_age(days)
}

/// Table lookup on age, with the illumination gate pulling near-full ages
/// into the full bin.
fn classify(age_days: f64, illumination: f64) -> PhaseLabel {
    if illumination >= FULL_ILLUMINATION {
        return PhaseLabel::Full;
    }
    PHASE_TABLE
        .iter()
        .rev()
        .find(|(lower, _)| age_days >= *lower)
        .map(|&(_, label)| label)
        .unwrap_or(PhaseLabel::New)
}
