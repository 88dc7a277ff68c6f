//! Display fields for the moon panel and the override merge.
//!
//! The engine's numbers are turned into the strings the panel shows. An
//! external feed may supply better values for some of those strings; they
//! replace the computed ones field by field here, at the edge, and never flow
//! back into the engine.

use crate::horizon::{rise_direction, set_direction};
use crate::tracker::MoonSnapshot;
use crate::Instant;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// Clock text when there is no crossing
pub const NO_TIME: &str = "--:--";

/// Set text when today's rise sets tomorrow and no set was seen today
pub const NEXT_DAY: &str = "next day";

/// What the panel shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonReport {
    pub phase_name: String,
    /// Whole percent, 0 – 100
    pub illumination_percent: u8,
    /// Days, one decimal
    pub age_days: f64,
    /// Local `HH:MM`, [`NO_TIME`] or [`NEXT_DAY`]
    pub rise: String,
    pub set: String,
    pub rise_direction: String,
    pub set_direction: String,
}

/// Values from the external feed. Every field is optional; absent ones keep
/// the computed value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub rise: Option<String>,
    pub set: Option<String>,
    pub rise_direction: Option<String>,
    pub set_direction: Option<String>,
    pub illumination_percent: Option<u8>,
    pub age_days: Option<f64>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Overrides::default()
    }
}

fn clock(at: Option<Instant>, offset: FixedOffset) -> Option<String> {
    at.map(|t| t.with_timezone(&offset).format("%H:%M").to_string())
}

impl MoonReport {
    /// Computed display fields for one engine snapshot.
    pub fn from_snapshot(snapshot: &MoonSnapshot, offset: FixedOffset) -> Self {
        let eph = &snapshot.ephemeris;
        let crossing = &snapshot.crossing;

        let set = match clock(crossing.set, offset) {
            Some(text) => text,
            None if crossing.set_is_next_day => NEXT_DAY.to_string(),
            None => NO_TIME.to_string(),
        };

        MoonReport {
            phase_name: eph.label.name().to_string(),
            illumination_percent: (eph.illumination * 100.0).round() as u8,
            age_days: (eph.age_days * 10.0).round() / 10.0,
            rise: clock(crossing.rise, offset).unwrap_or_else(|| NO_TIME.to_string()),
            set,
            rise_direction: rise_direction(crossing, eph.age_days).to_string(),
            set_direction: set_direction(crossing, eph.age_days).to_string(),
        }
    }
}

/// Per field: the override if present, else the computed value.
pub fn merge(computed: MoonReport, overrides: &Overrides) -> MoonReport {
    MoonReport {
        phase_name: computed.phase_name,
        illumination_percent: overrides
            .illumination_percent
            .map(|p| p.min(100))
            .unwrap_or(computed.illumination_percent),
        age_days: overrides.age_days.unwrap_or(computed.age_days),
        rise: overrides.rise.clone().unwrap_or(computed.rise),
        set: overrides.set.clone().unwrap_or(computed.set),
        rise_direction: overrides
            .rise_direction
            .clone()
            .unwrap_or(computed.rise_direction),
        set_direction: overrides
            .set_direction
            .clone()
            .unwrap_or(computed.set_direction),
    }
}
