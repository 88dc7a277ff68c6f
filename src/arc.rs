//! Where the Moon is along its rise → set arc.
//!
//! Produces the scalar the display uses to place the moon marker on its
//! arc: 0 at the rising horizon, 1 at the setting horizon. The rules are
//! checked in a fixed order because each later rule assumes the earlier ones
//! did not apply:
//!
//! 1. Rise and set both today, rise first: proportional between them.
//! 2. Rise today, set tomorrow (or unknown): saturating growth after the rise.
//!    Before the rise a morning set, if any, closes yesterday's arc.
//! 3. Set today but no rise: the Moon was up at midnight; runs to 1 at the set.
//! 4. No crossings at all: the current altitude decides visibility, `t = 0.5`.

use crate::horizon::HorizonCrossing;
use crate::position::SkyPosition;
use crate::Instant;
use serde::{Deserialize, Serialize};

/// Ceiling approached, never reached, while the set time is unknown.
const OPEN_ARC_CAP: f64 = 0.95;

/// Hours after the rise at which an open arc reaches half of the cap.
const OPEN_ARC_HALF_HOURS: f64 = 6.0;

/// Marker position along the arc.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcProgress {
    /// 0 at rise, 1 at set
    pub t: f64,
    pub visible: bool,
}

impl ArcProgress {
    fn up(t: f64) -> Self {
        ArcProgress {
            t: t.clamp(0.0, 1.0),
            visible: true,
        }
    }

    fn down(t: f64) -> Self {
        ArcProgress { t, visible: false }
    }
}

/// Fraction of the way from `start` to `end` at `now`.
fn fraction(now: Instant, start: Instant, end: Instant) -> f64 {
    let span = (end - start).num_milliseconds() as f64;
    if span <= 0.0 {
        return 1.0;
    }
    (now - start).num_milliseconds() as f64 / span
}

/// Growth after a rise whose set is not known yet.
fn open_arc(now: Instant, rise: Instant) -> f64 {
    let hours = (now - rise).num_milliseconds() as f64 / 3_600_000.0;
    OPEN_ARC_CAP * hours / (hours + OPEN_ARC_HALF_HOURS)
}

/// Progress on an arc that was already under way at local midnight and ends
/// at `set`. With yesterday's rise known the span across midnight is used;
/// otherwise the marker runs from the top of the arc down to the set.
fn carried_arc(now: Instant, crossing: &HorizonCrossing, set: Instant) -> f64 {
    match crossing.prior_rise {
        Some(prior) if prior < set => fraction(now, prior, set),
        _ => 0.5 + 0.5 * fraction(now, crossing.anchor, set).max(0.0),
    }
}

/// Arc progress at `now` for today's crossings.
pub fn arc_progress(now: Instant, crossing: &HorizonCrossing, position: &SkyPosition) -> ArcProgress {
    match (crossing.rise, crossing.set) {
        (Some(rise), Some(set)) if !crossing.set_is_next_day => {
            if now < rise {
                ArcProgress::down(0.0)
            } else if now > set {
                ArcProgress::down(1.0)
            } else {
                ArcProgress::up(fraction(now, rise, set))
            }
        }
        (Some(rise), set) => {
            if now >= rise {
                return ArcProgress::up(open_arc(now, rise));
            }
            match set {
                Some(morning) if crossing.has_morning_set() && now <= morning => {
                    ArcProgress::up(carried_arc(now, crossing, morning))
                }
                _ => ArcProgress::down(0.0),
            }
        }
        (None, Some(set)) => {
            if now <= set {
                ArcProgress::up(carried_arc(now, crossing, set))
            } else {
                ArcProgress::down(1.0)
            }
        }
        (None, None) => ArcProgress {
            t: 0.5,
            visible: position.altitude > 0.0,
        },
    }
}
