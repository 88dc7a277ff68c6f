//! Per-tick driver with a one-day horizon cache.
//!
//! The horizon search costs some 1440 position evaluations, so it runs once per
//! local day and observer. [`MoonTracker`] owns the last result and
//! recomputes it only when the local date or the observer changes.

use crate::arc::{arc_progress, ArcProgress};
use crate::horizon::{crossings_for, HorizonCrossing};
use crate::lunar::{phase_of, MoonEphemeris};
use crate::position::{position_of, SkyPosition};
use crate::{GeoCoordinate, Instant};
use chrono::{FixedOffset, NaiveDate};
use log::{debug, trace};

/// The day's crossings and the inputs they were computed for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayCache {
    pub day: NaiveDate,
    pub observer: GeoCoordinate,
    pub crossing: HorizonCrossing,
}

/// Everything the display needs for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoonSnapshot {
    pub at: Instant,
    pub ephemeris: MoonEphemeris,
    pub position: SkyPosition,
    pub crossing: HorizonCrossing,
    pub progress: ArcProgress,
}

#[derive(Debug, Clone)]
pub struct MoonTracker {
    observer: GeoCoordinate,
    offset: FixedOffset,
    cache: Option<DayCache>,
}

impl MoonTracker {
    pub fn new(observer: GeoCoordinate, offset: FixedOffset) -> Self {
        Self {
            observer,
            offset,
            cache: None,
        }
    }

    pub fn observer(&self) -> GeoCoordinate {
        self.observer
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Last computed crossings, if any.
    pub fn cached(&self) -> Option<&DayCache> {
        self.cache.as_ref()
    }

    /// Move the observer. The cache is invalidated on the next tick.
    pub fn set_observer(&mut self, observer: GeoCoordinate) {
        self.observer = observer;
    }

    /// Local calendar day containing `now`.
    pub fn local_day(&self, now: Instant) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Crossings for the local day containing `now`, from cache when valid.
    pub fn crossing_for(&mut self, now: Instant) -> HorizonCrossing {
        let day = self.local_day(now);
        let observer = self.observer;
        match self.cache.filter(|c| c.day == day && c.observer == observer) {
            Some(cache) => cache.crossing,
            None => self.refresh(day),
        }
    }

    fn refresh(&mut self, day: NaiveDate) -> HorizonCrossing {
        let mut crossing = crossings_for(day, self.offset, self.observer);
        crossing.prior_rise = self.carried_rise(day);

        debug!(
            "Horizon search for {} at ({:.2}, {:.2}): rise {:?}, set {:?}, next-day set {}",
            day,
            self.observer.latitude,
            self.observer.longitude,
            crossing.rise,
            crossing.set,
            crossing.set_is_next_day
        );

        self.cache = Some(DayCache {
            day,
            observer: self.observer,
            crossing,
        });
        crossing
    }

    /// Yesterday's rise when its set spills into `day`.
    fn carried_rise(&self, day: NaiveDate) -> Option<Instant> {
        let yesterday = day.pred_opt()?;
        let previous = match self.cache {
            Some(cache) if cache.day == yesterday && cache.observer == self.observer => {
                cache.crossing
            }
            _ => crossings_for(yesterday, self.offset, self.observer),
        };
        if previous.set_is_next_day {
            previous.rise
        } else {
            None
        }
    }

    /// Run the whole engine for `now`.
    pub fn tick(&mut self, now: Instant) -> MoonSnapshot {
        let ephemeris = phase_of(now);
        let position = position_of(now, self.observer);
        let crossing = self.crossing_for(now);
        let progress = arc_progress(now, &crossing, &position);

        trace!(
            "tick {}: alt {:.1}° az {:.1}° t={:.3} visible={}",
            now,
            position.altitude,
            position.azimuth,
            progress.t,
            progress.visible
        );

        MoonSnapshot {
            at: now,
            ephemeris,
            position,
            crossing,
            progress,
        }
    }
}
