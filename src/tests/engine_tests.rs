//! # Engine Property and Scenario Tests
//!
//! End-to-end checks across the time converter, phase model, position model,
//! horizon search and arc mapper, using the reference deployment location.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use moon_tracker_lib::arc::{arc_progress, ArcProgress};
use moon_tracker_lib::horizon::{corrected_altitude, crossings_for, HorizonCrossing};
use moon_tracker_lib::julian::to_julian_date;
use moon_tracker_lib::lunar::{phase_of, reference_new_moon, PhaseLabel, SYNODIC_MONTH};
use moon_tracker_lib::position::position_of;
use moon_tracker_lib::tracker::MoonTracker;
use moon_tracker_lib::GeoCoordinate;

const CHIBA: GeoCoordinate = GeoCoordinate::new(35.78, 139.88);

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// Instants every `step_hours` across `days` days from `start`.
fn instants(start: DateTime<Utc>, days: i64, step_hours: i64) -> Vec<DateTime<Utc>> {
    (0..days * 24)
        .step_by(step_hours as usize)
        .map(|h| start + Duration::hours(h))
        .collect()
}

/// First day from `start` whose rise precedes its set on the same day.
fn find_rise_then_set_day(start: NaiveDate) -> HorizonCrossing {
    let mut day = start;
    for _ in 0..40 {
        let c = crossings_for(day, jst(), CHIBA);
        if let (Some(r), Some(s)) = (c.rise, c.set) {
            if r < s && !c.set_is_next_day {
                return c;
            }
        }
        day = day.succ_opt().unwrap();
    }
    panic!("no rise-then-set day found within 40 days of {start}");
}

/// Synodic month as an exact-enough chrono duration.
fn synodic_month() -> Duration {
    Duration::milliseconds((SYNODIC_MONTH * 86_400_000.0).round() as i64)
}

#[test]
fn phase_age_repeats_every_synodic_month() {
    let start = Utc.with_ymd_and_hms(2023, 3, 14, 5, 30, 0).unwrap();
    for t in instants(start, 60, 13) {
        let a = phase_of(t).age_days;
        let b = phase_of(t + synodic_month()).age_days;
        // Compare on the circle so a wrap near new moon does not count
        let diff = (a - b).abs();
        let circular = diff.min(SYNODIC_MONTH - diff);
        assert!(circular < 1e-6, "age {a} vs {b} at {t}");
    }
}

#[test]
fn illumination_stays_in_unit_interval() {
    let start = Utc.with_ymd_and_hms(1999, 12, 1, 0, 0, 0).unwrap();
    for t in instants(start, 400, 5) {
        let eph = phase_of(t);
        assert!((0.0..=1.0).contains(&eph.illumination), "{} at {t}", eph.illumination);
        assert!((0.0..SYNODIC_MONTH).contains(&eph.age_days));
        assert!((0.0..1.0).contains(&eph.phase_fraction));
    }
}

#[test]
fn full_label_implies_bright_disc() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut fulls = 0;
    for t in instants(start, 366, 3) {
        let eph = phase_of(t);
        if eph.label == PhaseLabel::Full {
            assert!(eph.illumination >= 0.97, "full at {t} with {}", eph.illumination);
            fulls += 1;
        }
    }
    // Twelve or thirteen full moons, each labelled for a couple of days
    assert!(fulls > 100);
}

#[test]
fn reference_epoch_is_new_moon() {
    let eph = phase_of(reference_new_moon());
    assert!(eph.age_days.abs() < 1e-6);
    assert!(eph.illumination < 1e-6);
    assert_eq!(eph.label, PhaseLabel::New);
}

#[test]
fn half_synodic_month_after_epoch_is_full() {
    let t = reference_new_moon() + Duration::milliseconds((14.765 * 86_400_000.0) as i64);
    let eph = phase_of(t);
    assert_eq!(eph.label, PhaseLabel::Full);
    assert!(eph.illumination >= 0.98);
}

#[test]
fn julian_date_tracks_wall_clock() {
    let start = Utc.with_ymd_and_hms(1987, 6, 19, 12, 0, 0).unwrap();
    let steps = [
        Duration::seconds(1),
        Duration::minutes(1),
        Duration::hours(7),
        Duration::days(1),
        Duration::days(365),
        Duration::days(10_000),
    ];
    for step in steps {
        let (a, b) = (to_julian_date(start), to_julian_date(start + step));
        assert!(b.0 > a.0);
        let elapsed = step.num_milliseconds() as f64 / 86_400_000.0;
        assert!(((b.0 - a.0) - elapsed).abs() < 1e-6, "step {step}");
    }
}

#[test]
fn crossings_are_sign_changes_of_corrected_altitude() {
    let mut day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let step = Duration::minutes(1);
    for _ in 0..20 {
        let c = crossings_for(day, jst(), CHIBA);
        if let Some(r) = c.rise {
            assert!(corrected_altitude(r - step, CHIBA) < 0.0);
            assert!(corrected_altitude(r + step, CHIBA) >= 0.0);
        }
        if let Some(s) = c.set {
            assert!(corrected_altitude(s - step, CHIBA) >= 0.0);
            assert!(corrected_altitude(s + step, CHIBA) < 0.0);
        }
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn rise_azimuth_is_easterly_and_set_westerly() {
    let mut day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    for _ in 0..30 {
        let c = crossings_for(day, jst(), CHIBA);
        if let Some(az) = c.rise_azimuth {
            assert!((0.0..180.0).contains(&az), "rise azimuth {az} on {day}");
        }
        if let Some(az) = c.set_azimuth {
            assert!((180.0..360.0).contains(&az), "set azimuth {az} on {day}");
        }
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn arc_progress_through_a_rise_then_set_day() {
    let c = find_rise_then_set_day(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    let (rise, set) = (c.rise.unwrap(), c.set.unwrap());
    let progress = |now| arc_progress(now, &c, &position_of(now, CHIBA));

    assert_eq!(progress(rise), ArcProgress { t: 0.0, visible: true });

    let mid = progress(rise + (set - rise) / 2);
    assert!(mid.visible);
    assert!((mid.t - 0.5).abs() < 1e-3, "midpoint t = {}", mid.t);

    assert_eq!(progress(set), ArcProgress { t: 1.0, visible: true });
    assert_eq!(progress(set + Duration::minutes(1)), ArcProgress { t: 1.0, visible: false });
}

#[test]
fn arc_progress_is_non_decreasing_between_rise_and_set() {
    let c = find_rise_then_set_day(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    let (rise, set) = (c.rise.unwrap(), c.set.unwrap());
    let mut now = rise;
    let mut last = 0.0;
    while now <= set {
        let p = arc_progress(now, &c, &position_of(now, CHIBA));
        assert!(p.visible);
        assert!(p.t >= last);
        last = p.t;
        now += Duration::minutes(5);
    }
}

#[test]
fn moon_is_up_whenever_the_tracker_says_visible() {
    // Sample a fortnight of ticks and check visibility against the corrected altitude,
    // allowing a few minutes of slack around each crossing.
    let mut tracker = MoonTracker::new(CHIBA, jst());
    let start = Utc.with_ymd_and_hms(2025, 4, 10, 0, 0, 0).unwrap();
    let mut mismatches = 0;
    let mut total = 0;
    for t in (0..14 * 24 * 60).step_by(17).map(|m| start + Duration::minutes(m)) {
        let snap = tracker.tick(t);
        let up = corrected_altitude(t, CHIBA) >= 0.0;
        if snap.progress.visible != up {
            mismatches += 1;
        }
        assert!((0.0..=1.0).contains(&snap.progress.t));
        total += 1;
    }
    assert!(mismatches * 100 < total, "{mismatches} of {total} ticks disagree");
}
