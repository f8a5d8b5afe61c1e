//! Property tests for the dial geometry.

use proptest::prelude::*;

use chrono::{Duration, Local, TimeZone};
use shush_core::geometry::{
    angle_to_duration, duration_to_arc, point_to_angle, quantize, ClockAngle, Point,
    MINUTES_PER_HALF_DAY,
};

mod support;

fn circular_distance(a: i32, b: i32) -> i32 {
    let d = (a - b).rem_euclid(360);
    d.min(360 - d)
}

#[test]
fn cardinal_points() {
    let c = Point::new(100, 100);
    let at = |x, y| point_to_angle(Point::new(x, y), c).unwrap().degrees();
    assert_eq!(at(100, 40), 270);
    assert_eq!(at(160, 100), 0);
    assert_eq!(at(100, 160), 90);
    assert_eq!(at(40, 100), 180);
}

#[test]
fn sweep_examples() {
    assert_eq!(angle_to_duration(ClockAngle::new(270), ClockAngle::new(270)), 0);
    assert_eq!(angle_to_duration(ClockAngle::new(270), ClockAngle::new(0)), 180);
}

proptest! {
    #[test]
    fn quantize_picks_nearest_quarter_hour(raw in 0u32..2_000) {
        let q = quantize(raw);
        prop_assert_eq!(q % 15, 0);
        prop_assert!((i64::from(q) - i64::from(raw)).abs() <= 7);
    }

    #[test]
    fn durations_stay_on_the_dial(start in 0i32..360, point in 0i32..360) {
        let minutes = angle_to_duration(ClockAngle::new(start), ClockAngle::new(point));
        prop_assert!(minutes <= MINUTES_PER_HALF_DAY);
        prop_assert_eq!(minutes % 15, 0);
    }

    #[test]
    fn duration_grows_with_clockwise_sweep(start in 0i32..360, sweep in 0i32..359) {
        let start_angle = ClockAngle::new(start);
        let a = angle_to_duration(start_angle, ClockAngle::new(start + sweep));
        let b = angle_to_duration(start_angle, ClockAngle::new(start + sweep + 1));
        prop_assert!(b >= a, "sweep {} gave {} but {} gave {}", sweep, a, sweep + 1, b);
    }

    #[test]
    fn off_center_points_always_have_an_angle(x in -1_000i32..1_000, y in -1_000i32..1_000) {
        prop_assume!(x != 0 || y != 0);
        prop_assert!(point_to_angle(Point::new(x, y), Point::new(0, 0)).is_ok());
    }

    #[test]
    fn angle_tracks_points_on_a_circle(theta in 0i32..360, radius in 50i32..500) {
        let rad = f64::from(theta).to_radians();
        let p = Point::new(
            (f64::from(radius) * rad.cos()).round() as i32,
            (f64::from(radius) * rad.sin()).round() as i32,
        );
        let angle = point_to_angle(p, Point::new(0, 0)).unwrap().degrees();
        prop_assert!(circular_distance(angle, theta) <= 2, "theta {} -> {}", theta, angle);
    }

    #[test]
    fn arc_regions_cover_the_circle(start in 0i32..360, minutes in 0u32..MINUTES_PER_HALF_DAY) {
        let arc = duration_to_arc(ClockAngle::new(start), minutes);
        prop_assert_eq!(arc.fill_sweep + arc.marker_sweep + arc.empty_sweep, 360);
        prop_assert_eq!(arc.marker_start, arc.fill_start + arc.fill_sweep);
    }

    #[test]
    fn end_is_start_plus_duration(hour in 0u32..24, minute in 0u32..60, minutes in 0u32..=720) {
        let start = Local.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).single();
        prop_assume!(start.is_some());
        let start = start.unwrap();

        let mut picker = support::picker();
        picker.set_start(start);
        picker.set_duration(minutes);
        prop_assert_eq!(picker.end(), start + Duration::minutes(i64::from(minutes)));
    }
}
