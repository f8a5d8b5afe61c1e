//! Dial geometry.
//!
//! Pure functions over a clock face whose angle 0 sits at 3 o'clock and grows
//! clockwise (screen coordinates, y pointing down). A full turn of the dial is
//! half a day, so one degree is two minutes.
//!
//! ```text
//!              270
//!               |
//!       180 ----+---- 0
//!               |
//!               90
//! ```

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Longest selectable duration: half a day.
pub const MINUTES_PER_HALF_DAY: u32 = 720;

/// Granularity of interactive selection.
pub const QUANTUM_MINUTES: u32 = 15;

/// Rounding bias applied before integer division by [`QUANTUM_MINUTES`].
/// Whole minutes never sit exactly halfway between two steps.
const QUANTUM_BIAS: u32 = QUANTUM_MINUTES / 2;

const MINUTES_PER_DEGREE: u32 = 2;

/// Width of the marker drawn at the end of the selection.
pub const MARKER_SWEEP: i32 = 2;

/// Integer degrees in `[0, 360)`, 0 at 3 o'clock, increasing clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockAngle(u16);

impl ClockAngle {
    pub const THREE_OCLOCK: ClockAngle = ClockAngle(0);
    pub const SIX_OCLOCK: ClockAngle = ClockAngle(90);
    pub const NINE_OCLOCK: ClockAngle = ClockAngle(180);
    pub const TWELVE_OCLOCK: ClockAngle = ClockAngle(270);

    /// Wraps any integer number of degrees onto the dial.
    pub fn new(degrees: i32) -> Self {
        Self(degrees.rem_euclid(360) as u16)
    }

    pub fn degrees(self) -> i32 {
        i32::from(self.0)
    }
}

/// A pixel position on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance, kept in integers so classification against
    /// squared radii never goes through a square root.
    pub fn distance_squared(self, other: Point) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }
}

/// Angular regions of the dial for a given selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcRegions {
    /// Where the filled arc (and the whole selection) begins.
    pub fill_start: i32,
    /// Sweep of the filled arc; zero or negative means nothing is filled.
    pub fill_sweep: i32,
    pub marker_start: i32,
    pub marker_sweep: i32,
    pub empty_start: i32,
    /// Sweep of the unselected remainder, never negative.
    pub empty_sweep: i32,
}

impl ArcRegions {
    pub fn has_fill(&self) -> bool {
        self.fill_sweep > 0
    }

    /// Dial minutes covered by the filled arc.
    pub fn filled_minutes(&self) -> u32 {
        self.fill_sweep.max(0) as u32 * MINUTES_PER_DEGREE
    }
}

/// Angle of `point` as seen from `center`.
///
/// The quadrant is picked first so the adjacent side is always strictly
/// positive; a point on an axis simply has an opposite side of zero.
///
/// ```text
///      adj | opp
///          |
/// opp +180 | +270 adj
/// _________|_________
///          |
/// adj  +90 | +0   opp
///          |
///      opp | adj
/// ```
pub fn point_to_angle(point: Point, center: Point) -> Result<ClockAngle, GeometryError> {
    let (x, y) = (point.x, point.y);
    let (cx, cy) = (center.x, center.y);

    let (base, opp, adj) = if x >= cx && y < cy {
        (270, x - cx, cy - y)
    } else if x > cx && y >= cy {
        (0, y - cy, x - cx)
    } else if x <= cx && y > cy {
        (90, cx - x, y - cy)
    } else if x < cx && y <= cy {
        (180, cy - y, cx - x)
    } else {
        return Err(GeometryError::InvalidGeometry { x, y });
    };

    let offset = (f64::from(opp) / f64::from(adj)).atan().to_degrees() as i32;
    Ok(ClockAngle::new(base + offset))
}

/// Rounds raw minutes to the nearest quarter hour; ties go up.
pub fn quantize(raw_minutes: u32) -> u32 {
    ((raw_minutes + QUANTUM_BIAS) / QUANTUM_MINUTES) * QUANTUM_MINUTES
}

/// Duration selected by dragging from `start_angle` clockwise to `point_angle`.
///
/// A result past a full turn is held at [`MINUTES_PER_HALF_DAY`] instead of
/// wrapping to zero, so a drag that closes the circle selects 12 hours.
pub fn angle_to_duration(start_angle: ClockAngle, point_angle: ClockAngle) -> u32 {
    let sweep = (360 + point_angle.degrees() - start_angle.degrees()).rem_euclid(360) as u32;
    quantize(sweep * MINUTES_PER_DEGREE).min(MINUTES_PER_HALF_DAY)
}

/// Splits the circle into filled, marker and empty regions for `minutes`.
pub fn duration_to_arc(start_angle: ClockAngle, minutes: u32) -> ArcRegions {
    let start = start_angle.degrees();
    let fill_sweep = (minutes.min(MINUTES_PER_HALF_DAY) / MINUTES_PER_DEGREE) as i32 - 1;
    let marker_start = start + fill_sweep;
    let empty_start = marker_start + MARKER_SWEEP;
    ArcRegions {
        fill_start: start,
        fill_sweep,
        marker_start,
        marker_sweep: MARKER_SWEEP,
        empty_start,
        empty_sweep: (360 - fill_sweep - MARKER_SWEEP).max(0),
    }
}

/// Position of the hour hand for `instant` on a 12-hour face.
pub fn wall_clock_to_angle<Tz: TimeZone>(instant: &DateTime<Tz>) -> ClockAngle {
    let minute_of_half_day = (instant.hour() * 60 + instant.minute()) % MINUTES_PER_HALF_DAY;
    // 12:00 points up, but angle 0 is 3 o'clock.
    ClockAngle::new((minute_of_half_day / MINUTES_PER_DEGREE) as i32 + 270)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    const CENTER: Point = Point { x: 200, y: 150 };

    fn at(x: i32, y: i32) -> Point {
        Point::new(CENTER.x + x, CENTER.y + y)
    }

    #[test]
    fn cardinal_points() {
        assert_eq!(point_to_angle(at(0, -100), CENTER).unwrap(), ClockAngle::TWELVE_OCLOCK);
        assert_eq!(point_to_angle(at(100, 0), CENTER).unwrap(), ClockAngle::THREE_OCLOCK);
        assert_eq!(point_to_angle(at(0, 100), CENTER).unwrap(), ClockAngle::SIX_OCLOCK);
        assert_eq!(point_to_angle(at(-100, 0), CENTER).unwrap(), ClockAngle::NINE_OCLOCK);
    }

    #[test]
    fn diagonals_land_mid_quadrant() {
        assert_eq!(point_to_angle(at(50, 50), CENTER).unwrap().degrees(), 45);
        assert_eq!(point_to_angle(at(-50, 50), CENTER).unwrap().degrees(), 135);
        assert_eq!(point_to_angle(at(-50, -50), CENTER).unwrap().degrees(), 225);
        assert_eq!(point_to_angle(at(50, -50), CENTER).unwrap().degrees(), 315);
    }

    #[test]
    fn center_point_is_invalid() {
        assert_eq!(
            point_to_angle(CENTER, CENTER),
            Err(GeometryError::InvalidGeometry { x: 200, y: 150 })
        );
    }

    #[test]
    fn one_pixel_off_axis() {
        assert_eq!(point_to_angle(at(1, 0), CENTER).unwrap().degrees(), 0);
        assert_eq!(point_to_angle(at(0, 1), CENTER).unwrap().degrees(), 90);
        assert_eq!(point_to_angle(at(-1, 0), CENTER).unwrap().degrees(), 180);
        assert_eq!(point_to_angle(at(0, -1), CENTER).unwrap().degrees(), 270);
    }

    #[test]
    fn no_sweep_is_zero_minutes() {
        assert_eq!(angle_to_duration(ClockAngle::new(270), ClockAngle::new(270)), 0);
    }

    #[test]
    fn quarter_turn_is_three_hours() {
        assert_eq!(angle_to_duration(ClockAngle::new(270), ClockAngle::new(0)), 180);
    }

    #[test]
    fn almost_full_turn_holds_at_twelve_hours() {
        assert_eq!(angle_to_duration(ClockAngle::new(10), ClockAngle::new(9)), 720);
        assert_eq!(angle_to_duration(ClockAngle::new(10), ClockAngle::new(7)), 720);
        // 712 raw minutes is nearer 705
        assert_eq!(angle_to_duration(ClockAngle::new(10), ClockAngle::new(6)), 705);
    }

    #[test]
    fn short_drag_picks_nearer_quarter() {
        // 11 degrees is 22 raw minutes
        assert_eq!(angle_to_duration(ClockAngle::new(0), ClockAngle::new(11)), 15);
        assert_eq!(angle_to_duration(ClockAngle::new(0), ClockAngle::new(12)), 30);
    }

    #[test]
    fn quantize_rounds_to_nearest_quarter() {
        assert_eq!(quantize(0), 0);
        assert_eq!(quantize(6), 0);
        assert_eq!(quantize(7), 0);
        assert_eq!(quantize(8), 15);
        assert_eq!(quantize(22), 15);
        assert_eq!(quantize(23), 30);
        assert_eq!(quantize(562), 555);
        assert_eq!(quantize(96), 90);
        assert_eq!(quantize(98), 105);
    }

    #[test]
    fn ninety_minutes_fills_forty_four_degrees() {
        let arc = duration_to_arc(ClockAngle::new(210), 90);
        assert_eq!(arc.fill_start, 210);
        assert_eq!(arc.fill_sweep, 44);
        assert_eq!(arc.filled_minutes(), 88);
        assert_eq!(arc.marker_start, 254);
        assert_eq!(arc.empty_start, 256);
        assert_eq!(arc.empty_sweep, 314);
        assert_eq!(arc.fill_sweep + arc.marker_sweep + arc.empty_sweep, 360);
    }

    #[test]
    fn degenerate_durations_have_no_fill() {
        for minutes in [0, 1, 2] {
            assert!(!duration_to_arc(ClockAngle::new(0), minutes).has_fill());
        }
        assert!(duration_to_arc(ClockAngle::new(0), 4).has_fill());
    }

    #[test]
    fn full_selection_leaves_no_empty_region() {
        let arc = duration_to_arc(ClockAngle::new(90), 720);
        assert_eq!(arc.fill_sweep, 359);
        assert_eq!(arc.empty_sweep, 0);
    }

    #[test]
    fn wall_clock_positions() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let angle = |h, m| wall_clock_to_angle(&tz.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap());
        assert_eq!(angle(0, 0).degrees(), 270);
        assert_eq!(angle(12, 0).degrees(), 270);
        assert_eq!(angle(3, 0).degrees(), 0);
        assert_eq!(angle(15, 0).degrees(), 0);
        assert_eq!(angle(6, 0).degrees(), 90);
        assert_eq!(angle(10, 0).degrees(), 210);
        assert_eq!(angle(10, 1).degrees(), 210);
        assert_eq!(angle(10, 2).degrees(), 211);
    }
}
