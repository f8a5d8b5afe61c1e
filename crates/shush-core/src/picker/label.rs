//! Text shown in the middle of the dial.
//!
//! ```text
//!   2½
//!  hours
//! 10:15 PM
//! ```

use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    Hour,
    Hours,
}

impl DurationUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hour => "hour",
            DurationUnit::Hours => "hours",
        }
    }
}

/// Big number plus unit line, e.g. `"1½"` / `"hours"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationLabel {
    pub value: String,
    pub unit: DurationUnit,
}

impl DurationLabel {
    pub fn for_minutes(minutes: u32) -> Self {
        let hours = minutes / 60;
        let (value, unit) = match (minutes, minutes % 60) {
            (m, _) if m < 60 => (m.to_string(), DurationUnit::Minutes),
            (60, _) => ("1".to_string(), DurationUnit::Hour),
            (_, 0) => (hours.to_string(), DurationUnit::Hours),
            (_, 15) => (format!("{hours}\u{00BC}"), DurationUnit::Hours),
            (_, 30) => (format!("{hours}\u{00BD}"), DurationUnit::Hours),
            (_, 45) => (format!("{hours}\u{00BE}"), DurationUnit::Hours),
            // Off-grid values can only come from a restored or hand-edited setting.
            (_, rest) => (format!("{hours}:{rest:02}"), DurationUnit::Hours),
        };
        Self { value, unit }
    }
}

impl fmt::Display for DurationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.as_str())
    }
}

/// Formats the time of day the radio comes back on.
pub fn format_clock_time<Tz>(instant: &DateTime<Tz>, use_24h_clock: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if use_24h_clock {
        instant.format("%H:%M").to_string()
    } else {
        instant.format("%-I:%M %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn minutes_below_an_hour() {
        let label = DurationLabel::for_minutes(45);
        assert_eq!(label.value, "45");
        assert_eq!(label.unit, DurationUnit::Minutes);
        assert_eq!(DurationLabel::for_minutes(0).to_string(), "0 minutes");
    }

    #[test]
    fn single_hour_is_singular() {
        assert_eq!(DurationLabel::for_minutes(60).to_string(), "1 hour");
    }

    #[test]
    fn fractions_use_glyphs() {
        assert_eq!(DurationLabel::for_minutes(75).to_string(), "1¼ hours");
        assert_eq!(DurationLabel::for_minutes(90).to_string(), "1½ hours");
        assert_eq!(DurationLabel::for_minutes(165).to_string(), "2¾ hours");
        assert_eq!(DurationLabel::for_minutes(720).to_string(), "12 hours");
    }

    #[test]
    fn off_grid_minutes_fall_back_to_clock_notation() {
        assert_eq!(DurationLabel::for_minutes(67).to_string(), "1:07 hours");
    }

    #[test]
    fn clock_time_formats() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let t = tz.with_ymd_and_hms(2024, 3, 1, 23, 5, 0).unwrap();
        assert_eq!(format_clock_time(&t, true), "23:05");
        assert_eq!(format_clock_time(&t, false), "11:05 PM");
    }
}
