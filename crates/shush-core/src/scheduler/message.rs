//! User-facing wording for session outcomes.

use chrono::{DateTime, Local};

use crate::picker::format_clock_time;

pub fn disabled_until(radio_name: &str, restore_at: &DateTime<Local>, use_24h_clock: bool) -> String {
    format!(
        "{radio_name} disabled until {}",
        format_clock_time(restore_at, use_24h_clock)
    )
}

pub fn disabled_indefinitely(radio_name: &str) -> String {
    format!("{radio_name} disabled indefinitely")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn wording() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 11, 30, 0).unwrap();
        assert_eq!(disabled_until("Wi-Fi", &at, true), "Wi-Fi disabled until 11:30");
        assert_eq!(disabled_until("Wi-Fi", &at, false), "Wi-Fi disabled until 11:30 AM");
        assert_eq!(disabled_indefinitely("Bluetooth"), "Bluetooth disabled indefinitely");
    }
}
