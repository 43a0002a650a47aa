//! String formatting for the presentation layer.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// `09:05:03 PM` in 12-hour mode, `21:05:03` otherwise.
pub fn format_clock_time<Tz>(time: &DateTime<Tz>, hour12: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if hour12 {
        time.format("%I:%M:%S %p").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

/// The long date line, e.g. `Monday, October 19, 2026`.
pub fn format_date<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%A, %B %-d, %Y").to_string()
}

/// Zero-padded `HH:MM:SS` for a countdown.
pub fn format_countdown(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// A fixed-width text bar for a percentage, e.g. `[#####-----]  50%`.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        clamped
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn clock_time_in_both_modes() {
        let evening = Utc.with_ymd_and_hms(2026, 10, 19, 21, 5, 3).unwrap();
        assert_eq!(format_clock_time(&evening, true), "09:05:03 PM");
        assert_eq!(format_clock_time(&evening, false), "21:05:03");

        let midnight = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        assert_eq!(format_clock_time(&midnight, true), "12:00:00 AM");
    }

    #[test]
    fn long_date_line() {
        let day = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        assert_eq!(format_date(&day), "Monday, October 19, 2026");
        let new_year = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        assert_eq!(format_date(&new_year), "Thursday, January 1, 2026");
    }

    #[test]
    fn countdown_is_zero_padded() {
        assert_eq!(format_countdown(0), "00:00:00");
        assert_eq!(format_countdown(5), "00:00:05");
        assert_eq!(format_countdown(3661), "01:01:01");
        assert_eq!(format_countdown(23 * 3600 + 59 * 60 + 59), "23:59:59");
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 10), "[----------]   0%");
        assert_eq!(progress_bar(60.0, 10), "[######----]  60%");
        assert_eq!(progress_bar(100.0, 10), "[##########] 100%");
        assert_eq!(progress_bar(250.0, 4), "[####] 100%");
    }
}
