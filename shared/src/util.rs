use chrono::{Local, NaiveDate};

use crate::models::MENU_DATE_FORMAT;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The server's local calendar date, independent of time-of-day.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date the way menu dates are compared (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format(MENU_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_zero_pads() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(d), "2025-01-05");
    }

    #[test]
    fn now_millis_is_positive() {
        assert!(now_millis() > 1_700_000_000_000);
    }
}
