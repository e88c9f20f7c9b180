// Date utility functions
// Month arithmetic and date-key formatting shared by the calendar and slot services

use chrono::{DateTime, Datelike, NaiveDate};

/// Format used for date keys on every boundary (`YYYY-MM-DD`).
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Zero-padded `YYYY-MM-DD` key built from the date's own calendar fields.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a date key back into a calendar date.
///
/// Accepts a plain `YYYY-MM-DD` key or an RFC 3339 timestamp. A timestamp
/// keeps the calendar date it was written with; it is never shifted to UTC.
pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_KEY_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `delta_months` away from the month containing `date`.
pub fn add_months(date: NaiveDate, delta_months: i32) -> NaiveDate {
    let total_months = (date.year() * 12) + (date.month() as i32 - 1) + delta_months;
    let year = total_months.div_euclid(12);
    let month = total_months.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_else(|| first_of_month(date))
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Weekday index of `date` with Monday as 0 and Sunday as 6.
pub fn monday_first_index(date: NaiveDate) -> u32 {
    (date.weekday().num_days_from_sunday() + 6) % 7
}

/// Format a minute-of-day offset as `HH:MM`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
