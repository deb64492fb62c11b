//! Standard monthly expiration dates.
//!
//! Monthly options expire on the third Friday of the month, or on the
//! preceding Thursday when that Friday is an exchange holiday.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Third Friday of the month, or `None` for an invalid year/month.
pub fn third_friday(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Fri, 3)
}

/// Standard expiration for a month, moved to Thursday when the Friday is a holiday.
pub fn standard_expiration(
    year: i32,
    month: u32,
    is_holiday: impl Fn(NaiveDate) -> bool,
) -> Option<NaiveDate> {
    let friday = third_friday(year, month)?;
    if is_holiday(friday) {
        friday.checked_sub_days(Days::new(1))
    } else {
        Some(friday)
    }
}

/// Standard expirations for all twelve months of `year`.
pub fn standard_expirations(year: i32, is_holiday: impl Fn(NaiveDate) -> bool) -> Vec<NaiveDate> {
    (1..=12)
        .filter_map(|month| standard_expiration(year, month, &is_holiday))
        .collect()
}

/// Whether `date` is a regular third-Friday expiration.
pub fn is_third_friday(date: NaiveDate) -> bool {
    third_friday(date.year(), date.month()) == Some(date)
}
