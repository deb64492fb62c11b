//! Weekend adjustment for alert target dates.

use chrono::{Datelike, Days, NaiveDate, Weekday};

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Move a weekend date back to the preceding business day.
///
/// Weekday dates are returned unchanged, holidays included. Weekend dates walk
/// backward one day at a time until they reach a weekday that `is_holiday`
/// rejects, which may land in the previous month.
pub fn adjust_for_weekend(date: NaiveDate, is_holiday: impl Fn(NaiveDate) -> bool) -> NaiveDate {
    if !is_weekend(date) {
        return date;
    }

    let mut candidate = date;
    loop {
        candidate = match candidate.checked_sub_days(Days::new(1)) {
            Some(d) => d,
            None => return candidate,
        };
        if !is_weekend(candidate) && !is_holiday(candidate) {
            return candidate;
        }
    }
}
