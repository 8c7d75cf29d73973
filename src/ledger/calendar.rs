//! Calendar arithmetic shared by the projector, aggregator and grid builder.

use chrono::{Datelike, Duration, NaiveDate};

/// Adds `months` to `date`, clamping the day to the last valid day of the
/// target month. Returns `None` when the result leaves chrono's date range.
pub fn shift_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let index = date.year() as i64 * 12 + date.month0() as i64 + months;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Adds `years` to `date`, clamping Feb 29 to Feb 28 in non-leap years.
pub fn shift_years(date: NaiveDate, years: i64) -> Option<NaiveDate> {
    shift_months(date, years.checked_mul(12)?)
}

/// Adds `days` to `date`.
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// Number of days in the given month, accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return None,
    };
    Some(days)
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
