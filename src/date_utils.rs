use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::error::{CalendarError, Result};

/// ISO calendar date format used for every string boundary and cache key.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Convert a Gregorian date to Julian Day Number (JDN)
pub fn gregorian_to_jdn(year: i32, month: u32, day: u32) -> i64 {
    let (year, month, day) = (year as i64, month as i64, day as i64);
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + ((153 * m + 2) / 5) + 365 * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
        - 32045
}

pub fn julian_day_number(date: NaiveDate) -> i64 {
    gregorian_to_jdn(date.year(), date.month(), date.day())
}

/// Whole calendar days from `from` to `to`; negative when `to` is earlier.
///
/// Both sides are plain local dates, so there is no time-of-day or DST
/// component to round away.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    julian_day_number(to) - julian_day_number(from)
}

/// True modulo: the result is always in `[0, n)` for positive `n`.
pub fn modulo(a: i64, n: i64) -> i64 {
    ((a % n) + n) % n
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `date` shifted by `days`; `InvalidDate` when the result leaves chrono's range.
pub fn offset_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| CalendarError::InvalidDate(format!("{} {:+} days", date, days)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a strict `YYYY-MM-DD` string.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    let bytes = trimmed.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(CalendarError::InvalidDate(input.to_string()));
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| CalendarError::InvalidDate(input.to_string()))
}

/// Parse an optional date, falling back to `default` when absent or blank.
pub fn parse_optional_date(input: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match input {
        Some(s) if !s.trim().is_empty() => parse_date(s),
        _ => Ok(default),
    }
}

pub fn require_birth_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(s) if !s.trim().is_empty() => parse_date(s),
        _ => Err(CalendarError::MissingInput("birth_date")),
    }
}
