//! Pure calendar math for accrual periods. No time zones, no clock access.

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::{Result, ScheduleError};

/// parse a `"YYYY-M-D"` date string
///
/// Malformed text is a `Format` error; a well-formed string naming an
/// impossible calendar date (month 13, day 32, Feb 30) is `InvalidDate`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let format_err = || ScheduleError::Format {
        input: input.to_string(),
    };

    let parts: Vec<&str> = input.trim().split('-').collect();
    if parts.len() != 3 {
        return Err(format_err());
    }

    let year: i32 = parts[0].parse().map_err(|_| format_err())?;
    let month: u32 = parts[1].parse().map_err(|_| format_err())?;
    let day: u32 = parts[2].parse().map_err(|_| format_err())?;

    date_from_ymd(year, month, day)
}

/// canonical `"YYYY-M-D"` rendering, no zero padding
///
/// Round-trips through [`parse_date`].
pub fn format_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// build a date, failing with `InvalidDate` rather than clamping
pub fn date_from_ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ScheduleError::InvalidDate { year, month, day })
}

/// signed day count `b - a`
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Gregorian leap-year rule applied to the date's year
pub fn is_leap_year(date: NaiveDate) -> bool {
    let year = date.year();
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// advance by `n` calendar months, answering the new `(year, month)` pair
///
/// The day-of-month is deliberately not part of the result: billing anchors
/// to a configured due day, so the caller re-supplies it via
/// [`date_from_ymd`] after advancing.
pub fn add_months(date: NaiveDate, n: u32) -> (i32, u32) {
    let total = (date.month() - 1) + n;
    (date.year() + (total / 12) as i32, total % 12 + 1)
}

/// the day before
pub fn yesterday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}

/// same month and day, one year earlier
///
/// Feb 29 minus a year is not a calendar date and fails with `InvalidDate`.
pub fn subtract_one_year(date: NaiveDate) -> Result<NaiveDate> {
    date_from_ymd(date.year() - 1, date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_and_format_round_trip() {
        for s in ["2014-3-10", "2020-12-31", "1999-1-1"] {
            assert_eq!(format_date(parse_date(s).unwrap()), s);
        }
        // zero-padded input parses, canonical form drops the padding
        assert_eq!(format_date(parse_date("2014-03-05").unwrap()), "2014-3-5");
    }

    #[test]
    fn test_parse_malformed() {
        for s in ["", "2014", "2014-3", "2014-3-10-4", "abcd-3-10", "2014-x-1"] {
            assert!(matches!(parse_date(s), Err(ScheduleError::Format { .. })), "{s}");
        }
    }

    #[test]
    fn test_parse_invalid_calendar_date() {
        for s in ["2014-13-1", "2014-2-30", "2015-2-29", "2014-1-32", "2014-0-1"] {
            assert!(
                matches!(parse_date(s), Err(ScheduleError::InvalidDate { .. })),
                "{s}"
            );
        }
        // but Feb 29 exists in leap years
        assert!(parse_date("2016-2-29").is_ok());
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(d("2005-1-1"), d("2005-12-31")), 364);
        assert_eq!(days_between(d("2005-1-1"), d("2005-1-1")), 0);
        assert_eq!(days_between(d("2005-1-2"), d("2005-1-1")), -1);
        // spans Feb 29
        assert_eq!(days_between(d("2020-2-1"), d("2020-3-1")), 29);
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(d("1996-3-10")));
        assert!(is_leap_year(d("2000-1-1")));
        assert!(is_leap_year(d("2400-10-12")));
        assert!(!is_leap_year(d("1900-6-1")));
        assert!(!is_leap_year(d("2100-1-14")));
        assert!(!is_leap_year(d("2015-1-14")));
    }

    #[test]
    fn test_add_months() {
        assert_eq!(add_months(d("2014-3-10"), 1), (2014, 4));
        assert_eq!(add_months(d("2014-11-10"), 3), (2015, 2));
        assert_eq!(add_months(d("2014-12-31"), 1), (2015, 1));
        assert_eq!(add_months(d("2014-1-10"), 25), (2016, 2));
        // day is the caller's problem: Jan 31 stepping into February is fine
        // because only (year, month) is answered
        assert_eq!(add_months(d("2014-1-31"), 1), (2014, 2));
    }

    #[test]
    fn test_yesterday_and_subtract_one_year() {
        assert_eq!(yesterday(d("2015-1-1")), d("2014-12-31"));
        assert_eq!(yesterday(d("2016-3-1")), d("2016-2-29"));
        assert_eq!(subtract_one_year(d("2015-1-12")).unwrap(), d("2014-1-12"));
        assert!(matches!(
            subtract_one_year(d("2016-2-29")),
            Err(ScheduleError::InvalidDate { .. })
        ));
    }
}
