//! Calendar and date utilities.
//!
//! Month lengths, day clamping, day arithmetic and the [`YearMonth`] value
//! used as the starting point of a payroll configuration.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

/// Returns the number of days in the given month (1-12).
///
/// Returns 0 for a month outside 1-12.
///
/// # Example
///
/// ```
/// use payroll_engine::calendar::days_in_month;
///
/// assert_eq!(days_in_month(2024, 2), 29);
/// assert_eq!(days_in_month(2025, 2), 28);
/// assert_eq!(days_in_month(2025, 4), 30);
/// assert_eq!(days_in_month(2025, 12), 31);
/// ```
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Returns true if `year` is a Gregorian leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Clamps a day-of-month to the length of the month.
///
/// Days below 1 are raised to 1.
pub fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    day.clamp(1, days_in_month(year, month).max(1))
}

/// Returns the first day of the month containing `date`.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Returns the last day of the month containing `date`.
///
/// # Example
///
/// ```
/// use payroll_engine::calendar::last_day_of_month;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
/// assert_eq!(last_day_of_month(date), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let remaining = days_in_month(date.year(), date.month()) - date.day();
    date + Days::new(u64::from(remaining))
}

/// Adds a non-negative number of days, returning `None` past the end of the calendar.
pub fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

/// Number of whole days from `from` to `to` (negative if `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// A calendar month, written `YYYY-MM`.
///
/// Internally stored as the first day of the month, so every value is a
/// real date.
///
/// # Example
///
/// ```
/// use payroll_engine::calendar::YearMonth;
///
/// let start: YearMonth = "2025-11".parse().unwrap();
/// let next = start.add_months(3).unwrap();
/// assert_eq!(next.to_string(), "2026-02");
/// assert_eq!(next.day_clamped(31).to_string(), "2026-02-28");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Creates a year-month, validating the month number.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| EngineError::InvalidConfiguration {
                message: format!("{year:04}-{month:02} is not a valid year and month"),
            })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The month number (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the date for `day` in this month, clamped to the month's length.
    pub fn day_clamped(&self, day: u32) -> NaiveDate {
        let day = clamp_day(self.year(), self.month(), day);
        self.0 + Days::new(u64::from(day - 1))
    }

    /// Returns the month `months` after this one.
    pub fn add_months(&self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Self)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidConfiguration {
            message: format!("start_year_month '{s}' must be in YYYY-MM format"),
        };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self(first_day_of_month(date))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month_thirty_day_months() {
        for month in [4, 6, 9, 11] {
            assert_eq!(days_in_month(2025, month), 30);
        }
    }

    #[test]
    fn test_days_in_february_leap_rules() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
    }

    #[test]
    fn test_days_in_invalid_month_is_zero() {
        assert_eq!(days_in_month(2025, 13), 0);
    }

    #[test]
    fn test_clamp_day_to_month_end() {
        assert_eq!(clamp_day(2025, 4, 31), 30);
        assert_eq!(clamp_day(2025, 2, 30), 28);
        assert_eq!(clamp_day(2025, 1, 31), 31);
        assert_eq!(clamp_day(2025, 1, 0), 1);
    }

    #[test]
    fn test_first_and_last_day_of_month() {
        assert_eq!(first_day_of_month(date(2025, 6, 17)), date(2025, 6, 1));
        assert_eq!(last_day_of_month(date(2025, 6, 17)), date(2025, 6, 30));
        assert_eq!(last_day_of_month(date(2025, 12, 31)), date(2025, 12, 31));
    }

    #[test]
    fn test_add_days_crosses_month() {
        assert_eq!(add_days(date(2025, 3, 31), 5), Some(date(2025, 4, 5)));
    }

    #[test]
    fn test_days_between_is_signed() {
        assert_eq!(days_between(date(2025, 1, 1), date(2025, 1, 20)), 19);
        assert_eq!(days_between(date(2025, 1, 20), date(2025, 1, 1)), -19);
    }

    #[test]
    fn test_parse_year_month() {
        let ym: YearMonth = "2025-03".parse().unwrap();
        assert_eq!(ym.year(), 2025);
        assert_eq!(ym.month(), 3);
        assert_eq!(ym.day_clamped(31), date(2025, 3, 31));
        assert_eq!(ym.day_clamped(1), date(2025, 3, 1));
    }

    #[test]
    fn test_parse_year_month_rejects_bad_formats() {
        for raw in ["2025-3", "25-03", "2025/03", "2025-13", "2025-00", "abcd-ef", ""] {
            let result: EngineResult<YearMonth> = raw.parse();
            assert!(
                matches!(result, Err(EngineError::InvalidConfiguration { .. })),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_add_months_rolls_over_year() {
        let ym: YearMonth = "2025-11".parse().unwrap();
        assert_eq!(ym.add_months(2).unwrap().to_string(), "2026-01");
        assert_eq!(ym.add_months(0).unwrap(), ym);
    }

    #[test]
    fn test_day_clamped() {
        let april: YearMonth = "2025-04".parse().unwrap();
        assert_eq!(april.day_clamped(31), date(2025, 4, 30));
        assert_eq!(april.day_clamped(16), date(2025, 4, 16));
    }

    #[test]
    fn test_year_month_serde_as_string() {
        let ym: YearMonth = "2025-03".parse().unwrap();
        assert_eq!(serde_json::to_string(&ym).unwrap(), "\"2025-03\"");
        let back: YearMonth = serde_json::from_str("\"2025-03\"").unwrap();
        assert_eq!(back, ym);
        assert!(serde_json::from_str::<YearMonth>("\"2025-3\"").is_err());
    }

    #[test]
    fn test_year_month_from_date() {
        let ym = YearMonth::from(date(2024, 2, 29));
        assert_eq!(ym.to_string(), "2024-02");
    }
}
