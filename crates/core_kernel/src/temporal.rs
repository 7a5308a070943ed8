//! Calendar types for month-keyed cash-flow data
//!
//! Everything here works on calendar dates (`NaiveDate`) in the business
//! timezone. `MonthKey` is the bucketing key used by every aggregate.

use chrono::{Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Timezone wrapper for the business calendar
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s.trim())
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// The current calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.0).date_naive()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid month key: {0}")]
    InvalidMonthKey(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

/// A calendar month, rendered as `YYYY-MM`
///
/// Ordering is chronological, so `BTreeMap<MonthKey, _>` iterates months
/// in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a month key, validating the month number (1-12)
    pub fn new(year: i32, month: u32) -> Result<Self, TemporalError> {
        if !(1..=12).contains(&month) {
            return Err(TemporalError::InvalidMonthKey(format!(
                "{}-{:02}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shifts by `months` calendar months (negative moves backwards)
    pub fn offset(&self, months: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// The following month
    pub fn next(&self) -> Self {
        self.offset(1)
    }

    /// Number of months from `self` to `other` (negative if `other` is earlier)
    pub fn months_until(&self, other: &MonthKey) -> i32 {
        (other.year - self.year) * 12 + (other.month as i32 - self.month as i32)
    }

    pub fn first_day(&self) -> NaiveDate {
        // Month is validated on construction, so the 1st always exists.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let days = days_in_month(self.year, self.month);
        NaiveDate::from_ymd_opt(self.year, self.month, days).unwrap_or(NaiveDate::MAX)
    }

    /// The 15th of the month
    pub fn mid_month(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 15).unwrap_or(NaiveDate::MIN)
    }

    /// Returns true if `date` falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// English long-form label, e.g. "March 2025"
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TemporalError::InvalidMonthKey(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// The last calendar day of the month containing `date`
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    MonthKey::from_date(date).last_day()
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date == last_day_of_month(date)
}

/// Adds calendar months, letting an out-of-range day spill into the next month
///
/// Jan 31 + 1 month is Mar 2 (or Mar 3 in a non-leap year): the day count
/// beyond the target month's length carries forward rather than clamping.
pub fn add_months_overflowing(date: NaiveDate, months: i32) -> Result<NaiveDate, TemporalError> {
    let target = MonthKey::from_date(date).offset(months);
    target
        .first_day()
        .checked_add_days(Days::new(u64::from(date.day() - 1)))
        .ok_or_else(|| TemporalError::OutOfRange(format!("{} + {} months", date, months)))
}

/// Adds calendar months, clamping the day to the target month's length
pub fn add_months_clamped(date: NaiveDate, months: i32) -> NaiveDate {
    let target = MonthKey::from_date(date).offset(months);
    let day = date.day().min(days_in_month(target.year(), target.month()));
    NaiveDate::from_ymd_opt(target.year(), target.month(), day).unwrap_or(target.last_day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_key_ordering_and_display() {
        let a = MonthKey::new(2024, 12).unwrap();
        let b = MonthKey::new(2025, 1).unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "2024-12");
        assert_eq!(a.next(), b);
    }

    #[test]
    fn test_month_key_offset_wraps_years() {
        let key = MonthKey::new(2025, 11).unwrap();
        assert_eq!(key.offset(3), MonthKey::new(2026, 2).unwrap());
        assert_eq!(key.offset(-11), MonthKey::new(2024, 12).unwrap());
        assert_eq!(key.months_until(&key.offset(14)), 14);
    }

    #[test]
    fn test_month_key_parse_rejects_garbage() {
        assert!("2025-13".parse::<MonthKey>().is_err());
        assert!("2025-3".parse::<MonthKey>().is_err());
        assert!("March".parse::<MonthKey>().is_err());
        assert_eq!("2025-03".parse::<MonthKey>().unwrap().label(), "March 2025");
    }

    #[test]
    fn test_last_day_handles_leap_years() {
        assert_eq!(last_day_of_month(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(last_day_of_month(date(2025, 2, 10)), date(2025, 2, 28));
        assert_eq!(last_day_of_month(date(1900, 2, 1)), date(1900, 2, 28));
        assert_eq!(last_day_of_month(date(2000, 2, 1)), date(2000, 2, 29));
    }

    #[test]
    fn test_add_months_overflowing_spills() {
        assert_eq!(add_months_overflowing(date(2025, 1, 31), 1).unwrap(), date(2025, 3, 3));
        assert_eq!(add_months_overflowing(date(2024, 1, 31), 1).unwrap(), date(2024, 3, 2));
        assert_eq!(add_months_overflowing(date(2025, 3, 31), 2).unwrap(), date(2025, 5, 31));
    }

    #[test]
    fn test_add_months_clamped() {
        assert_eq!(add_months_clamped(date(2025, 1, 31), 1), date(2025, 2, 28));
        assert_eq!(add_months_clamped(date(2025, 1, 15), 12), date(2026, 1, 15));
    }

    #[test]
    fn test_month_key_serde_as_string() {
        let key = MonthKey::new(2025, 7).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2025-07\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_timezone_parse() {
        let tz: Timezone = "Asia/Manila".parse().unwrap();
        assert_eq!(tz.0, chrono_tz::Asia::Manila);
        assert!("Mars/Olympus".parse::<Timezone>().is_err());
    }
}
