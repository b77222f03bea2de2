//! # Month Dates
//!
//! Subscriptions are billed by month, so every date in the system has month
//! granularity. The wire format is `"MM-YYYY"` and nothing else.
//!
//! ```text
//! "03-2024" ──► MonthDate(2024-03-01) ──► TIMESTAMP '2024-03-01 00:00:00'
//! "3-2024"  ──► InvalidDate
//! "2024-03" ──► InvalidDate
//! "13-2024" ──► InvalidDate
//! ```

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SubscriptionError;

/// A calendar month, stored as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDate(NaiveDate);

impl MonthDate {
    /// Builds a month date from a year and a 1-based month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(MonthDate)
    }

    /// Parses the `"MM-YYYY"` wire format.
    ///
    /// ## Rules
    /// - exactly two month digits, `01` through `12`
    /// - a single `-`
    /// - exactly four year digits
    pub fn parse(input: &str) -> Result<Self, SubscriptionError> {
        let (month, year) = input.split_once('-').ok_or(SubscriptionError::InvalidDate)?;

        if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SubscriptionError::InvalidDate);
        }
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SubscriptionError::InvalidDate);
        }

        let month: u32 = month.parse().map_err(|_| SubscriptionError::InvalidDate)?;
        let year: i32 = year.parse().map_err(|_| SubscriptionError::InvalidDate)?;

        MonthDate::new(year, month).ok_or(SubscriptionError::InvalidDate)
    }

    /// Truncates a stored timestamp to its month.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        let date = value.date();
        // Day 1 exists in every month.
        MonthDate(date.with_day(1).unwrap_or(date))
    }

    /// Midnight on the first day of the month.
    pub fn to_datetime(self) -> NaiveDateTime {
        self.0.and_time(chrono::NaiveTime::MIN)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for MonthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl Serialize for MonthDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MonthDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}
