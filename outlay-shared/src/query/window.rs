//! Date windows
//!
//! All date filtering in the service is half-open: the start instant is
//! included, the end instant is excluded (`start <= date < end`). Days are
//! submitted as `YYYY-MM-DD` strings and anchored to midnight UTC.

use crate::query::FilterError;
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};

/// Layout accepted for date query parameters and expense dates.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` value into the midnight-UTC instant of that day.
///
/// `key` names the offending parameter in the error.
pub fn parse_day(key: &'static str, value: &str) -> Result<DateTime<Utc>, FilterError> {
    let date = NaiveDate::parse_from_str(value, DAY_FORMAT).map_err(|_| {
        FilterError::InvalidDate {
            key: key.to_string(),
            value: value.to_string(),
        }
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// A half-open interval of instants: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// The calendar month containing `now`: first instant of the month
    /// inclusive through the first instant of the next month exclusive.
    ///
    /// This is the default window for queries that accept but did not
    /// receive explicit bounds.
    pub fn month_of(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        // Day 1 of an already-valid month always exists; the fallback is
        // unreachable but keeps this total.
        let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
        let next = first
            .checked_add_months(Months::new(1))
            .unwrap_or(first);
        Self {
            start: first.and_time(NaiveTime::MIN).and_utc(),
            end: next.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// True when `instant` falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}
