//! Date window type
//!
//! A closed, day-granular range of calendar dates.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::fmt;

/// Date format used in storage keys and on the command line
pub const KEY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format expected by the POS transaction endpoint
pub const API_DATE_FORMAT: &str = "%Y%m%d";

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), KEY_DATE_FORMAT)
        .map_err(|e| Error::invalid_value("date", format!("'{s}' is not YYYY-MM-DD: {e}")))
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting an end before the start
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::invalid_value(
                "end_date",
                format!("{end} is before start date {start}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Window covering a single day
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Window covering the calendar day before `today`
    pub fn yesterday(today: NaiveDate) -> Self {
        Self::single(today.pred_opt().unwrap_or(today))
    }

    /// First day of the window
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the window covers exactly one day
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Number of days in the window
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// One single-day window per day, in ascending order
    pub fn days(&self) -> impl Iterator<Item = DateWindow> {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |d| *d <= end)
            .map(DateWindow::single)
    }

    /// Start date in the POS API format
    pub fn api_from(&self) -> String {
        self.start.format(API_DATE_FORMAT).to_string()
    }

    /// End date in the POS API format
    pub fn api_to(&self) -> String {
        self.end.format(API_DATE_FORMAT).to_string()
    }

    /// Label used inside storage keys: `<date>` or `<start>_<end>`
    pub fn label(&self) -> String {
        let start = self.start.format(KEY_DATE_FORMAT);
        if self.is_single() {
            start.to_string()
        } else {
            format!("{start}_{}", self.end.format(KEY_DATE_FORMAT))
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
