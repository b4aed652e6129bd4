// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A calendar month, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidPeriod { month });
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(YearMonth)
            .ok_or(Error::InvalidPeriod { month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        YearMonth(date - Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.0 + Months::new(1) - Days::new(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day() <= date && date <= self.last_day()
    }

    /// Moves `delta` months forward (or backward when negative).
    pub fn shift(&self, delta: i32) -> Self {
        if delta >= 0 {
            YearMonth(self.0 + Months::new(delta.unsigned_abs()))
        } else {
            YearMonth(self.0 - Months::new(delta.unsigned_abs()))
        }
    }

    /// `n` consecutive months starting at `self`, oldest first.
    pub fn range(&self, n: usize) -> Vec<YearMonth> {
        (0..n as i32).map(|i| self.shift(i)).collect()
    }

    /// Short chart label such as `Mar/25`.
    pub fn label(&self) -> String {
        self.0.format("%b/%y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|_| Error::InvalidData(format!("Invalid month '{}', expected YYYY-MM", s)))?;
        Ok(YearMonth(date))
    }
}

/// Calendar month addition; the day is clamped to the end of the target month.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date + Months::new(months)
}
