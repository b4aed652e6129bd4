// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::YearMonth;
use crate::utils::parse_month;
use anyhow::Result;
use chrono::NaiveDateTime;

pub mod config;
pub mod debts;
pub mod expenses;
pub mod exporter;
pub mod incomes;
pub mod reports;
pub mod savings;

/// Who is asking and when.
#[derive(Debug, Clone)]
pub struct Ctx {
    pub user: String,
    pub now: NaiveDateTime,
}

impl Ctx {
    pub fn current_month(&self) -> YearMonth {
        YearMonth::from_date(self.now.date())
    }

    /// `--month` when given, else the month containing `now`.
    pub fn month_arg(&self, m: &clap::ArgMatches) -> Result<YearMonth> {
        match m.get_one::<String>("month") {
            Some(s) => parse_month(s),
            None => Ok(self.current_month()),
        }
    }
}

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    m.get_one::<String>(name)
        .ok_or_else(|| anyhow::anyhow!("Missing --{}", name))
}

pub(crate) fn required_id(m: &clap::ArgMatches) -> Result<i64> {
    m.get_one::<i64>("id")
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Missing --id"))
}
