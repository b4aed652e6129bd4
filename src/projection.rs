// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::finance::{FinanceService, ratio_of};
use crate::models::{ExpenseSimulation, MonthlyProjection};
use crate::period::YearMonth;
use rust_decimal::Decimal;
use tracing::debug;

/// A month is tight when less than 10% of income is left over.
pub const TIGHT_MARGIN: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Months before "now" averaged for future projections.
pub const AVERAGE_WINDOW: i32 = 3;

pub const DEFAULT_HORIZON: usize = 6;

/// Monthly outlook: actual totals up to the current month, trailing
/// averages after it. Debt impact is always exact.
#[derive(Clone, Copy)]
pub struct ProjectionService<'a> {
    finance: FinanceService<'a>,
}

impl<'a> ProjectionService<'a> {
    pub fn new(finance: FinanceService<'a>) -> Self {
        ProjectionService { finance }
    }

    pub fn project_month(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
        now: YearMonth,
    ) -> Result<MonthlyProjection> {
        let period = YearMonth::new(year, month)?;
        self.project_period(user_id, period, now, &mut None)
    }

    /// `average` is filled on first use and shared by every future month of
    /// a batch, since the window is anchored at `now` rather than at the
    /// projected month.
    fn project_period(
        &self,
        user_id: &str,
        period: YearMonth,
        now: YearMonth,
        average: &mut Option<(Decimal, Decimal)>,
    ) -> Result<MonthlyProjection> {
        let (income, expenses) = if period <= now {
            (
                self.finance
                    .total_income(user_id, period.month(), period.year())?,
                self.finance
                    .total_expenses(user_id, period.month(), period.year())?,
            )
        } else {
            match *average {
                Some(avg) => avg,
                None => {
                    let avg = self.trailing_average(user_id, now)?;
                    *average = Some(avg);
                    avg
                }
            }
        };
        let debt_impact = self
            .finance
            .total_debt_impact(user_id, period.month(), period.year())?;
        let balance = income - expenses - debt_impact;
        let is_tight = income > Decimal::ZERO && ratio_of(balance, income)? < TIGHT_MARGIN;

        Ok(MonthlyProjection {
            month: period.month(),
            year: period.year(),
            label: period.label(),
            projected_income: income,
            projected_expenses: expenses,
            projected_balance: balance,
            is_negative: balance < Decimal::ZERO,
            is_tight,
        })
    }

    /// Mean income and mean expenses over the months just before `now`.
    /// Each series only counts its own non-zero months.
    fn trailing_average(&self, user_id: &str, now: YearMonth) -> Result<(Decimal, Decimal)> {
        let (mut income_total, mut income_count) = (Decimal::ZERO, 0u32);
        let (mut expense_total, mut expense_count) = (Decimal::ZERO, 0u32);
        for i in 1..=AVERAGE_WINDOW {
            let p = now.shift(-i);
            let income = self.finance.total_income(user_id, p.month(), p.year())?;
            if income > Decimal::ZERO {
                income_total += income;
                income_count += 1;
            }
            let expenses = self.finance.total_expenses(user_id, p.month(), p.year())?;
            if expenses > Decimal::ZERO {
                expense_total += expenses;
                expense_count += 1;
            }
        }
        let mean = |total: Decimal, count: u32| {
            if count == 0 {
                Decimal::ZERO
            } else {
                total / Decimal::from(count)
            }
        };
        let avg = (mean(income_total, income_count), mean(expense_total, expense_count));
        debug!(user_id, %now, income = %avg.0, expenses = %avg.1, "trailing average");
        Ok(avg)
    }

    fn project_range(
        &self,
        user_id: &str,
        first: YearMonth,
        n: usize,
        now: YearMonth,
    ) -> Result<Vec<MonthlyProjection>> {
        let mut average = None;
        first
            .range(n)
            .into_iter()
            .map(|p| self.project_period(user_id, p, now, &mut average))
            .collect()
    }

    /// `months` consecutive projections starting at the current month.
    pub fn project_next_months(
        &self,
        user_id: &str,
        months: usize,
        now: YearMonth,
    ) -> Result<Vec<MonthlyProjection>> {
        debug!(user_id, months, %now, "projecting ahead");
        self.project_range(user_id, now, months, now)
    }

    pub fn get_negative_months(
        &self,
        user_id: &str,
        months: usize,
        now: YearMonth,
    ) -> Result<Vec<MonthlyProjection>> {
        Ok(self
            .project_next_months(user_id, months, now)?
            .into_iter()
            .filter(|p| p.is_negative)
            .collect())
    }

    /// Tight months that are not already negative.
    pub fn get_tight_months(
        &self,
        user_id: &str,
        months: usize,
        now: YearMonth,
    ) -> Result<Vec<MonthlyProjection>> {
        Ok(self
            .project_next_months(user_id, months, now)?
            .into_iter()
            .filter(|p| p.is_tight && !p.is_negative)
            .collect())
    }

    /// The twelve months ending at `now`, oldest first.
    pub fn get_last_12_months_history(
        &self,
        user_id: &str,
        now: YearMonth,
    ) -> Result<Vec<MonthlyProjection>> {
        self.project_range(user_id, now.shift(-11), 12, now)
    }

    /// What-if on the aggregator balance (real + estimated income), not on
    /// the averaged projection.
    pub fn simulate_expense(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
        additional_expense: Decimal,
    ) -> Result<ExpenseSimulation> {
        let original_balance = self.finance.projected_balance(user_id, month, year)?;
        let new_balance = original_balance - additional_expense;
        Ok(ExpenseSimulation {
            original_balance,
            new_balance,
            difference: -additional_expense,
            is_still_positive: new_balance >= Decimal::ZERO,
        })
    }
}
