// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use crate::models::{CategoryTotal, IncomeType, MonthlySummary};
use crate::period::YearMonth;
use crate::repo::{DebtRepository, ExpenseRepository, IncomeRepository};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

pub(crate) fn out_of_range(what: &str) -> Error {
    Error::InvalidData(format!("{} exceeds the representable amount", what))
}

/// `part / whole`, or zero when there is nothing to divide by. A quotient
/// too large for `Decimal` is an error.
pub fn ratio_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole).ok_or_else(|| out_of_range("ratio"))
}

/// `part / whole * 100`, or zero when there is nothing to divide by.
pub fn percent_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    ratio_of(part, whole)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| out_of_range("ratio"))
}

/// Money-flow totals for one user and one calendar month.
#[derive(Clone, Copy)]
pub struct FinanceService<'a> {
    incomes: &'a dyn IncomeRepository,
    expenses: &'a dyn ExpenseRepository,
    debts: &'a dyn DebtRepository,
}

impl<'a> FinanceService<'a> {
    pub fn new(
        incomes: &'a dyn IncomeRepository,
        expenses: &'a dyn ExpenseRepository,
        debts: &'a dyn DebtRepository,
    ) -> Self {
        FinanceService {
            incomes,
            expenses,
            debts,
        }
    }

    fn income_of(&self, user_id: &str, period: YearMonth, kind: Option<IncomeType>) -> Result<Decimal> {
        let incomes = self.incomes.find_by_month(user_id, period)?;
        Ok(incomes
            .iter()
            .filter(|i| kind.is_none_or(|k| i.r#type == k))
            .map(|i| i.amount)
            .sum())
    }

    pub fn total_real_income(&self, user_id: &str, month: u32, year: i32) -> Result<Decimal> {
        self.income_of(user_id, YearMonth::new(year, month)?, Some(IncomeType::Real))
    }

    pub fn total_estimated_income(&self, user_id: &str, month: u32, year: i32) -> Result<Decimal> {
        self.income_of(user_id, YearMonth::new(year, month)?, Some(IncomeType::Estimated))
    }

    pub fn total_income(&self, user_id: &str, month: u32, year: i32) -> Result<Decimal> {
        self.income_of(user_id, YearMonth::new(year, month)?, None)
    }

    pub fn total_expenses(&self, user_id: &str, month: u32, year: i32) -> Result<Decimal> {
        let expenses = self
            .expenses
            .find_by_month(user_id, YearMonth::new(year, month)?)?;
        Ok(expenses.iter().map(|e| e.amount).sum())
    }

    /// Full installment of every active debt whose span covers the first day
    /// of the month. No pro-rating, and remaining installments are ignored.
    pub fn total_debt_impact(&self, user_id: &str, month: u32, year: i32) -> Result<Decimal> {
        let period = YearMonth::new(year, month)?;
        let debts = self.debts.find_active(user_id)?;
        Ok(debts
            .iter()
            .filter(|d| d.impacts(period))
            .map(|d| d.installment_value)
            .sum())
    }

    pub fn projected_balance(&self, user_id: &str, month: u32, year: i32) -> Result<Decimal> {
        let real = self.total_real_income(user_id, month, year)?;
        let estimated = self.total_estimated_income(user_id, month, year)?;
        let expenses = self.total_expenses(user_id, month, year)?;
        let debt = self.total_debt_impact(user_id, month, year)?;
        Ok(real + estimated - expenses - debt)
    }

    pub fn get_monthly_summary(&self, user_id: &str, month: u32, year: i32) -> Result<MonthlySummary> {
        let total_income = self.total_income(user_id, month, year)?;
        let total_estimated_income = self.total_estimated_income(user_id, month, year)?;
        let total_expenses = self.total_expenses(user_id, month, year)?;
        let total_debt_impact = self.total_debt_impact(user_id, month, year)?;
        debug!(
            user_id,
            month,
            year,
            %total_income,
            %total_expenses,
            %total_debt_impact,
            "monthly summary"
        );

        Ok(MonthlySummary {
            month,
            year,
            total_income,
            total_estimated_income,
            total_expenses,
            total_debt_impact,
            balance: total_income - total_expenses,
            projected_balance: total_income - total_expenses - total_debt_impact,
            savings_rate: percent_of(total_income - total_expenses, total_income)?,
            debt_ratio: percent_of(total_debt_impact, total_income)?,
            expense_ratio: percent_of(total_expenses, total_income)?,
        })
    }

    /// Month's spending per category id, in no particular order.
    pub fn get_expenses_by_category(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Vec<CategoryTotal>> {
        let expenses = self
            .expenses
            .find_by_month(user_id, YearMonth::new(year, month)?)?;
        let mut agg: HashMap<i64, Decimal> = HashMap::new();
        for e in expenses {
            *agg.entry(e.category_id).or_insert(Decimal::ZERO) += e.amount;
        }
        Ok(agg
            .into_iter()
            .map(|(category_id, total)| CategoryTotal { category_id, total })
            .collect())
    }
}
