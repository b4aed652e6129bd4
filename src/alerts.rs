// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::finance::{FinanceService, ratio_of};
use crate::models::{AlertType, FinancialAlert};
use crate::period::YearMonth;
use crate::projection::ProjectionService;
use crate::savings::SavingsService;
use crate::utils::{fmt_money, fmt_percent, round_half_up};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

pub const HIGH_EXPENSE: &str = "high-expense";
pub const MODERATE_EXPENSE: &str = "moderate-expense";
pub const NEGATIVE_BALANCE: &str = "negative-balance";
pub const HIGH_DEBT: &str = "high-debt";
pub const LOW_EMERGENCY_FUND: &str = "low-emergency-fund";
pub const FUTURE_NEGATIVE: &str = "future-negative";
pub const GOOD_SAVINGS: &str = "good-savings";

const HIGH_EXPENSE_RATIO: i64 = 80;
const MODERATE_EXPENSE_RATIO: i64 = 60;
const DEBT_RATIO_LIMIT: i64 = 30;
const RESERVE_MONTHS_MIN: i64 = 3;
const LOOKAHEAD_MONTHS: usize = 3;
const GOOD_SAVINGS_RATE: i64 = 20;

// Financial freedom index weights and saturation points.
const SAVINGS_WEIGHT: i64 = 40;
const SAVINGS_TARGET: i64 = 30;
const DEBT_WEIGHT: i64 = 30;
const DEBT_CEILING: i64 = 50;
const RESERVE_WEIGHT: i64 = 30;
const RESERVE_TARGET: i64 = 6;

/// Months of spending the reserve covers; `None` for a month without spending.
fn reserve_months(total_savings: Decimal, total_expenses: Decimal) -> Result<Option<Decimal>> {
    if total_expenses > Decimal::ZERO {
        ratio_of(total_savings, total_expenses).map(Some)
    } else {
        Ok(None)
    }
}

#[derive(Clone, Copy)]
pub struct AlertService<'a> {
    finance: FinanceService<'a>,
    savings: SavingsService<'a>,
    projection: ProjectionService<'a>,
}

fn alert(
    id: &str,
    r#type: AlertType,
    title: &str,
    message: String,
    at: NaiveDateTime,
) -> FinancialAlert {
    FinancialAlert {
        id: id.to_string(),
        r#type,
        title: title.to_string(),
        message,
        created_at: at,
    }
}

impl<'a> AlertService<'a> {
    pub fn new(
        finance: FinanceService<'a>,
        savings: SavingsService<'a>,
        projection: ProjectionService<'a>,
    ) -> Self {
        AlertService {
            finance,
            savings,
            projection,
        }
    }

    /// Every rule that applies, in a fixed order. Only the two expense-ratio
    /// rules exclude each other.
    pub fn generate_alerts(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
        now: NaiveDateTime,
    ) -> Result<Vec<FinancialAlert>> {
        let today = YearMonth::from_date(now.date());
        let summary = self.finance.get_monthly_summary(user_id, month, year)?;
        let mut alerts = Vec::new();

        if summary.expense_ratio > Decimal::from(HIGH_EXPENSE_RATIO) {
            alerts.push(alert(
                HIGH_EXPENSE,
                AlertType::Danger,
                "High spending",
                format!(
                    "You have committed {}% of your income to expenses this month.",
                    fmt_percent(summary.expense_ratio)
                ),
                now,
            ));
        } else if summary.expense_ratio > Decimal::from(MODERATE_EXPENSE_RATIO) {
            alerts.push(alert(
                MODERATE_EXPENSE,
                AlertType::Warning,
                "Watch your spending",
                format!(
                    "{}% of your income is already committed to expenses.",
                    fmt_percent(summary.expense_ratio)
                ),
                now,
            ));
        }

        let projection = self.projection.project_month(user_id, month, year, today)?;
        if projection.projected_balance < Decimal::ZERO {
            alerts.push(alert(
                NEGATIVE_BALANCE,
                AlertType::Danger,
                "Negative balance projected",
                format!(
                    "This month's projection shows a negative balance of {}.",
                    fmt_money(projection.projected_balance.abs())
                ),
                now,
            ));
        }

        if summary.debt_ratio > Decimal::from(DEBT_RATIO_LIMIT) {
            alerts.push(alert(
                HIGH_DEBT,
                AlertType::Danger,
                "Debt above limit",
                format!(
                    "Your debts take {}% of your income (recommended limit: {}%).",
                    fmt_percent(summary.debt_ratio),
                    DEBT_RATIO_LIMIT
                ),
                now,
            ));
        }

        let total_savings = self.savings.get_total_savings(user_id)?;
        let reserve = reserve_months(total_savings, summary.total_expenses)?;
        if let Some(months_covered) = reserve.filter(|m| *m < Decimal::from(RESERVE_MONTHS_MIN)) {
            alerts.push(alert(
                LOW_EMERGENCY_FUND,
                AlertType::Warning,
                "Emergency fund too small",
                format!(
                    "Your reserve covers only {:.1} month(s). Recommended: at least {} months.",
                    round_half_up(months_covered, 1),
                    RESERVE_MONTHS_MIN
                ),
                now,
            ));
        }

        let future_negative = self
            .projection
            .get_negative_months(user_id, LOOKAHEAD_MONTHS, today)?;
        if !future_negative.is_empty() {
            alerts.push(alert(
                FUTURE_NEGATIVE,
                AlertType::Warning,
                "Upcoming months at risk",
                format!(
                    "{} upcoming month(s) with a negative projected balance.",
                    future_negative.len()
                ),
                now,
            ));
        }

        if summary.savings_rate >= Decimal::from(GOOD_SAVINGS_RATE) {
            alerts.push(alert(
                GOOD_SAVINGS,
                AlertType::Info,
                "Great savings rate!",
                format!(
                    "You are saving {}% of your income. Keep it up!",
                    fmt_percent(summary.savings_rate)
                ),
                now,
            ));
        }

        debug!(user_id, month, year, count = alerts.len(), "alerts generated");
        Ok(alerts)
    }

    /// Composite 0-100 score from savings rate, debt burden and reserve
    /// coverage. Zero when the month has no income.
    pub fn get_financial_freedom_index(&self, user_id: &str, month: u32, year: i32) -> Result<u8> {
        let summary = self.finance.get_monthly_summary(user_id, month, year)?;
        let total_savings = self.savings.get_total_savings(user_id)?;
        if summary.total_income.is_zero() {
            return Ok(0);
        }
        let one = Decimal::ONE;
        let savings_score = (summary.savings_rate / Decimal::from(SAVINGS_TARGET)).min(one)
            * Decimal::from(SAVINGS_WEIGHT);
        let debt_score = (one - summary.debt_ratio / Decimal::from(DEBT_CEILING))
            .max(Decimal::ZERO)
            * Decimal::from(DEBT_WEIGHT);
        let covered =
            reserve_months(total_savings, summary.total_expenses)?.unwrap_or(Decimal::ZERO);
        let reserve_score = (covered / Decimal::from(RESERVE_TARGET)).min(one)
            * Decimal::from(RESERVE_WEIGHT);

        // A negative savings rate can pull the sum below zero.
        let index = round_half_up(savings_score + debt_score + reserve_score, 0)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        Ok(index.to_u8().unwrap_or(0))
    }
}
