// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::finance::FinanceService;
use crate::models::{Debt, DebtPatch, DebtStatus};
use crate::period::YearMonth;
use crate::repo::DebtRepository;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct DebtOverview {
    pub active: Vec<Debt>,
    pub paid: Vec<Debt>,
    /// Outstanding installments times installment value, active debts only.
    pub total_remaining: Decimal,
    pub total_monthly_impact: Decimal,
}

#[derive(Clone, Copy)]
pub struct DebtService<'a> {
    debts: &'a dyn DebtRepository,
    finance: FinanceService<'a>,
}

impl<'a> DebtService<'a> {
    pub fn new(debts: &'a dyn DebtRepository, finance: FinanceService<'a>) -> Self {
        DebtService { debts, finance }
    }

    /// Counts one installment as paid; the debt flips to `paid` at zero.
    pub fn pay_installment(&self, id: i64) -> Result<Option<Debt>> {
        let Some(debt) = self.debts.find_by_id(id)? else {
            return Ok(None);
        };
        let remaining = debt.remaining_installments.saturating_sub(1);
        let status = if remaining == 0 {
            DebtStatus::Paid
        } else {
            DebtStatus::Active
        };
        let updated = self.debts.update(
            id,
            DebtPatch {
                remaining_installments: Some(remaining),
                status: Some(status),
                ..Default::default()
            },
        )?;
        info!(debt_id = id, remaining, status = status.as_str(), "installment paid");
        Ok(updated)
    }

    pub fn mark_as_paid(&self, id: i64) -> Result<Option<Debt>> {
        let updated = self.debts.update(
            id,
            DebtPatch {
                remaining_installments: Some(0),
                status: Some(DebtStatus::Paid),
                ..Default::default()
            },
        )?;
        if updated.is_some() {
            info!(debt_id = id, "debt settled");
        }
        Ok(updated)
    }

    pub fn overview(&self, user_id: &str, now: YearMonth) -> Result<DebtOverview> {
        let (active, paid): (Vec<Debt>, Vec<Debt>) = self
            .debts
            .find_by_user(user_id)?
            .into_iter()
            .partition(|d| d.status == DebtStatus::Active);
        let total_remaining = active
            .iter()
            .map(|d| Decimal::from(d.remaining_installments) * d.installment_value)
            .sum();
        let total_monthly_impact = self
            .finance
            .total_debt_impact(user_id, now.month(), now.year())?;
        Ok(DebtOverview {
            active,
            paid,
            total_remaining,
            total_monthly_impact,
        })
    }
}
