// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use crate::models::{Income, IncomePatch, IncomeType};
use crate::period::YearMonth;
use crate::repo::IncomeRepository;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct IncomeOverview {
    pub incomes: Vec<Income>,
    pub total_real: Decimal,
    pub total_estimated: Decimal,
    pub total: Decimal,
}

#[derive(Clone, Copy)]
pub struct IncomeService<'a> {
    incomes: &'a dyn IncomeRepository,
}

impl<'a> IncomeService<'a> {
    pub fn new(incomes: &'a dyn IncomeRepository) -> Self {
        IncomeService { incomes }
    }

    /// Confirms an estimate with the amount actually received.
    pub fn convert_to_real(&self, id: i64, actual_amount: Decimal) -> Result<Option<Income>> {
        if actual_amount < Decimal::ZERO {
            return Err(Error::InvalidAmount(actual_amount));
        }
        let updated = self.incomes.update(
            id,
            IncomePatch {
                amount: Some(actual_amount),
                r#type: Some(IncomeType::Real),
                ..Default::default()
            },
        )?;
        if updated.is_some() {
            info!(income_id = id, amount = %actual_amount, "income confirmed as real");
        }
        Ok(updated)
    }

    pub fn overview(&self, user_id: &str, month: u32, year: i32) -> Result<IncomeOverview> {
        let incomes = self
            .incomes
            .find_by_month(user_id, YearMonth::new(year, month)?)?;
        let sum_of = |kind: IncomeType| -> Decimal {
            incomes
                .iter()
                .filter(|i| i.r#type == kind)
                .map(|i| i.amount)
                .sum()
        };
        let total_real = sum_of(IncomeType::Real);
        let total_estimated = sum_of(IncomeType::Estimated);
        Ok(IncomeOverview {
            total: total_real + total_estimated,
            total_real,
            total_estimated,
            incomes,
        })
    }
}
