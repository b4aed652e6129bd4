// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::alerts::AlertService;
use crate::error::Result;
use crate::finance::FinanceService;
use crate::models::{CategoryBreakdown, FinancialAlert, MonthlySummary};
use crate::repo::CategoryRepository;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Bucket for spending whose category no longer exists.
pub const UNKNOWN_CATEGORY: &str = "Outros";

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub summary: MonthlySummary,
    pub alerts: Vec<FinancialAlert>,
    pub freedom_index: u8,
    pub categories: Vec<CategoryBreakdown>,
}

#[derive(Clone, Copy)]
pub struct DashboardService<'a> {
    finance: FinanceService<'a>,
    alerts: AlertService<'a>,
    categories: &'a dyn CategoryRepository,
}

impl<'a> DashboardService<'a> {
    pub fn new(
        finance: FinanceService<'a>,
        alerts: AlertService<'a>,
        categories: &'a dyn CategoryRepository,
    ) -> Self {
        DashboardService {
            finance,
            alerts,
            categories,
        }
    }

    /// Month's spending per named category, largest first.
    pub fn category_breakdown(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Vec<CategoryBreakdown>> {
        let totals = self.finance.get_expenses_by_category(user_id, month, year)?;
        let known: HashMap<i64, _> = self
            .categories
            .find_by_user(user_id)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let mut rows: Vec<CategoryBreakdown> = totals
            .into_iter()
            .map(|t| match known.get(&t.category_id) {
                Some(c) => CategoryBreakdown {
                    category_id: t.category_id,
                    name: c.name.clone(),
                    color: c.color.clone(),
                    total: t.total,
                },
                None => {
                    warn!(category_id = t.category_id, "expenses reference unknown category");
                    CategoryBreakdown {
                        category_id: t.category_id,
                        name: UNKNOWN_CATEGORY.to_string(),
                        color: None,
                        total: t.total,
                    }
                }
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total).then(a.category_id.cmp(&b.category_id)));
        Ok(rows)
    }

    pub fn load(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
        now: NaiveDateTime,
    ) -> Result<Dashboard> {
        Ok(Dashboard {
            summary: self.finance.get_monthly_summary(user_id, month, year)?,
            alerts: self.alerts.generate_alerts(user_id, month, year, now)?,
            freedom_index: self.alerts.get_financial_freedom_index(user_id, month, year)?,
            categories: self.category_breakdown(user_id, month, year)?,
        })
    }
}
