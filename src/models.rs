// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Error;
use crate::period::YearMonth;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeType {
    Real,
    Estimated,
}

impl IncomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeType::Real => "real",
            IncomeType::Estimated => "estimated",
        }
    }
}

impl FromStr for IncomeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "real" => Ok(IncomeType::Real),
            "estimated" => Ok(IncomeType::Estimated),
            other => Err(Error::InvalidData(format!("Unknown income type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Fixed,
    Variable,
    Investment,
    Debt,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Fixed => "fixed",
            CategoryType::Variable => "variable",
            CategoryType::Investment => "investment",
            CategoryType::Debt => "debt",
        }
    }
}

impl FromStr for CategoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(CategoryType::Fixed),
            "variable" => Ok(CategoryType::Variable),
            "investment" => Ok(CategoryType::Investment),
            "debt" => Ok(CategoryType::Debt),
            other => Err(Error::InvalidData(format!("Unknown category type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    Active,
    Paid,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Active => "active",
            DebtStatus::Paid => "paid",
        }
    }
}

impl FromStr for DebtStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(DebtStatus::Active),
            "paid" => Ok(DebtStatus::Paid),
            other => Err(Error::InvalidData(format!("Unknown debt status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Deposit,
    Withdraw,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Deposit => "deposit",
            MovementType::Withdraw => "withdraw",
        }
    }
}

impl FromStr for MovementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(MovementType::Deposit),
            "withdraw" => Ok(MovementType::Withdraw),
            other => Err(Error::InvalidData(format!("Unknown movement type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Warning,
    Danger,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub month: u32, // 1-12
    pub year: i32,
    pub r#type: IncomeType,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewIncome {
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub r#type: IncomeType,
}

#[derive(Debug, Clone, Default)]
pub struct IncomePatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub r#type: Option<IncomeType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub category_id: i64,
    pub date: NaiveDate,
    pub is_fixed: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub category_id: i64,
    pub date: NaiveDate,
    pub is_fixed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub is_fixed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub r#type: CategoryType,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub user_id: String,
    pub name: String,
    pub r#type: CategoryType,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub user_id: String,
    pub description: String,
    pub total_amount: Decimal,
    pub installment_value: Decimal,
    pub total_installments: u32,
    pub remaining_installments: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate, // start_date + total_installments months, fixed at creation
    pub status: DebtStatus,
    pub created_at: NaiveDateTime,
}

impl Debt {
    /// Whether this debt weighs on `period`: active and spanning its first day.
    /// `remaining_installments` plays no part.
    pub fn impacts(&self, period: YearMonth) -> bool {
        let first = period.first_day();
        self.status == DebtStatus::Active && self.start_date <= first && first <= self.end_date
    }
}

#[derive(Debug, Clone)]
pub struct NewDebt {
    pub user_id: String,
    pub description: String,
    pub total_amount: Decimal,
    pub installment_value: Decimal,
    pub total_installments: u32,
    pub remaining_installments: u32,
    pub start_date: NaiveDate,
    pub status: DebtStatus,
}

#[derive(Debug, Clone, Default)]
pub struct DebtPatch {
    pub description: Option<String>,
    pub total_amount: Option<Decimal>,
    pub installment_value: Option<Decimal>,
    pub total_installments: Option<u32>,
    pub remaining_installments: Option<u32>,
    pub status: Option<DebtStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsAccount {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub current_amount: Decimal,
    pub annual_yield_rate: Decimal, // percent, 12 = 12%
    pub monthly_yield_rate: f64,
    pub daily_yield_rate: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewSavingsAccount {
    pub user_id: String,
    pub name: String,
    pub current_amount: Decimal,
    pub annual_yield_rate: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct SavingsAccountPatch {
    pub name: Option<String>,
    pub current_amount: Option<Decimal>,
    pub annual_yield_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsTransaction {
    pub id: i64,
    pub savings_account_id: i64,
    pub amount: Decimal,
    pub r#type: MovementType,
    pub date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSavingsTransaction {
    pub savings_account_id: i64,
    pub amount: Decimal,
    pub r#type: MovementType,
    pub date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    pub total_income: Decimal,
    pub total_estimated_income: Decimal,
    pub total_expenses: Decimal,
    pub total_debt_impact: Decimal,
    pub balance: Decimal,
    pub projected_balance: Decimal,
    pub savings_rate: Decimal,
    pub debt_ratio: Decimal,
    pub expense_ratio: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub month: u32,
    pub year: i32,
    pub label: String,
    pub projected_income: Decimal,
    pub projected_expenses: Decimal,
    pub projected_balance: Decimal,
    pub is_negative: bool,
    pub is_tight: bool, // < 10% margin
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialAlert {
    pub id: String,
    pub r#type: AlertType,
    pub title: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub month: u32,
    pub year: i32,
    pub label: String,
    pub amount: Decimal,
    pub earnings: Decimal,
    pub cumulative_earnings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSimulation {
    pub original_balance: Decimal,
    pub new_balance: Decimal,
    pub difference: Decimal,
    pub is_still_positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: i64,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category_id: i64,
    pub name: String,
    pub color: Option<String>,
    pub total: Decimal,
}
