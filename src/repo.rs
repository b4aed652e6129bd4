// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage boundary of the engine. One trait per record family; every query
//! returns a point-in-time snapshot and any failure surfaces as `Error::Storage`.
//! Missing records are `None`, never an error.

use crate::error::Result;
use crate::models::{
    Category, Debt, DebtPatch, Expense, ExpensePatch, Income, IncomePatch, NewCategory, NewDebt,
    NewExpense, NewIncome, NewSavingsAccount, NewSavingsTransaction, SavingsAccount,
    SavingsAccountPatch, SavingsTransaction,
};
use crate::period::YearMonth;

pub trait IncomeRepository {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Income>>;
    /// Exact (month, year) match.
    fn find_by_month(&self, user_id: &str, period: YearMonth) -> Result<Vec<Income>>;
    fn find_by_year(&self, user_id: &str, year: i32) -> Result<Vec<Income>>;
    fn find_by_id(&self, id: i64) -> Result<Option<Income>>;
    fn create(&self, data: NewIncome) -> Result<Income>;
    fn update(&self, id: i64, patch: IncomePatch) -> Result<Option<Income>>;
    fn delete(&self, id: i64) -> Result<bool>;
}

pub trait ExpenseRepository {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Expense>>;
    /// Expenses dated within the calendar month, both ends inclusive.
    fn find_by_month(&self, user_id: &str, period: YearMonth) -> Result<Vec<Expense>>;
    fn find_by_year(&self, user_id: &str, year: i32) -> Result<Vec<Expense>>;
    fn find_by_category(&self, user_id: &str, category_id: i64) -> Result<Vec<Expense>>;
    fn find_by_id(&self, id: i64) -> Result<Option<Expense>>;
    fn create(&self, data: NewExpense) -> Result<Expense>;
    fn update(&self, id: i64, patch: ExpensePatch) -> Result<Option<Expense>>;
    fn delete(&self, id: i64) -> Result<bool>;
}

pub trait CategoryRepository {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Category>>;
    fn find_by_id(&self, id: i64) -> Result<Option<Category>>;
    fn create(&self, data: NewCategory) -> Result<Category>;
    fn delete(&self, id: i64) -> Result<bool>;
}

pub trait DebtRepository {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Debt>>;
    /// Debts whose status is `active`.
    fn find_active(&self, user_id: &str) -> Result<Vec<Debt>>;
    fn find_by_id(&self, id: i64) -> Result<Option<Debt>>;
    /// Assigns `end_date = start_date + total_installments` months.
    fn create(&self, data: NewDebt) -> Result<Debt>;
    fn update(&self, id: i64, patch: DebtPatch) -> Result<Option<Debt>>;
    fn delete(&self, id: i64) -> Result<bool>;
}

pub trait SavingsAccountRepository {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<SavingsAccount>>;
    fn find_by_id(&self, id: i64) -> Result<Option<SavingsAccount>>;
    /// Derives the monthly and daily yield rates from the annual rate.
    fn create(&self, data: NewSavingsAccount) -> Result<SavingsAccount>;
    /// Re-derives both yield rates when the annual rate is part of the patch.
    fn update(&self, id: i64, patch: SavingsAccountPatch) -> Result<Option<SavingsAccount>>;
    fn delete(&self, id: i64) -> Result<bool>;
    /// Reads the balance, validates, writes the new balance and appends the
    /// ledger entry as one unit. `None` when the account does not exist;
    /// `Error::InsufficientFunds` when a withdrawal exceeds the balance.
    fn apply_movement(
        &self,
        movement: NewSavingsTransaction,
    ) -> Result<Option<(SavingsAccount, SavingsTransaction)>>;
}

pub trait SavingsTransactionRepository {
    /// Newest first.
    fn find_by_account(&self, savings_account_id: i64) -> Result<Vec<SavingsTransaction>>;
    fn create(&self, data: NewSavingsTransaction) -> Result<SavingsTransaction>;
}
