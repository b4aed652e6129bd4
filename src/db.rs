// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::alerts::AlertService;
use crate::dashboard::DashboardService;
use crate::debts::DebtService;
use crate::error::{Error, Result};
use crate::finance::FinanceService;
use crate::incomes::IncomeService;
use crate::models::{
    Category, Debt, DebtPatch, Expense, ExpensePatch, Income, IncomePatch,
    MovementType, NewCategory, NewDebt, NewExpense, NewIncome, NewSavingsAccount,
    NewSavingsTransaction, SavingsAccount, SavingsAccountPatch, SavingsTransaction,
};
use crate::period::{YearMonth, add_months};
use crate::projection::ProjectionService;
use crate::repo::{
    CategoryRepository, DebtRepository, ExpenseRepository, IncomeRepository,
    SavingsAccountRepository, SavingsTransactionRepository,
};
use crate::savings::{SavingsService, derive_rates};
use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params, params_from_iter};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Finpulse", "finpulse"));

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finpulse.sqlite"))
}

/// SQLite-backed implementation of every repository trait.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Store { conn })
    }

    pub fn incomes(&self) -> &dyn IncomeRepository {
        self
    }

    pub fn expenses(&self) -> &dyn ExpenseRepository {
        self
    }

    pub fn categories(&self) -> &dyn CategoryRepository {
        self
    }

    pub fn debts(&self) -> &dyn DebtRepository {
        self
    }

    pub fn savings_accounts(&self) -> &dyn SavingsAccountRepository {
        self
    }

    pub fn savings_transactions(&self) -> &dyn SavingsTransactionRepository {
        self
    }

    pub fn finance(&self) -> FinanceService<'_> {
        FinanceService::new(self, self, self)
    }

    pub fn savings(&self) -> SavingsService<'_> {
        SavingsService::new(self, self)
    }

    pub fn projection(&self) -> ProjectionService<'_> {
        ProjectionService::new(self.finance())
    }

    pub fn alerts(&self) -> AlertService<'_> {
        AlertService::new(self.finance(), self.savings(), self.projection())
    }

    pub fn dashboard(&self) -> DashboardService<'_> {
        DashboardService::new(self.finance(), self.alerts(), self)
    }

    pub fn debt_service(&self) -> DebtService<'_> {
        DebtService::new(self, self.finance())
    }

    pub fn income_service(&self) -> IncomeService<'_> {
        IncomeService::new(self)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn query_all<T>(
        &self,
        sql: &str,
        args: &[&dyn ToSql],
        map: fn(&Row) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let mut rows = stmt.query(args)?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(map(r)?);
        }
        Ok(out)
    }

    fn query_one<T>(&self, sql: &str, id: i64, map: fn(&Row) -> Result<T>) -> Result<Option<T>> {
        Ok(self.query_all(sql, &[&id], map)?.into_iter().next())
    }

    /// Runs `UPDATE <table> SET ..` with the collected assignments.
    /// Returns false when no row has that id.
    fn patch_row(&self, table: &str, id: i64, sets: Vec<(&str, Box<dyn ToSql>)>) -> Result<bool> {
        if sets.is_empty() {
            let exists: Option<i64> = self
                .conn
                .query_row(
                    &format!("SELECT id FROM {} WHERE id=?1", table),
                    params![id],
                    |r| r.get(0),
                )
                .optional()?;
            return Ok(exists.is_some());
        }
        let assignments: Vec<String> = sets
            .iter()
            .enumerate()
            .map(|(i, (col, _))| format!("{}=?{}", col, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id=?{}",
            table,
            assignments.join(", "),
            sets.len() + 1
        );
        let mut values: Vec<Box<dyn ToSql>> = sets.into_iter().map(|(_, v)| v).collect();
        values.push(Box::new(id));
        let n = self.conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(n > 0)
    }

    fn delete_row(&self, table: &str, id: i64) -> Result<bool> {
        let n = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id=?1", table), params![id])?;
        Ok(n > 0)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('fixed','variable','investment','debt')),
        color TEXT,
        icon TEXT,
        UNIQUE(user_id, name)
    );

    CREATE TABLE IF NOT EXISTS incomes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        year INTEGER NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('real','estimated')),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_incomes_period ON incomes(user_id, year, month);

    -- category_id is a soft reference: aggregation tolerates unknown ids
    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        category_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        is_fixed INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(user_id, date);

    CREATE TABLE IF NOT EXISTS debts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        description TEXT NOT NULL,
        total_amount TEXT NOT NULL,
        installment_value TEXT NOT NULL,
        total_installments INTEGER NOT NULL,
        remaining_installments INTEGER NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        status TEXT NOT NULL CHECK(status IN ('active','paid')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        CHECK(remaining_installments BETWEEN 0 AND total_installments)
    );

    CREATE TABLE IF NOT EXISTS savings_accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        current_amount TEXT NOT NULL,
        annual_yield_rate TEXT NOT NULL,
        monthly_yield_rate REAL NOT NULL,
        daily_yield_rate REAL NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS savings_transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        savings_account_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('deposit','withdraw')),
        date TEXT NOT NULL,
        description TEXT,
        FOREIGN KEY(savings_account_id) REFERENCES savings_accounts(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

fn dec(row: &Row, idx: usize) -> Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>()
        .map_err(|_| Error::InvalidData(format!("Invalid decimal '{}'", s)))
}

fn income_from_row(r: &Row) -> Result<Income> {
    let kind: String = r.get(6)?;
    Ok(Income {
        id: r.get(0)?,
        user_id: r.get(1)?,
        description: r.get(2)?,
        amount: dec(r, 3)?,
        month: r.get(4)?,
        year: r.get(5)?,
        r#type: kind.parse()?,
        created_at: r.get(7)?,
    })
}

fn expense_from_row(r: &Row) -> Result<Expense> {
    Ok(Expense {
        id: r.get(0)?,
        user_id: r.get(1)?,
        description: r.get(2)?,
        amount: dec(r, 3)?,
        category_id: r.get(4)?,
        date: r.get(5)?,
        is_fixed: r.get(6)?,
        created_at: r.get(7)?,
    })
}

fn category_from_row(r: &Row) -> Result<Category> {
    let kind: String = r.get(3)?;
    Ok(Category {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        r#type: kind.parse()?,
        color: r.get(4)?,
        icon: r.get(5)?,
    })
}

fn debt_from_row(r: &Row) -> Result<Debt> {
    let status: String = r.get(9)?;
    Ok(Debt {
        id: r.get(0)?,
        user_id: r.get(1)?,
        description: r.get(2)?,
        total_amount: dec(r, 3)?,
        installment_value: dec(r, 4)?,
        total_installments: r.get(5)?,
        remaining_installments: r.get(6)?,
        start_date: r.get(7)?,
        end_date: r.get(8)?,
        status: status.parse()?,
        created_at: r.get(10)?,
    })
}

fn account_from_row(r: &Row) -> Result<SavingsAccount> {
    Ok(SavingsAccount {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        current_amount: dec(r, 3)?,
        annual_yield_rate: dec(r, 4)?,
        monthly_yield_rate: r.get(5)?,
        daily_yield_rate: r.get(6)?,
        created_at: r.get(7)?,
    })
}

fn movement_from_row(r: &Row) -> Result<SavingsTransaction> {
    let kind: String = r.get(3)?;
    Ok(SavingsTransaction {
        id: r.get(0)?,
        savings_account_id: r.get(1)?,
        amount: dec(r, 2)?,
        r#type: kind.parse()?,
        date: r.get(4)?,
        description: r.get(5)?,
    })
}

fn created<T>(found: Option<T>, table: &str, id: i64) -> Result<T> {
    found.ok_or_else(|| Error::InvalidData(format!("{} row {} missing after insert", table, id)))
}

const INCOME_COLS: &str = "SELECT id, user_id, description, amount, month, year, type, created_at FROM incomes";
const EXPENSE_COLS: &str = "SELECT id, user_id, description, amount, category_id, date, is_fixed, created_at FROM expenses";
const CATEGORY_COLS: &str = "SELECT id, user_id, name, type, color, icon FROM categories";
const DEBT_COLS: &str = "SELECT id, user_id, description, total_amount, installment_value, total_installments, remaining_installments, start_date, end_date, status, created_at FROM debts";
const ACCOUNT_COLS: &str = "SELECT id, user_id, name, current_amount, annual_yield_rate, monthly_yield_rate, daily_yield_rate, created_at FROM savings_accounts";
const MOVEMENT_COLS: &str =
    "SELECT id, savings_account_id, amount, type, date, description FROM savings_transactions";

impl IncomeRepository for Store {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Income>> {
        self.query_all(
            &format!("{} WHERE user_id=?1 ORDER BY year, month, id", INCOME_COLS),
            &[&user_id],
            income_from_row,
        )
    }

    fn find_by_month(&self, user_id: &str, period: YearMonth) -> Result<Vec<Income>> {
        self.query_all(
            &format!("{} WHERE user_id=?1 AND month=?2 AND year=?3 ORDER BY id", INCOME_COLS),
            &[&user_id, &period.month(), &period.year()],
            income_from_row,
        )
    }

    fn find_by_year(&self, user_id: &str, year: i32) -> Result<Vec<Income>> {
        self.query_all(
            &format!("{} WHERE user_id=?1 AND year=?2 ORDER BY month, id", INCOME_COLS),
            &[&user_id, &year],
            income_from_row,
        )
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Income>> {
        self.query_one(&format!("{} WHERE id=?1", INCOME_COLS), id, income_from_row)
    }

    fn create(&self, data: NewIncome) -> Result<Income> {
        YearMonth::new(data.year, data.month)?;
        self.conn.execute(
            "INSERT INTO incomes(user_id, description, amount, month, year, type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                data.user_id,
                data.description,
                data.amount.to_string(),
                data.month,
                data.year,
                data.r#type.as_str()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        created(IncomeRepository::find_by_id(self, id)?, "incomes", id)
    }

    fn update(&self, id: i64, patch: IncomePatch) -> Result<Option<Income>> {
        let mut sets: Vec<(&str, Box<dyn ToSql>)> = Vec::new();
        if let Some(v) = patch.description {
            sets.push(("description", Box::new(v)));
        }
        if let Some(v) = patch.amount {
            sets.push(("amount", Box::new(v.to_string())));
        }
        if let Some(v) = patch.month {
            if !(1..=12).contains(&v) {
                return Err(Error::InvalidPeriod { month: v });
            }
            sets.push(("month", Box::new(v)));
        }
        if let Some(v) = patch.year {
            sets.push(("year", Box::new(v)));
        }
        if let Some(v) = patch.r#type {
            sets.push(("type", Box::new(v.as_str())));
        }
        if !self.patch_row("incomes", id, sets)? {
            return Ok(None);
        }
        IncomeRepository::find_by_id(self, id)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        self.delete_row("incomes", id)
    }
}

impl ExpenseRepository for Store {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Expense>> {
        self.query_all(
            &format!("{} WHERE user_id=?1 ORDER BY date, id", EXPENSE_COLS),
            &[&user_id],
            expense_from_row,
        )
    }

    fn find_by_month(&self, user_id: &str, period: YearMonth) -> Result<Vec<Expense>> {
        self.query_all(
            &format!(
                "{} WHERE user_id=?1 AND date>=?2 AND date<=?3 ORDER BY date, id",
                EXPENSE_COLS
            ),
            &[&user_id, &period.first_day(), &period.last_day()],
            expense_from_row,
        )
    }

    fn find_by_year(&self, user_id: &str, year: i32) -> Result<Vec<Expense>> {
        let first = YearMonth::new(year, 1)?;
        let last = YearMonth::new(year, 12)?;
        self.query_all(
            &format!(
                "{} WHERE user_id=?1 AND date>=?2 AND date<=?3 ORDER BY date, id",
                EXPENSE_COLS
            ),
            &[&user_id, &first.first_day(), &last.last_day()],
            expense_from_row,
        )
    }

    fn find_by_category(&self, user_id: &str, category_id: i64) -> Result<Vec<Expense>> {
        self.query_all(
            &format!("{} WHERE user_id=?1 AND category_id=?2 ORDER BY date, id", EXPENSE_COLS),
            &[&user_id, &category_id],
            expense_from_row,
        )
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Expense>> {
        self.query_one(&format!("{} WHERE id=?1", EXPENSE_COLS), id, expense_from_row)
    }

    fn create(&self, data: NewExpense) -> Result<Expense> {
        self.conn.execute(
            "INSERT INTO expenses(user_id, description, amount, category_id, date, is_fixed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                data.user_id,
                data.description,
                data.amount.to_string(),
                data.category_id,
                data.date,
                data.is_fixed
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        created(ExpenseRepository::find_by_id(self, id)?, "expenses", id)
    }

    fn update(&self, id: i64, patch: ExpensePatch) -> Result<Option<Expense>> {
        let mut sets: Vec<(&str, Box<dyn ToSql>)> = Vec::new();
        if let Some(v) = patch.description {
            sets.push(("description", Box::new(v)));
        }
        if let Some(v) = patch.amount {
            sets.push(("amount", Box::new(v.to_string())));
        }
        if let Some(v) = patch.category_id {
            sets.push(("category_id", Box::new(v)));
        }
        if let Some(v) = patch.date {
            sets.push(("date", Box::new(v)));
        }
        if let Some(v) = patch.is_fixed {
            sets.push(("is_fixed", Box::new(v)));
        }
        if !self.patch_row("expenses", id, sets)? {
            return Ok(None);
        }
        ExpenseRepository::find_by_id(self, id)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        self.delete_row("expenses", id)
    }
}

impl CategoryRepository for Store {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Category>> {
        self.query_all(
            &format!("{} WHERE user_id=?1 ORDER BY name", CATEGORY_COLS),
            &[&user_id],
            category_from_row,
        )
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        self.query_one(&format!("{} WHERE id=?1", CATEGORY_COLS), id, category_from_row)
    }

    fn create(&self, data: NewCategory) -> Result<Category> {
        self.conn.execute(
            "INSERT INTO categories(user_id, name, type, color, icon) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                data.user_id,
                data.name,
                data.r#type.as_str(),
                data.color,
                data.icon
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        created(CategoryRepository::find_by_id(self, id)?, "categories", id)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        self.delete_row("categories", id)
    }
}

impl DebtRepository for Store {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Debt>> {
        self.query_all(
            &format!("{} WHERE user_id=?1 ORDER BY start_date, id", DEBT_COLS),
            &[&user_id],
            debt_from_row,
        )
    }

    fn find_active(&self, user_id: &str) -> Result<Vec<Debt>> {
        self.query_all(
            &format!(
                "{} WHERE user_id=?1 AND status='active' ORDER BY start_date, id",
                DEBT_COLS
            ),
            &[&user_id],
            debt_from_row,
        )
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Debt>> {
        self.query_one(&format!("{} WHERE id=?1", DEBT_COLS), id, debt_from_row)
    }

    fn create(&self, data: NewDebt) -> Result<Debt> {
        let end_date = add_months(data.start_date, data.total_installments);
        self.conn.execute(
            "INSERT INTO debts(user_id, description, total_amount, installment_value,
                total_installments, remaining_installments, start_date, end_date, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                data.user_id,
                data.description,
                data.total_amount.to_string(),
                data.installment_value.to_string(),
                data.total_installments,
                data.remaining_installments,
                data.start_date,
                end_date,
                data.status.as_str()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        created(DebtRepository::find_by_id(self, id)?, "debts", id)
    }

    fn update(&self, id: i64, patch: DebtPatch) -> Result<Option<Debt>> {
        let mut sets: Vec<(&str, Box<dyn ToSql>)> = Vec::new();
        if let Some(v) = patch.description {
            sets.push(("description", Box::new(v)));
        }
        if let Some(v) = patch.total_amount {
            sets.push(("total_amount", Box::new(v.to_string())));
        }
        if let Some(v) = patch.installment_value {
            sets.push(("installment_value", Box::new(v.to_string())));
        }
        if let Some(v) = patch.total_installments {
            sets.push(("total_installments", Box::new(v)));
        }
        if let Some(v) = patch.remaining_installments {
            sets.push(("remaining_installments", Box::new(v)));
        }
        if let Some(v) = patch.status {
            sets.push(("status", Box::new(v.as_str())));
        }
        if !self.patch_row("debts", id, sets)? {
            return Ok(None);
        }
        DebtRepository::find_by_id(self, id)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        self.delete_row("debts", id)
    }
}

impl SavingsAccountRepository for Store {
    fn find_by_user(&self, user_id: &str) -> Result<Vec<SavingsAccount>> {
        self.query_all(
            &format!("{} WHERE user_id=?1 ORDER BY name, id", ACCOUNT_COLS),
            &[&user_id],
            account_from_row,
        )
    }

    fn find_by_id(&self, id: i64) -> Result<Option<SavingsAccount>> {
        self.query_one(&format!("{} WHERE id=?1", ACCOUNT_COLS), id, account_from_row)
    }

    fn create(&self, data: NewSavingsAccount) -> Result<SavingsAccount> {
        let (monthly, daily) = derive_rates(data.annual_yield_rate)?;
        self.conn.execute(
            "INSERT INTO savings_accounts(user_id, name, current_amount, annual_yield_rate,
                monthly_yield_rate, daily_yield_rate)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                data.user_id,
                data.name,
                data.current_amount.to_string(),
                data.annual_yield_rate.to_string(),
                monthly,
                daily
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        created(SavingsAccountRepository::find_by_id(self, id)?, "savings_accounts", id)
    }

    fn update(&self, id: i64, patch: SavingsAccountPatch) -> Result<Option<SavingsAccount>> {
        let mut sets: Vec<(&str, Box<dyn ToSql>)> = Vec::new();
        if let Some(v) = patch.name {
            sets.push(("name", Box::new(v)));
        }
        if let Some(v) = patch.current_amount {
            sets.push(("current_amount", Box::new(v.to_string())));
        }
        if let Some(v) = patch.annual_yield_rate {
            let (monthly, daily) = derive_rates(v)?;
            sets.push(("annual_yield_rate", Box::new(v.to_string())));
            sets.push(("monthly_yield_rate", Box::new(monthly)));
            sets.push(("daily_yield_rate", Box::new(daily)));
        }
        if !self.patch_row("savings_accounts", id, sets)? {
            return Ok(None);
        }
        SavingsAccountRepository::find_by_id(self, id)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        self.delete_row("savings_accounts", id)
    }

    fn apply_movement(
        &self,
        movement: NewSavingsTransaction,
    ) -> Result<Option<(SavingsAccount, SavingsTransaction)>> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(account) = SavingsAccountRepository::find_by_id(self, movement.savings_account_id)?
        else {
            return Ok(None);
        };
        let new_amount = match movement.r#type {
            MovementType::Deposit => account.current_amount + movement.amount,
            MovementType::Withdraw => {
                if movement.amount > account.current_amount {
                    return Err(Error::InsufficientFunds {
                        available: account.current_amount,
                        requested: movement.amount,
                    });
                }
                account.current_amount - movement.amount
            }
        };
        self.conn.execute(
            "UPDATE savings_accounts SET current_amount=?1 WHERE id=?2",
            params![new_amount.to_string(), account.id],
        )?;
        let entry = SavingsTransactionRepository::create(self, movement)?;
        tx.commit()?;
        let updated = SavingsAccountRepository::find_by_id(self, account.id)?;
        Ok(updated.map(|a| (a, entry)))
    }
}

impl SavingsTransactionRepository for Store {
    fn find_by_account(&self, savings_account_id: i64) -> Result<Vec<SavingsTransaction>> {
        self.query_all(
            &format!(
                "{} WHERE savings_account_id=?1 ORDER BY date DESC, id DESC",
                MOVEMENT_COLS
            ),
            &[&savings_account_id],
            movement_from_row,
        )
    }

    fn create(&self, data: NewSavingsTransaction) -> Result<SavingsTransaction> {
        self.conn.execute(
            "INSERT INTO savings_transactions(savings_account_id, amount, type, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                data.savings_account_id,
                data.amount.to_string(),
                data.r#type.as_str(),
                data.date,
                data.description
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        let found = self.query_one(&format!("{} WHERE id=?1", MOVEMENT_COLS), id, movement_from_row)?;
        created(found, "savings_transactions", id)
    }
}
