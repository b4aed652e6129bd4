// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use crate::finance::out_of_range;
use crate::models::{
    MovementType, NewSavingsTransaction, SavingsAccount, SavingsProjection, SavingsTransaction,
};
use crate::period::YearMonth;
use crate::repo::{SavingsAccountRepository, SavingsTransactionRepository};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use tracing::{debug, info, warn};

/// Effective monthly rate equivalent to `annual_percent` compounded yearly.
pub fn monthly_rate(annual_percent: f64) -> f64 {
    (1.0 + annual_percent / 100.0).powf(1.0 / 12.0) - 1.0
}

/// Effective daily rate over a 365-day year.
pub fn daily_rate(annual_percent: f64) -> f64 {
    (1.0 + annual_percent / 100.0).powf(1.0 / 365.0) - 1.0
}

/// The `(monthly, daily)` pair cached on a savings account.
pub fn derive_rates(annual_percent: Decimal) -> Result<(f64, f64)> {
    let annual = annual_percent
        .to_f64()
        .ok_or_else(|| Error::InvalidData(format!("Invalid yield rate '{}'", annual_percent)))?;
    let (monthly, daily) = (monthly_rate(annual), daily_rate(annual));
    if !monthly.is_finite() || !daily.is_finite() {
        return Err(Error::InvalidData(format!(
            "Yield rate {}% has no compound equivalent",
            annual_percent
        )));
    }
    Ok((monthly, daily))
}

fn rate_to_decimal(rate: f64) -> Result<Decimal> {
    Decimal::from_f64(rate).ok_or_else(|| Error::InvalidData(format!("Invalid rate '{}'", rate)))
}

pub fn calculate_monthly_yield(account: &SavingsAccount) -> Result<Decimal> {
    account
        .current_amount
        .checked_mul(rate_to_decimal(account.monthly_yield_rate)?)
        .ok_or_else(|| out_of_range("monthly yield"))
}

pub fn calculate_daily_yield(account: &SavingsAccount) -> Result<Decimal> {
    account
        .current_amount
        .checked_mul(rate_to_decimal(account.daily_yield_rate)?)
        .ok_or_else(|| out_of_range("daily yield"))
}

/// Simple annual yield: the nominal rate applied once to the current amount.
pub fn calculate_annual_yield(account: &SavingsAccount) -> Decimal {
    account.current_amount * account.annual_yield_rate / Decimal::ONE_HUNDRED
}

/// Month-by-month compounding from `start`. Each step earns on the balance
/// carried into it, then the deposit lands, so the first entry's earnings
/// never include a deposit. Fails once a balance outgrows `Decimal`.
pub fn project_compound_growth(
    initial_amount: Decimal,
    monthly_deposit: Decimal,
    annual_rate: Decimal,
    months: u32,
    start: YearMonth,
) -> Result<Vec<SavingsProjection>> {
    let (monthly, _) = derive_rates(annual_rate)?;
    let rate = rate_to_decimal(monthly)?;
    let mut current = initial_amount;
    let mut cumulative = Decimal::ZERO;
    let mut out = Vec::with_capacity(months as usize);
    for period in start.range(months as usize) {
        let step = || -> Option<(Decimal, Decimal, Decimal)> {
            let earnings = current.checked_mul(rate)?;
            let next = current.checked_add(earnings)?.checked_add(monthly_deposit)?;
            Some((earnings, next, cumulative.checked_add(earnings)?))
        };
        let Some((earnings, next, total)) = step() else {
            warn!(months, %annual_rate, %period, "compound growth overflowed");
            return Err(out_of_range("projected savings balance"));
        };
        current = next;
        cumulative = total;
        out.push(SavingsProjection {
            month: period.month(),
            year: period.year(),
            label: period.label(),
            amount: current,
            earnings,
            cumulative_earnings: cumulative,
        });
    }
    Ok(out)
}

#[derive(Clone, Copy)]
pub struct SavingsService<'a> {
    accounts: &'a dyn SavingsAccountRepository,
    movements: &'a dyn SavingsTransactionRepository,
}

impl<'a> SavingsService<'a> {
    pub fn new(
        accounts: &'a dyn SavingsAccountRepository,
        movements: &'a dyn SavingsTransactionRepository,
    ) -> Self {
        SavingsService {
            accounts,
            movements,
        }
    }

    pub fn get_total_savings(&self, user_id: &str) -> Result<Decimal> {
        let accounts = self.accounts.find_by_user(user_id)?;
        Ok(accounts.iter().map(|a| a.current_amount).sum())
    }

    pub fn get_total_monthly_yield(&self, user_id: &str) -> Result<Decimal> {
        let accounts = self.accounts.find_by_user(user_id)?;
        let mut total = Decimal::ZERO;
        for a in &accounts {
            total += calculate_monthly_yield(a)?;
        }
        Ok(total)
    }

    pub fn get_total_annual_yield(&self, user_id: &str) -> Result<Decimal> {
        let accounts = self.accounts.find_by_user(user_id)?;
        Ok(accounts.iter().map(calculate_annual_yield).sum())
    }

    /// Growth of an account's current balance with no further deposits.
    pub fn project_account(
        &self,
        account_id: i64,
        months: u32,
        now: YearMonth,
    ) -> Result<Option<Vec<SavingsProjection>>> {
        let Some(account) = self.accounts.find_by_id(account_id)? else {
            return Ok(None);
        };
        project_compound_growth(
            account.current_amount,
            Decimal::ZERO,
            account.annual_yield_rate,
            months,
            now,
        )
        .map(Some)
    }

    pub fn history(&self, account_id: i64) -> Result<Vec<SavingsTransaction>> {
        self.movements.find_by_account(account_id)
    }

    pub fn deposit(
        &self,
        account_id: i64,
        amount: Decimal,
        date: NaiveDate,
        description: Option<String>,
    ) -> Result<Option<(SavingsAccount, SavingsTransaction)>> {
        self.move_funds(account_id, MovementType::Deposit, amount, date, description)
    }

    /// Rejected with `InsufficientFunds` when `amount` exceeds the balance.
    pub fn withdraw(
        &self,
        account_id: i64,
        amount: Decimal,
        date: NaiveDate,
        description: Option<String>,
    ) -> Result<Option<(SavingsAccount, SavingsTransaction)>> {
        self.move_funds(account_id, MovementType::Withdraw, amount, date, description)
    }

    fn move_funds(
        &self,
        account_id: i64,
        kind: MovementType,
        amount: Decimal,
        date: NaiveDate,
        description: Option<String>,
    ) -> Result<Option<(SavingsAccount, SavingsTransaction)>> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(amount));
        }
        let outcome = self.accounts.apply_movement(NewSavingsTransaction {
            savings_account_id: account_id,
            amount,
            r#type: kind,
            date,
            description,
        });
        match &outcome {
            Ok(Some((account, _))) => info!(
                account_id,
                kind = kind.as_str(),
                %amount,
                balance = %account.current_amount,
                "savings movement recorded"
            ),
            Ok(None) => debug!(account_id, "savings account not found; movement skipped"),
            Err(Error::InsufficientFunds { available, .. }) => warn!(
                account_id,
                %amount,
                %available,
                "withdrawal rejected"
            ),
            Err(_) => {}
        }
        outcome
    }
}
