// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finpulse::models::{
    DebtPatch, DebtStatus, Income, IncomePatch, IncomeType, NewDebt, NewExpense, NewIncome,
};
use finpulse::repo::IncomeRepository;
use finpulse::finance::FinanceService;
use finpulse::{Error, Store, YearMonth};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn add_income(store: &Store, user: &str, year: i32, month: u32, amount: &str, kind: IncomeType) {
    store
        .incomes()
        .create(NewIncome {
            user_id: user.into(),
            description: "salary".into(),
            amount: d(amount),
            month,
            year,
            r#type: kind,
        })
        .unwrap();
}

fn add_expense(store: &Store, user: &str, on: &str, amount: &str, category_id: i64) {
    store
        .expenses()
        .create(NewExpense {
            user_id: user.into(),
            description: "spend".into(),
            amount: d(amount),
            category_id,
            date: date(on),
            is_fixed: false,
        })
        .unwrap();
}

fn add_debt(store: &Store, user: &str, start: &str, installments: u32, value: &str) -> i64 {
    store
        .debts()
        .create(NewDebt {
            user_id: user.into(),
            description: "loan".into(),
            total_amount: d(value) * Decimal::from(installments),
            installment_value: d(value),
            total_installments: installments,
            remaining_installments: installments,
            start_date: date(start),
            status: DebtStatus::Active,
        })
        .unwrap()
        .id
}

#[test]
fn oversized_ratio_fails_the_summary() {
    let store = Store::open_in_memory().unwrap();
    add_income(&store, "u1", 2025, 3, "0.0000000000000000000001", IncomeType::Real);
    add_expense(&store, "u1", "2025-03-10", "10000000000", 1);
    let res = store.finance().get_monthly_summary("u1", 3, 2025);
    assert!(matches!(res, Err(Error::InvalidData(_))));
}

#[test]
fn ratios_are_zero_without_income() {
    let store = Store::open_in_memory().unwrap();
    add_expense(&store, "u1", "2025-03-10", "800", 1);
    let s = store.finance().get_monthly_summary("u1", 3, 2025).unwrap();
    assert_eq!(s.total_income, Decimal::ZERO);
    assert_eq!(s.total_expenses, d("800"));
    assert_eq!(s.savings_rate, Decimal::ZERO);
    assert_eq!(s.expense_ratio, Decimal::ZERO);
    assert_eq!(s.debt_ratio, Decimal::ZERO);
    assert_eq!(s.balance, d("-800"));
}

#[test]
fn total_income_includes_estimates() {
    let store = Store::open_in_memory().unwrap();
    add_income(&store, "u1", 2025, 3, "5000", IncomeType::Real);
    add_income(&store, "u1", 2025, 3, "1000", IncomeType::Estimated);
    add_expense(&store, "u1", "2025-03-10", "1200", 1);

    let f = store.finance();
    assert_eq!(f.total_real_income("u1", 3, 2025).unwrap(), d("5000"));
    assert_eq!(f.total_estimated_income("u1", 3, 2025).unwrap(), d("1000"));
    assert_eq!(f.total_income("u1", 3, 2025).unwrap(), d("6000"));

    let s = f.get_monthly_summary("u1", 3, 2025).unwrap();
    assert_eq!(s.total_income, d("6000"));
    assert_eq!(s.total_estimated_income, d("1000"));
    assert_eq!(s.balance, d("4800"));
    assert_eq!(s.expense_ratio, d("20"));
    assert_eq!(s.savings_rate, d("80"));
}

#[test]
fn expenses_window_is_the_calendar_month() {
    let store = Store::open_in_memory().unwrap();
    add_expense(&store, "u1", "2025-02-28", "1", 1);
    add_expense(&store, "u1", "2025-03-01", "10", 1);
    add_expense(&store, "u1", "2025-03-31", "100", 1);
    add_expense(&store, "u1", "2025-04-01", "1000", 1);
    assert_eq!(store.finance().total_expenses("u1", 3, 2025).unwrap(), d("110"));
}

#[test]
fn records_of_other_users_are_ignored() {
    let store = Store::open_in_memory().unwrap();
    add_income(&store, "u1", 2025, 3, "5000", IncomeType::Real);
    add_income(&store, "u2", 2025, 3, "9999", IncomeType::Real);
    add_expense(&store, "u2", "2025-03-10", "500", 1);
    let f = store.finance();
    assert_eq!(f.total_income("u1", 3, 2025).unwrap(), d("5000"));
    assert_eq!(f.total_expenses("u1", 3, 2025).unwrap(), Decimal::ZERO);
}

#[test]
fn debt_impact_follows_span_and_status() {
    let store = Store::open_in_memory().unwrap();
    // Ends 2026-01-15.
    let loan = add_debt(&store, "u1", "2025-01-15", 12, "300");
    let f = store.finance();

    // 2025-01-01 is before the start date.
    assert_eq!(f.total_debt_impact("u1", 1, 2025).unwrap(), Decimal::ZERO);
    assert_eq!(f.total_debt_impact("u1", 2, 2025).unwrap(), d("300"));
    assert_eq!(f.total_debt_impact("u1", 1, 2026).unwrap(), d("300"));
    assert_eq!(f.total_debt_impact("u1", 2, 2026).unwrap(), Decimal::ZERO);

    // Still counted while active, whatever the installment counter says.
    store
        .debts()
        .update(
            loan,
            DebtPatch {
                remaining_installments: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(f.total_debt_impact("u1", 6, 2025).unwrap(), d("300"));

    store
        .debts()
        .update(
            loan,
            DebtPatch {
                status: Some(DebtStatus::Paid),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(f.total_debt_impact("u1", 6, 2025).unwrap(), Decimal::ZERO);
}

#[test]
fn summary_projected_balance_subtracts_debt() {
    let store = Store::open_in_memory().unwrap();
    add_income(&store, "u1", 2025, 3, "4000", IncomeType::Real);
    add_expense(&store, "u1", "2025-03-05", "1000", 1);
    add_debt(&store, "u1", "2025-02-01", 10, "1000");
    let s = store.finance().get_monthly_summary("u1", 3, 2025).unwrap();
    assert_eq!(s.total_debt_impact, d("1000"));
    assert_eq!(s.balance, d("3000"));
    assert_eq!(s.projected_balance, d("2000"));
    assert_eq!(s.debt_ratio, d("25"));
    assert_eq!(
        store.finance().projected_balance("u1", 3, 2025).unwrap(),
        d("2000")
    );
}

#[test]
fn expenses_grouped_by_category() {
    let store = Store::open_in_memory().unwrap();
    add_expense(&store, "u1", "2025-03-01", "10", 1);
    add_expense(&store, "u1", "2025-03-02", "15", 1);
    add_expense(&store, "u1", "2025-03-03", "7", 2);
    let mut totals = store
        .finance()
        .get_expenses_by_category("u1", 3, 2025)
        .unwrap();
    totals.sort_by_key(|t| t.category_id);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].total, d("25"));
    assert_eq!(totals[1].total, d("7"));
}

#[test]
fn invalid_month_is_rejected() {
    let store = Store::open_in_memory().unwrap();
    let err = store.finance().total_income("u1", 13, 2025).unwrap_err();
    assert!(matches!(err, Error::InvalidPeriod { month: 13 }));
}

struct BrokenIncomes;

fn broken<T>() -> finpulse::Result<T> {
    Err(Error::Storage(rusqlite::Error::QueryReturnedNoRows))
}

impl IncomeRepository for BrokenIncomes {
    fn find_by_user(&self, _: &str) -> finpulse::Result<Vec<Income>> {
        broken()
    }
    fn find_by_month(&self, _: &str, _: YearMonth) -> finpulse::Result<Vec<Income>> {
        broken()
    }
    fn find_by_year(&self, _: &str, _: i32) -> finpulse::Result<Vec<Income>> {
        broken()
    }
    fn find_by_id(&self, _: i64) -> finpulse::Result<Option<Income>> {
        broken()
    }
    fn create(&self, _: NewIncome) -> finpulse::Result<Income> {
        broken()
    }
    fn update(&self, _: i64, _: IncomePatch) -> finpulse::Result<Option<Income>> {
        broken()
    }
    fn delete(&self, _: i64) -> finpulse::Result<bool> {
        broken()
    }
}

#[test]
fn storage_failure_propagates() {
    let store = Store::open_in_memory().unwrap();
    add_expense(&store, "u1", "2025-03-10", "800", 1);
    let finance = FinanceService::new(&BrokenIncomes, store.expenses(), store.debts());
    let err = finance.get_monthly_summary("u1", 3, 2025).unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}
