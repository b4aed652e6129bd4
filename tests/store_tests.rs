// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finpulse::models::{
    CategoryType, DebtPatch, DebtStatus, ExpensePatch, IncomePatch, IncomeType, NewCategory,
    NewDebt, NewExpense, NewIncome,
};
use finpulse::{Error, Store, YearMonth};
use rust_decimal::Decimal;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_income(month: u32, year: i32) -> NewIncome {
    NewIncome {
        user_id: "u1".into(),
        description: "salary".into(),
        amount: Decimal::new(250050, 2),
        month,
        year,
        r#type: IncomeType::Estimated,
    }
}

fn new_debt(start: NaiveDate, installments: u32) -> NewDebt {
    NewDebt {
        user_id: "u1".into(),
        description: "car".into(),
        total_amount: Decimal::from(12000),
        installment_value: Decimal::from(1000),
        total_installments: installments,
        remaining_installments: installments,
        start_date: start,
        status: DebtStatus::Active,
    }
}

#[test]
fn debt_end_date_is_start_plus_installments() {
    let store = Store::open_in_memory().unwrap();
    let debt = store.debts().create(new_debt(day(2024, 1, 15), 12)).unwrap();
    assert_eq!(debt.end_date, day(2025, 1, 15));

    let short = store.debts().create(new_debt(day(2024, 1, 31), 1)).unwrap();
    assert_eq!(short.end_date, day(2024, 2, 29));
}

#[test]
fn debt_end_date_is_not_recomputed_on_update() {
    let store = Store::open_in_memory().unwrap();
    let debt = store.debts().create(new_debt(day(2024, 1, 15), 12)).unwrap();
    let patched = store
        .debts()
        .update(
            debt.id,
            DebtPatch {
                total_installments: Some(24),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(patched.total_installments, 24);
    assert_eq!(patched.end_date, day(2025, 1, 15));
}

#[test]
fn find_active_skips_paid_debts() {
    let store = Store::open_in_memory().unwrap();
    let a = store.debts().create(new_debt(day(2024, 1, 15), 12)).unwrap();
    let b = store.debts().create(new_debt(day(2024, 3, 1), 6)).unwrap();
    store
        .debts()
        .update(
            b.id,
            DebtPatch {
                status: Some(DebtStatus::Paid),
                ..Default::default()
            },
        )
        .unwrap();
    let active = store.debts().find_active("u1").unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, a.id);
    assert_eq!(store.debts().find_by_user("u1").unwrap().len(), 2);
}

#[test]
fn missing_rows_are_absent_not_errors() {
    let store = Store::open_in_memory().unwrap();
    assert!(store.incomes().find_by_id(7).unwrap().is_none());
    assert!(
        store
            .incomes()
            .update(7, IncomePatch::default())
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .expenses()
            .update(
                7,
                ExpensePatch {
                    amount: Some(Decimal::ONE),
                    ..Default::default()
                }
            )
            .unwrap()
            .is_none()
    );
    assert!(!store.incomes().delete(7).unwrap());
    assert!(!store.debts().delete(7).unwrap());
    assert!(!store.categories().delete(7).unwrap());
}

#[test]
fn income_amounts_keep_their_scale() {
    let store = Store::open_in_memory().unwrap();
    let income = store.incomes().create(new_income(3, 2025)).unwrap();
    assert_eq!(income.amount.to_string(), "2500.50");
    assert_eq!(income.r#type, IncomeType::Estimated);
}

#[test]
fn income_month_must_be_valid() {
    let store = Store::open_in_memory().unwrap();
    let err = store.incomes().create(new_income(13, 2025)).unwrap_err();
    assert!(matches!(err, Error::InvalidPeriod { month: 13 }));

    let income = store.incomes().create(new_income(3, 2025)).unwrap();
    let err = store
        .incomes()
        .update(
            income.id,
            IncomePatch {
                month: Some(0),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPeriod { month: 0 }));
}

#[test]
fn incomes_by_year_and_month() {
    let store = Store::open_in_memory().unwrap();
    store.incomes().create(new_income(3, 2025)).unwrap();
    store.incomes().create(new_income(11, 2025)).unwrap();
    store.incomes().create(new_income(3, 2024)).unwrap();
    let year = store.incomes().find_by_year("u1", 2025).unwrap();
    assert_eq!(
        year.iter().map(|i| i.month).collect::<Vec<_>>(),
        vec![3, 11]
    );
    let march = YearMonth::new(2025, 3).unwrap();
    assert_eq!(store.incomes().find_by_month("u1", march).unwrap().len(), 1);
    assert_eq!(store.incomes().find_by_user("u1").unwrap().len(), 3);
}

#[test]
fn expenses_by_category_and_year() {
    let store = Store::open_in_memory().unwrap();
    for (date, category) in [
        (day(2024, 12, 31), 1),
        (day(2025, 1, 1), 1),
        (day(2025, 6, 1), 2),
        (day(2025, 12, 31), 1),
    ] {
        store
            .expenses()
            .create(NewExpense {
                user_id: "u1".into(),
                description: "x".into(),
                amount: Decimal::TEN,
                category_id: category,
                date,
                is_fixed: false,
            })
            .unwrap();
    }
    assert_eq!(store.expenses().find_by_year("u1", 2025).unwrap().len(), 3);
    assert_eq!(store.expenses().find_by_category("u1", 1).unwrap().len(), 3);
    assert_eq!(store.expenses().find_by_category("u2", 1).unwrap().len(), 0);
}

#[test]
fn category_names_are_unique_per_user() {
    let store = Store::open_in_memory().unwrap();
    let new = |user: &str| NewCategory {
        user_id: user.into(),
        name: "Food".into(),
        r#type: CategoryType::Variable,
        color: None,
        icon: Some("fork".into()),
    };
    store.categories().create(new("u1")).unwrap();
    store.categories().create(new("u2")).unwrap();
    let err = store.categories().create(new("u1")).unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}

#[test]
fn settings_round_trip() {
    let store = Store::open_in_memory().unwrap();
    assert_eq!(store.get_setting("user").unwrap(), None);
    store.set_setting("user", "ana").unwrap();
    store.set_setting("user", "bia").unwrap();
    assert_eq!(store.get_setting("user").unwrap().as_deref(), Some("bia"));
}

#[test]
fn on_disk_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finpulse.sqlite");
    {
        let store = Store::open(&path).unwrap();
        store.incomes().create(new_income(3, 2025)).unwrap();
        store.set_setting("user", "u1").unwrap();
    }
    let store = Store::open(&path).unwrap();
    assert_eq!(store.incomes().find_by_user("u1").unwrap().len(), 1);
    assert_eq!(store.get_setting("user").unwrap().as_deref(), Some("u1"));
}
