// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finpulse::models::{DebtStatus, IncomeType, NewDebt, NewExpense, NewIncome};
use finpulse::{Store, YearMonth};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

fn income(store: &Store, year: i32, month: u32, amount: &str, kind: IncomeType) {
    store
        .incomes()
        .create(NewIncome {
            user_id: "u1".into(),
            description: "pay".into(),
            amount: d(amount),
            month,
            year,
            r#type: kind,
        })
        .unwrap();
}

fn expense(store: &Store, on: &str, amount: &str) {
    store
        .expenses()
        .create(NewExpense {
            user_id: "u1".into(),
            description: "bills".into(),
            amount: d(amount),
            category_id: 1,
            date: NaiveDate::parse_from_str(on, "%Y-%m-%d").unwrap(),
            is_fixed: true,
        })
        .unwrap();
}

fn debt(store: &Store, start: &str, installments: u32, value: &str) {
    store
        .debts()
        .create(NewDebt {
            user_id: "u1".into(),
            description: "card".into(),
            total_amount: d(value) * Decimal::from(installments),
            installment_value: d(value),
            total_installments: installments,
            remaining_installments: installments,
            start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            status: DebtStatus::Active,
        })
        .unwrap();
}

/// Three months of history before June 2025: April has no income and May
/// has no expenses, so each average skips a different month.
fn setup() -> Store {
    let store = Store::open_in_memory().unwrap();
    income(&store, 2025, 3, "3000", IncomeType::Real);
    income(&store, 2025, 5, "5000", IncomeType::Real);
    expense(&store, "2025-03-10", "1000");
    expense(&store, "2025-04-10", "2000");
    store
}

#[test]
fn current_month_uses_actual_figures() {
    let store = setup();
    income(&store, 2025, 6, "100", IncomeType::Estimated);
    let p = store
        .projection()
        .project_month("u1", 6, 2025, ym(2025, 6))
        .unwrap();
    assert_eq!(p.projected_income, d("100"));
    assert_eq!(p.projected_expenses, Decimal::ZERO);
    assert_eq!(p.label, "Jun/25");
}

#[test]
fn past_month_uses_actual_figures() {
    let store = setup();
    let p = store
        .projection()
        .project_month("u1", 4, 2025, ym(2025, 6))
        .unwrap();
    assert_eq!(p.projected_income, Decimal::ZERO);
    assert_eq!(p.projected_expenses, d("2000"));
    assert!(p.is_negative);
    assert!(!p.is_tight);
}

#[test]
fn future_months_average_non_zero_history() {
    let store = setup();
    let rows = store
        .projection()
        .project_next_months("u1", 4, ym(2025, 6))
        .unwrap();
    assert_eq!(rows.len(), 4);
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Jun/25", "Jul/25", "Aug/25", "Sep/25"]);
    for p in &rows[1..] {
        assert_eq!(p.projected_income, d("4000"));
        assert_eq!(p.projected_expenses, d("1500"));
        assert_eq!(p.projected_balance, d("2500"));
    }
}

#[test]
fn future_average_is_anchored_at_now() {
    let store = setup();
    // A far-future month still averages the three months before June.
    let p = store
        .projection()
        .project_month("u1", 3, 2026, ym(2025, 6))
        .unwrap();
    assert_eq!(p.projected_income, d("4000"));
    assert_eq!(p.projected_expenses, d("1500"));
}

#[test]
fn no_history_projects_zero() {
    let store = Store::open_in_memory().unwrap();
    let rows = store
        .projection()
        .project_next_months("u1", 3, ym(2025, 6))
        .unwrap();
    assert!(rows.iter().all(|p| p.projected_balance.is_zero()));
    assert!(rows.iter().all(|p| !p.is_negative && !p.is_tight));
}

#[test]
fn debt_makes_a_month_tight() {
    let store = setup();
    // Counts from August 1st to October 1st.
    debt(&store, "2025-07-10", 3, "2200");
    let projection = store.projection();
    let rows = projection.project_next_months("u1", 3, ym(2025, 6)).unwrap();
    assert_eq!(rows[1].projected_balance, d("2500"));
    assert_eq!(rows[2].projected_balance, d("300"));
    assert!(rows[2].is_tight);

    let tight = projection.get_tight_months("u1", 3, ym(2025, 6)).unwrap();
    assert_eq!(tight.len(), 1);
    assert_eq!(tight[0].label, "Aug/25");
    assert!(projection.get_negative_months("u1", 3, ym(2025, 6)).unwrap().is_empty());
}

#[test]
fn negative_months_are_not_reported_as_tight() {
    let store = setup();
    debt(&store, "2025-07-10", 3, "3000");
    let projection = store.projection();
    let negative = projection.get_negative_months("u1", 3, ym(2025, 6)).unwrap();
    assert_eq!(negative.len(), 1);
    assert_eq!(negative[0].projected_balance, d("-500"));
    assert!(negative[0].is_tight);
    assert!(projection.get_tight_months("u1", 3, ym(2025, 6)).unwrap().is_empty());
}

#[test]
fn history_is_twelve_months_oldest_first() {
    let store = setup();
    let rows = store
        .projection()
        .get_last_12_months_history("u1", ym(2025, 6))
        .unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0].label, "Jul/24");
    assert_eq!(rows[11].label, "Jun/25");
    assert_eq!((rows[8].month, rows[8].year), (3, 2025));
    assert_eq!(rows[8].projected_income, d("3000"));
    assert_eq!(rows[8].projected_balance, d("2000"));
}

#[test]
fn simulate_expense_uses_monthly_balance() {
    let store = setup();
    income(&store, 2025, 3, "500", IncomeType::Estimated);
    let sim = store
        .projection()
        .simulate_expense("u1", 3, 2025, d("3000"))
        .unwrap();
    assert_eq!(sim.original_balance, d("2500"));
    assert_eq!(sim.new_balance, d("-500"));
    assert_eq!(sim.difference, d("-3000"));
    assert!(!sim.is_still_positive);

    let sim = store
        .projection()
        .simulate_expense("u1", 3, 2025, d("2500"))
        .unwrap();
    assert!(sim.is_still_positive);
}
