// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finpulse::commands::{Ctx, debts, exporter, expenses, incomes, reports, savings};
use finpulse::models::{CategoryType, DebtStatus, IncomeType};
use finpulse::{Store, cli};
use rust_decimal::Decimal;

fn ctx() -> Ctx {
    Ctx {
        user: "u1".into(),
        now: NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    }
}

/// Parses `args` and returns the leaf subcommand's matches.
fn leaf(args: &[&str]) -> clap::ArgMatches {
    let mut m = cli::build_cli().get_matches_from(args.iter().copied());
    while let Some((_, sub)) = m.subcommand() {
        m = sub.clone();
    }
    m
}

#[test]
fn global_flags_parse_after_subcommand() {
    let m = cli::build_cli().get_matches_from([
        "finpulse", "report", "summary", "--user", "bia", "--db", "/tmp/x.sqlite",
    ]);
    assert_eq!(m.get_one::<String>("user").map(String::as_str), Some("bia"));
    assert_eq!(
        m.get_one::<String>("db").map(String::as_str),
        Some("/tmp/x.sqlite")
    );
}

#[test]
fn json_and_jsonl_conflict() {
    let res = cli::build_cli().try_get_matches_from([
        "finpulse", "report", "history", "--json", "--jsonl",
    ]);
    assert!(res.is_err());
}

#[test]
fn income_add_defaults_to_real() {
    let store = Store::open_in_memory().unwrap();
    let m = leaf(&[
        "finpulse", "income", "add", "--month", "2025-03", "--amount", "5000",
        "--description", "Salary",
    ]);
    let income = incomes::add(&store, &ctx(), &m).unwrap();
    assert_eq!((income.month, income.year), (3, 2025));
    assert_eq!(income.r#type, IncomeType::Real);

    let m = leaf(&[
        "finpulse", "income", "add", "--month", "2025-03", "--amount", "800",
        "--description", "Bonus", "--estimated",
    ]);
    let income = incomes::add(&store, &ctx(), &m).unwrap();
    assert_eq!(income.r#type, IncomeType::Estimated);
}

#[test]
fn income_add_rejects_bad_month() {
    let store = Store::open_in_memory().unwrap();
    let m = leaf(&[
        "finpulse", "income", "add", "--month", "2025-13", "--amount", "1",
        "--description", "x",
    ]);
    assert!(incomes::add(&store, &ctx(), &m).is_err());
}

#[test]
fn expense_category_by_name_or_id() {
    let store = Store::open_in_memory().unwrap();
    let root = cli::build_cli().get_matches_from([
        "finpulse", "category", "add", "--name", "Rent", "--type", "fixed",
    ]);
    let Some(("category", sub)) = root.subcommand() else {
        panic!("no category subcommand");
    };
    expenses::handle_category(&store, &ctx(), sub).unwrap();
    let category = store.categories().find_by_user("u1").unwrap().remove(0);
    assert_eq!(category.r#type, CategoryType::Fixed);

    let m = leaf(&[
        "finpulse", "expense", "add", "--date", "2025-06-01", "--amount", "1200",
        "--category", "rent", "--description", "June rent", "--fixed",
    ]);
    let e = expenses::add(&store, &ctx(), &m).unwrap();
    assert_eq!(e.category_id, category.id);
    assert!(e.is_fixed);

    let m = leaf(&[
        "finpulse", "expense", "add", "--date", "2025-06-02", "--amount", "30",
        "--category", "99", "--description", "misc",
    ]);
    assert_eq!(expenses::add(&store, &ctx(), &m).unwrap().category_id, 99);

    let m = leaf(&[
        "finpulse", "expense", "add", "--date", "2025-06-02", "--amount", "30",
        "--category", "groceries", "--description", "misc",
    ]);
    assert!(expenses::add(&store, &ctx(), &m).is_err());
}

#[test]
fn debt_add_validates_counters() {
    let store = Store::open_in_memory().unwrap();
    let m = leaf(&[
        "finpulse", "debt", "add", "--description", "Car", "--total", "12000",
        "--installment", "1000", "--installments", "12", "--start", "2024-01-15",
    ]);
    let d = debts::add(&store, &ctx(), &m).unwrap();
    assert_eq!(d.remaining_installments, 12);
    assert_eq!(d.status, DebtStatus::Active);
    assert_eq!(d.end_date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());

    let m = leaf(&[
        "finpulse", "debt", "add", "--description", "Car", "--total", "12000",
        "--installment", "1000", "--installments", "12", "--remaining", "13",
        "--start", "2024-01-15",
    ]);
    assert!(debts::add(&store, &ctx(), &m).is_err());
}

#[test]
fn projection_only_filters() {
    let store = Store::open_in_memory().unwrap();
    let m = leaf(&["finpulse", "report", "projection", "--months", "3"]);
    let rows = reports::projection_rows(&store, &ctx(), &m).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].label, "Jun/25");

    let m = leaf(&["finpulse", "report", "projection", "--only", "negative"]);
    assert!(reports::projection_rows(&store, &ctx(), &m).unwrap().is_empty());
}

#[test]
fn savings_grow_defaults_to_a_year() {
    let m = leaf(&[
        "finpulse", "savings", "grow", "--initial", "1000", "--rate", "12",
    ]);
    let rows = savings::grow_rows(&ctx(), &m).unwrap();
    assert_eq!(rows.len(), 12);
    assert!(rows[11].amount > Decimal::from(1100));
}

#[test]
fn savings_grow_reports_runaway_balance() {
    let m = leaf(&[
        "finpulse", "savings", "grow", "--initial", "1000", "--rate", "300", "--months", "600",
    ]);
    let err = savings::grow_rows(&ctx(), &m).unwrap_err();
    assert!(err.to_string().contains("exceeds the representable amount"));
}

#[test]
fn savings_add_rejects_negative_balance() {
    let store = Store::open_in_memory().unwrap();
    let m = leaf(&[
        "finpulse", "savings", "add", "--name", "Reserve", "--amount=-50", "--rate", "10",
    ]);
    assert!(savings::add(&store, &ctx(), &m).is_err());
    assert!(store.savings_accounts().find_by_user("u1").unwrap().is_empty());

    let m = leaf(&["finpulse", "savings", "add", "--name", "Reserve", "--rate", "10"]);
    let account = savings::add(&store, &ctx(), &m).unwrap();
    assert_eq!(account.current_amount, Decimal::ZERO);
}

#[test]
fn export_history_csv_has_twelve_rows() {
    let store = Store::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("history.csv");
    let out_s = out.to_str().unwrap();
    let m = leaf(&["finpulse", "export", "history", "--out", out_s]);
    exporter::export_history(&store, &ctx(), &m).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 12);
    assert_eq!(&rows[0][2], "Jul/24");
    assert_eq!(&rows[11][2], "Jun/25");
}

#[test]
fn export_expenses_json() {
    let store = Store::open_in_memory().unwrap();
    let m = leaf(&[
        "finpulse", "expense", "add", "--date", "2025-06-01", "--amount", "12.50",
        "--category", "3", "--description", "Lunch",
    ]);
    expenses::add(&store, &ctx(), &m).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("expenses.json");
    let m = leaf(&[
        "finpulse", "export", "expenses", "--format", "json", "--month", "2025-06", "--out",
        out.to_str().unwrap(),
    ]);
    exporter::export_expenses(&store, &ctx(), &m).unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let items = v.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["description"], "Lunch");
    assert_eq!(items[0]["category"], "");
}
