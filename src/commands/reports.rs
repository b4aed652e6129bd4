// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, required};
use crate::db::Store;
use crate::models::{AlertType, MonthlyProjection};
use crate::projection::DEFAULT_HORIZON;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use serde_json::json;

pub fn handle(store: &Store, ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, ctx, sub)?,
        Some(("categories", sub)) => categories(store, ctx, sub)?,
        Some(("projection", sub)) => {
            let rows = projection_rows(store, ctx, sub)?;
            print_projections(sub, &rows)?;
        }
        Some(("history", sub)) => {
            let rows = store
                .projection()
                .get_last_12_months_history(&ctx.user, ctx.current_month())?;
            print_projections(sub, &rows)?;
        }
        Some(("alerts", sub)) => alerts(store, ctx, sub)?,
        Some(("freedom", sub)) => {
            let period = ctx.month_arg(sub)?;
            let index = store.alerts().get_financial_freedom_index(
                &ctx.user,
                period.month(),
                period.year(),
            )?;
            let v = json!({ "month": period.to_string(), "freedom_index": index });
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &v)? {
                println!("Financial freedom index for {}: {}/100", period, index);
            }
        }
        Some(("simulate", sub)) => {
            let period = ctx.month_arg(sub)?;
            let amount = parse_decimal(required(sub, "amount")?)?;
            let sim = store.projection().simulate_expense(
                &ctx.user,
                period.month(),
                period.year(),
                amount,
            )?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &sim)? {
                println!(
                    "{}: {} -> {} ({})",
                    period,
                    fmt_money(sim.original_balance),
                    fmt_money(sim.new_balance),
                    if sim.is_still_positive {
                        "still positive"
                    } else {
                        "goes negative"
                    }
                );
            }
        }
        _ => {}
    }
    Ok(())
}

/// Projections for `report projection`, optionally narrowed by `--only`.
pub fn projection_rows(
    store: &Store,
    ctx: &Ctx,
    sub: &clap::ArgMatches,
) -> Result<Vec<MonthlyProjection>> {
    let months = sub
        .get_one::<u32>("months")
        .map(|n| *n as usize)
        .unwrap_or(DEFAULT_HORIZON);
    let now = ctx.current_month();
    let projection = store.projection();
    let rows = match sub.get_one::<String>("only").map(String::as_str) {
        Some("negative") => projection.get_negative_months(&ctx.user, months, now)?,
        Some("tight") => projection.get_tight_months(&ctx.user, months, now)?,
        _ => projection.project_next_months(&ctx.user, months, now)?,
    };
    Ok(rows)
}

fn summary(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let period = ctx.month_arg(sub)?;
    let s = store
        .finance()
        .get_monthly_summary(&ctx.user, period.month(), period.year())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let data = vec![
        vec!["Income".into(), fmt_money(s.total_income)],
        vec!["  of which estimated".into(), fmt_money(s.total_estimated_income)],
        vec!["Expenses".into(), fmt_money(s.total_expenses)],
        vec!["Debt installments".into(), fmt_money(s.total_debt_impact)],
        vec!["Balance".into(), fmt_money(s.balance)],
        vec!["Projected balance".into(), fmt_money(s.projected_balance)],
        vec!["Savings rate".into(), format!("{}%", fmt_percent(s.savings_rate))],
        vec!["Expense ratio".into(), format!("{}%", fmt_percent(s.expense_ratio))],
        vec!["Debt ratio".into(), format!("{}%", fmt_percent(s.debt_ratio))],
    ];
    let header = period.to_string();
    println!("{}", pretty_table(&[header.as_str(), "Value"], data));
    Ok(())
}

fn categories(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let period = ctx.month_arg(sub)?;
    let rows = store
        .dashboard()
        .category_breakdown(&ctx.user, period.month(), period.year())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let data = rows
        .into_iter()
        .map(|r| vec![r.name, fmt_money(r.total)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent"], data));
    Ok(())
}

fn alerts(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let period = ctx.month_arg(sub)?;
    let alerts =
        store
            .alerts()
            .generate_alerts(&ctx.user, period.month(), period.year(), ctx.now)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &alerts)? {
        return Ok(());
    }
    if alerts.is_empty() {
        println!("No alerts for {}", period);
        return Ok(());
    }
    let data = alerts
        .into_iter()
        .map(|a| {
            let level = match a.r#type {
                AlertType::Danger => "DANGER",
                AlertType::Warning => "WARN",
                AlertType::Info => "INFO",
            };
            vec![level.to_string(), a.title, a.message]
        })
        .collect();
    println!("{}", pretty_table(&["Level", "Alert", "Details"], data));
    Ok(())
}

fn print_projections(sub: &clap::ArgMatches, rows: &[MonthlyProjection]) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|p| {
            let flag = if p.is_negative {
                "negative"
            } else if p.is_tight {
                "tight"
            } else {
                ""
            };
            vec![
                p.label.clone(),
                fmt_money(p.projected_income),
                fmt_money(p.projected_expenses),
                fmt_money(p.projected_balance),
                flag.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Balance", ""], data)
    );
    Ok(())
}
