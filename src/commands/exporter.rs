// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, required};
use crate::db::Store;
use crate::utils::fmt_money;
use anyhow::{Context, Result, bail};
use serde_json::json;
use std::collections::HashMap;

pub fn handle(store: &Store, ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("history", sub)) => export_history(store, ctx, sub),
        Some(("expenses", sub)) => export_expenses(store, ctx, sub),
        _ => Ok(()),
    }
}

pub fn export_history(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let rows = store
        .projection()
        .get_last_12_months_history(&ctx.user, ctx.current_month())?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Failed to create {}", out))?;
            wtr.write_record([
                "month", "year", "label", "income", "expenses", "balance", "negative", "tight",
            ])?;
            for p in &rows {
                wtr.write_record([
                    p.month.to_string(),
                    p.year.to_string(),
                    p.label.clone(),
                    fmt_money(p.projected_income),
                    fmt_money(p.projected_expenses),
                    fmt_money(p.projected_balance),
                    p.is_negative.to_string(),
                    p.is_tight.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)
                .with_context(|| format!("Failed to write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} months of history to {}", rows.len(), out);
    Ok(())
}

pub fn export_expenses(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let period = ctx.month_arg(sub)?;
    let expenses = store.expenses().find_by_month(&ctx.user, period)?;
    let names: HashMap<i64, String> = store
        .categories()
        .find_by_user(&ctx.user)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let category_of = |id: i64| names.get(&id).cloned().unwrap_or_default();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Failed to create {}", out))?;
            wtr.write_record(["date", "description", "category", "amount", "fixed"])?;
            for e in &expenses {
                wtr.write_record([
                    e.date.to_string(),
                    e.description.clone(),
                    category_of(e.category_id),
                    e.amount.to_string(),
                    e.is_fixed.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = expenses
                .iter()
                .map(|e| {
                    json!({
                        "date": e.date, "description": e.description,
                        "category": category_of(e.category_id), "amount": e.amount,
                        "fixed": e.is_fixed
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Failed to write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} expenses for {} to {}", expenses.len(), period, out);
    Ok(())
}
