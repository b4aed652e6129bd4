// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, required, required_id};
use crate::db::Store;
use crate::models::{Category, CategoryType, Expense, NewCategory, NewExpense};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};
use std::collections::HashMap;

pub fn handle(store: &Store, ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let e = add(store, ctx, sub)?;
            println!(
                "Added expense #{} of {} on {}",
                e.id,
                fmt_money(e.amount),
                e.date
            );
        }
        Some(("list", sub)) => list(store, ctx, sub)?,
        Some(("rm", sub)) => {
            let id = required_id(sub)?;
            if !store.expenses().delete(id)? {
                bail!("Expense #{} not found", id);
            }
            println!("Removed expense #{}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_category(store: &Store, ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            let kind: CategoryType = required(sub, "type")?.parse()?;
            let c = store
                .categories()
                .create(NewCategory {
                    user_id: ctx.user.clone(),
                    name: name.clone(),
                    r#type: kind,
                    color: sub.get_one::<String>("color").cloned(),
                    icon: sub.get_one::<String>("icon").cloned(),
                })
                .with_context(|| format!("Failed to add category '{}'", name))?;
            println!("Added category '{}' (#{})", c.name, c.id);
        }
        Some(("list", _)) => {
            let data = store
                .categories()
                .find_by_user(&ctx.user)?
                .into_iter()
                .map(|c| {
                    vec![
                        c.id.to_string(),
                        c.name,
                        c.r#type.as_str().to_string(),
                        c.color.unwrap_or_default(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["ID", "Category", "Type", "Color"], data));
        }
        _ => {}
    }
    Ok(())
}

/// Accepts a category id or the name of one of the user's categories.
pub fn resolve_category(store: &Store, user: &str, raw: &str) -> Result<i64> {
    if let Ok(id) = raw.trim().parse::<i64>() {
        return Ok(id);
    }
    store
        .categories()
        .find_by_user(user)?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(raw.trim()))
        .map(|c| c.id)
        .with_context(|| format!("Unknown category '{}'", raw))
}

pub fn add(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<Expense> {
    let amount = parse_decimal(required(sub, "amount")?)?;
    if amount < rust_decimal::Decimal::ZERO {
        bail!("Expense amount cannot be negative");
    }
    let category_id = resolve_category(store, &ctx.user, required(sub, "category")?)?;
    let expense = store
        .expenses()
        .create(NewExpense {
            user_id: ctx.user.clone(),
            description: required(sub, "description")?.clone(),
            amount,
            category_id,
            date: parse_date(required(sub, "date")?)?,
            is_fixed: sub.get_flag("fixed"),
        })
        .context("Failed to save expense")?;
    Ok(expense)
}

fn list(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let period = ctx.month_arg(sub)?;
    let rows = store.expenses().find_by_month(&ctx.user, period)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let names: HashMap<i64, Category> = store
        .categories()
        .find_by_user(&ctx.user)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let total: rust_decimal::Decimal = rows.iter().map(|e| e.amount).sum();
    let data = rows
        .into_iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.to_string(),
                e.description,
                names
                    .get(&e.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| crate::dashboard::UNKNOWN_CATEGORY.to_string()),
                if e.is_fixed { "yes" } else { "" }.to_string(),
                fmt_money(e.amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Description", "Category", "Fixed", "Amount"],
            data
        )
    );
    println!("{} total: {}", period, fmt_money(total));
    Ok(())
}
