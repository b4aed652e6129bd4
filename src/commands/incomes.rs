// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, required, required_id};
use crate::db::Store;
use crate::models::{Income, IncomeType, NewIncome};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::{Context, Result, bail};

pub fn handle(store: &Store, ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let income = add(store, ctx, sub)?;
            println!(
                "Added {} income #{} of {} for {:04}-{:02}",
                income.r#type.as_str(),
                income.id,
                fmt_money(income.amount),
                income.year,
                income.month
            );
        }
        Some(("list", sub)) => list(store, ctx, sub)?,
        Some(("convert", sub)) => {
            let id = required_id(sub)?;
            let amount = parse_decimal(required(sub, "amount")?)?;
            match store.income_service().convert_to_real(id, amount)? {
                Some(i) => println!("Income #{} is now real: {}", i.id, fmt_money(i.amount)),
                None => bail!("Income #{} not found", id),
            }
        }
        Some(("rm", sub)) => {
            let id = required_id(sub)?;
            if !store.incomes().delete(id)? {
                bail!("Income #{} not found", id);
            }
            println!("Removed income #{}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn add(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<Income> {
    let period = parse_month(required(sub, "month")?)?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    if amount < rust_decimal::Decimal::ZERO {
        bail!("Income amount cannot be negative");
    }
    let kind = if sub.get_flag("estimated") {
        IncomeType::Estimated
    } else {
        IncomeType::Real
    };
    let income = store
        .incomes()
        .create(NewIncome {
            user_id: ctx.user.clone(),
            description: required(sub, "description")?.clone(),
            amount,
            month: period.month(),
            year: period.year(),
            r#type: kind,
        })
        .context("Failed to save income")?;
    Ok(income)
}

fn list(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let period = ctx.month_arg(sub)?;
    let overview = store
        .income_service()
        .overview(&ctx.user, period.month(), period.year())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &overview.incomes)? {
        return Ok(());
    }
    let data = overview
        .incomes
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.description.clone(),
                i.r#type.as_str().to_string(),
                fmt_money(i.amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Description", "Type", "Amount"], data)
    );
    println!(
        "{}: real {} + estimated {} = {}",
        period,
        fmt_money(overview.total_real),
        fmt_money(overview.total_estimated),
        fmt_money(overview.total)
    );
    Ok(())
}
