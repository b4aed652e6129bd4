// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, required, required_id};
use crate::db::Store;
use crate::models::{NewSavingsAccount, SavingsAccount, SavingsAccountPatch, SavingsProjection};
use crate::savings::{calculate_monthly_yield, project_compound_growth};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;

pub fn handle(store: &Store, ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let a = add(store, ctx, sub)?;
            println!(
                "Added savings account #{} '{}' at {}% a year",
                a.id, a.name, a.annual_yield_rate
            );
        }
        Some(("list", sub)) => list(store, ctx, sub)?,
        Some(("rate", sub)) => {
            let id = required_id(sub)?;
            let rate = parse_decimal(required(sub, "rate")?)?;
            let patch = SavingsAccountPatch {
                annual_yield_rate: Some(rate),
                ..Default::default()
            };
            match store.savings_accounts().update(id, patch)? {
                Some(a) => println!(
                    "Account #{} now yields {}% a year ({:.4}% a month)",
                    a.id,
                    a.annual_yield_rate,
                    a.monthly_yield_rate * 100.0
                ),
                None => bail!("Savings account #{} not found", id),
            }
        }
        Some(("deposit", sub)) => movement(store, ctx, sub, true)?,
        Some(("withdraw", sub)) => movement(store, ctx, sub, false)?,
        Some(("history", sub)) => {
            let id = required_id(sub)?;
            let rows = store.savings().history(id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|t| {
                        vec![
                            t.date.to_string(),
                            t.r#type.as_str().to_string(),
                            fmt_money(t.amount),
                            t.description.unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Date", "Type", "Amount", "Description"], data)
                );
            }
        }
        Some(("project", sub)) => {
            let id = required_id(sub)?;
            let months = sub.get_one::<u32>("months").copied().unwrap_or(12);
            let Some(rows) = store
                .savings()
                .project_account(id, months, ctx.current_month())?
            else {
                bail!("Savings account #{} not found", id);
            };
            print_projection(sub, &rows)?;
        }
        Some(("grow", sub)) => {
            let rows = grow_rows(ctx, sub)?;
            print_projection(sub, &rows)?;
        }
        _ => {}
    }
    Ok(())
}

pub fn add(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<SavingsAccount> {
    let current_amount = parse_decimal(required(sub, "amount")?)?;
    if current_amount < Decimal::ZERO {
        bail!("Savings balance cannot be negative");
    }
    let account = store
        .savings_accounts()
        .create(NewSavingsAccount {
            user_id: ctx.user.clone(),
            name: required(sub, "name")?.clone(),
            current_amount,
            annual_yield_rate: parse_decimal(required(sub, "rate")?)?,
        })
        .context("Failed to create savings account")?;
    Ok(account)
}

/// Compound growth table for `savings grow`, starting at the current month.
pub fn grow_rows(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<Vec<SavingsProjection>> {
    let initial = parse_decimal(required(sub, "initial")?)?;
    let deposit = parse_decimal(required(sub, "deposit")?)?;
    let rate = parse_decimal(required(sub, "rate")?)?;
    let months = sub.get_one::<u32>("months").copied().unwrap_or(12);
    Ok(project_compound_growth(
        initial,
        deposit,
        rate,
        months,
        ctx.current_month(),
    )?)
}

fn movement(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches, deposit: bool) -> Result<()> {
    let id = required_id(sub)?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => ctx.now.date(),
    };
    let description = sub.get_one::<String>("description").cloned();
    let savings = store.savings();
    let outcome = if deposit {
        savings.deposit(id, amount, date, description)?
    } else {
        savings.withdraw(id, amount, date, description)?
    };
    match outcome {
        Some((account, entry)) => println!(
            "{} {} on {}; '{}' balance is now {}",
            if deposit { "Deposited" } else { "Withdrew" },
            fmt_money(entry.amount),
            entry.date,
            account.name,
            fmt_money(account.current_amount)
        ),
        None => bail!("Savings account #{} not found", id),
    }
    Ok(())
}

fn list(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = store.savings_accounts().find_by_user(&ctx.user)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
        return Ok(());
    }
    let mut data = Vec::new();
    for a in &accounts {
        data.push(vec![
            a.id.to_string(),
            a.name.clone(),
            fmt_money(a.current_amount),
            format!("{}%", a.annual_yield_rate),
            fmt_money(calculate_monthly_yield(a)?),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["ID", "Account", "Balance", "Annual", "Monthly yield"], data)
    );
    let savings = store.savings();
    println!(
        "Total: {}  Monthly yield: {}  Annual yield: {}",
        fmt_money(savings.get_total_savings(&ctx.user)?),
        fmt_money(savings.get_total_monthly_yield(&ctx.user)?),
        fmt_money(savings.get_total_annual_yield(&ctx.user)?)
    );
    Ok(())
}

fn print_projection(sub: &clap::ArgMatches, rows: &[SavingsProjection]) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.label.clone(),
                fmt_money(r.amount),
                fmt_money(r.earnings),
                fmt_money(r.cumulative_earnings),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Balance", "Earnings", "Cumulative"], data)
    );
    Ok(())
}
