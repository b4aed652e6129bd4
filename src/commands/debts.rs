// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, required, required_id};
use crate::db::Store;
use crate::models::{Debt, DebtStatus, NewDebt};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};

pub fn handle(store: &Store, ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let d = add(store, ctx, sub)?;
            println!(
                "Added debt #{} '{}': {} x {} until {}",
                d.id,
                d.description,
                d.total_installments,
                fmt_money(d.installment_value),
                d.end_date
            );
        }
        Some(("list", sub)) => list(store, ctx, sub)?,
        Some(("pay", sub)) => {
            let id = required_id(sub)?;
            match store.debt_service().pay_installment(id)? {
                Some(d) if d.status == DebtStatus::Paid => {
                    println!("Debt #{} is fully paid", d.id)
                }
                Some(d) => println!(
                    "Debt #{}: {} installment(s) left",
                    d.id, d.remaining_installments
                ),
                None => bail!("Debt #{} not found", id),
            }
        }
        Some(("settle", sub)) => {
            let id = required_id(sub)?;
            if store.debt_service().mark_as_paid(id)?.is_none() {
                bail!("Debt #{} not found", id);
            }
            println!("Debt #{} marked as paid", id);
        }
        Some(("rm", sub)) => {
            let id = required_id(sub)?;
            if !store.debts().delete(id)? {
                bail!("Debt #{} not found", id);
            }
            println!("Removed debt #{}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn add(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<Debt> {
    let total_installments = sub
        .get_one::<u32>("installments")
        .copied()
        .context("Missing --installments")?;
    let remaining = sub
        .get_one::<u32>("remaining")
        .copied()
        .unwrap_or(total_installments);
    if remaining > total_installments {
        bail!(
            "Remaining installments ({}) exceed the total ({})",
            remaining,
            total_installments
        );
    }
    let total_amount = parse_decimal(required(sub, "total")?)?;
    let installment_value = parse_decimal(required(sub, "installment")?)?;
    if total_amount < rust_decimal::Decimal::ZERO || installment_value < rust_decimal::Decimal::ZERO
    {
        bail!("Debt amounts cannot be negative");
    }
    let status = if remaining == 0 {
        DebtStatus::Paid
    } else {
        DebtStatus::Active
    };
    let debt = store
        .debts()
        .create(NewDebt {
            user_id: ctx.user.clone(),
            description: required(sub, "description")?.clone(),
            total_amount,
            installment_value,
            total_installments,
            remaining_installments: remaining,
            start_date: parse_date(required(sub, "start")?)?,
            status,
        })
        .context("Failed to save debt")?;
    Ok(debt)
}

fn list(store: &Store, ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let overview = store.debt_service().overview(&ctx.user, ctx.current_month())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &overview)? {
        return Ok(());
    }
    let data = overview
        .active
        .iter()
        .chain(overview.paid.iter())
        .map(|d| {
            vec![
                d.id.to_string(),
                d.description.clone(),
                fmt_money(d.installment_value),
                format!("{}/{}", d.remaining_installments, d.total_installments),
                d.start_date.to_string(),
                d.end_date.to_string(),
                d.status.as_str().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Description", "Installment", "Left", "Start", "End", "Status"],
            data
        )
    );
    println!(
        "Outstanding: {}  This month: {}",
        fmt_money(overview.total_remaining),
        fmt_money(overview.total_monthly_impact)
    );
    Ok(())
}
