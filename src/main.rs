// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finpulse::commands::{self, Ctx};
use finpulse::{cli, config, utils};

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let (db_path, store) = config::open_store(matches.get_one::<String>("db").map(String::as_str))?;
    let now = match matches.get_one::<String>("as-of") {
        Some(d) => utils::parse_date(d)?.and_time(chrono::NaiveTime::MIN),
        None => chrono::Local::now().naive_local(),
    };
    let ctx = Ctx {
        user: config::resolve_user(matches.get_one::<String>("user").map(String::as_str), &store)?,
        now,
    };
    tracing::debug!(user = %ctx.user, db = %db_path.display(), "starting");

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db_path.display());
        }
        Some(("config", sub)) => commands::config::handle(&store, &ctx, &db_path, sub)?,
        Some(("income", sub)) => commands::incomes::handle(&store, &ctx, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&store, &ctx, sub)?,
        Some(("category", sub)) => commands::expenses::handle_category(&store, &ctx, sub)?,
        Some(("debt", sub)) => commands::debts::handle(&store, &ctx, sub)?,
        Some(("savings", sub)) => commands::savings::handle(&store, &ctx, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, &ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, &ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
