// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, required};
use crate::config::USER_SETTING;
use crate::db::Store;
use crate::utils::pretty_table;
use anyhow::Result;
use std::path::Path;

pub fn handle(store: &Store, ctx: &Ctx, db_path: &Path, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-user", sub)) => {
            let name = required(sub, "name")?.trim();
            if name.is_empty() {
                anyhow::bail!("User name cannot be empty");
            }
            store.set_setting(USER_SETTING, name)?;
            println!("Default user set to '{}'", name);
        }
        Some(("show", _)) => {
            let data = vec![
                vec!["database".to_string(), db_path.display().to_string()],
                vec!["user".to_string(), ctx.user.clone()],
                vec![
                    "stored user".to_string(),
                    store.get_setting(USER_SETTING)?.unwrap_or_default(),
                ],
                vec!["as of".to_string(), ctx.now.date().to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], data));
        }
        _ => {}
    }
    Ok(())
}
