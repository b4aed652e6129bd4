// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{Store, default_db_path};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DB_ENV: &str = "FINPULSE_DB";
pub const USER_ENV: &str = "FINPULSE_USER";
pub const USER_SETTING: &str = "user";
pub const DEFAULT_USER: &str = "local";

/// Where the database lives. `explicit` carries `--db` or `FINPULSE_DB`.
pub fn resolve_db_path(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(p) => Ok(PathBuf::from(p)),
        None => default_db_path(),
    }
}

/// Acting user: `--user`/`FINPULSE_USER`, then the stored setting, then `local`.
pub fn resolve_user(explicit: Option<&str>, store: &Store) -> Result<String> {
    if let Some(u) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(u.to_string());
    }
    let stored = store
        .get_setting(USER_SETTING)
        .context("Failed to read user setting")?;
    Ok(stored.unwrap_or_else(|| DEFAULT_USER.to_string()))
}

/// Opens (and migrates) the database, returning the path actually used.
pub fn open_store(explicit: Option<&str>) -> Result<(PathBuf, Store)> {
    let path = resolve_db_path(explicit)?;
    let store = Store::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    Ok((path, store))
}
