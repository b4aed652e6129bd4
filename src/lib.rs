// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod debts;
pub mod error;
pub mod finance;
pub mod incomes;
pub mod models;
pub mod period;
pub mod projection;
pub mod repo;
pub mod savings;
pub mod utils;

pub use db::Store;
pub use error::{Error, Result};
pub use period::YearMonth;
