// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid month {month}, expected 1-12")]
    InvalidPeriod { month: u32 },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Invalid amount {0}")]
    InvalidAmount(Decimal),
}

pub type Result<T> = std::result::Result<T, Error>;
