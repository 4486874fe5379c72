// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure accounting rules: rate tables, credit-card debt bookkeeping,
//! FIFO-costed gold lots, and balance aggregation. No I/O happens here;
//! the command layer loads records, calls these functions, and persists
//! the results inside a single sqlite transaction.

pub mod balance;
pub mod credit;
pub mod gold;
pub mod rates;

use rust_decimal::Decimal;
use thiserror::Error;

/// Typed rejection reasons. Every variant carries the amounts involved so
/// the caller can print a message that says exactly why the operation was
/// refused. A rejected operation never mutates anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("Insufficient holdings: requested {requested}, only {available} available")]
    InsufficientHoldings {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Insufficient funds: payment of {required} exceeds source balance {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Limit exceeded: purchase of {amount} exceeds available limit {available}")]
    LimitExceeded { amount: Decimal, available: Decimal },

    #[error("Overpayment rejected: {amount} exceeds current debt {debt}")]
    OverpaymentRejected { amount: Decimal, debt: Decimal },

    #[error("Statement/due day must be between 1 and 30, got {0}")]
    DayOutOfRange(u32),
}
