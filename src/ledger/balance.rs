// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::LedgerError;
use crate::models::{Account, AccountType, TxKind};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Applies an income/expense posting to a free-standing balance.
/// Credit and gold balances are derived, never posted to directly.
pub fn post(
    kind: AccountType,
    balance: Decimal,
    tx: TxKind,
    amount: Decimal,
) -> Result<Decimal, LedgerError> {
    if !kind.accepts_postings() {
        return Err(LedgerError::Validation(format!(
            "Cannot post directly to a {} account; its balance is derived",
            kind
        )));
    }
    if amount <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Transaction amount must be positive, got {}",
            amount
        )));
    }
    Ok(match tx {
        TxKind::Income => balance + amount,
        TxKind::Expense => balance - amount,
    })
}

/// The balance an account presents: stored for postable types, negated
/// debt for credit cards, mark-to-market for gold.
pub fn display_balance(account: &Account, gold_values: &HashMap<i64, Decimal>) -> Decimal {
    match account.kind {
        AccountType::Credit => -account.current_debt,
        AccountType::Gold => gold_values.get(&account.id).copied().unwrap_or(Decimal::ZERO),
        _ => account.balance,
    }
}

/// Dashboard total over active, opted-in accounts. Credit accounts
/// contribute `-current_debt`, never their stored balance.
pub fn total_balance(accounts: &[Account], gold_values: &HashMap<i64, Decimal>) -> Decimal {
    accounts
        .iter()
        .filter(|a| a.is_active && a.include_in_total)
        .map(|a| display_balance(a, gold_values))
        .sum()
}
