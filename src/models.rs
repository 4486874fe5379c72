// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Cash,
    Debit,
    Credit,
    Savings,
    Investment,
    Gold,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Cash => "cash",
            AccountType::Debit => "debit",
            AccountType::Credit => "credit",
            AccountType::Savings => "savings",
            AccountType::Investment => "investment",
            AccountType::Gold => "gold",
        }
    }

    /// Whether income/expense postings may mutate the stored balance directly.
    /// Credit balances derive from debt, gold balances from lots.
    pub fn accepts_postings(&self) -> bool {
        !matches!(self, AccountType::Credit | AccountType::Gold)
    }
}

impl FromStr for AccountType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(AccountType::Cash),
            "debit" => Ok(AccountType::Debit),
            "credit" => Ok(AccountType::Credit),
            "savings" => Ok(AccountType::Savings),
            "investment" => Ok(AccountType::Investment),
            "gold" => Ok(AccountType::Gold),
            other => Err(anyhow!(
                "Unknown account type '{}' (use cash|debit|credit|savings|investment|gold)",
                other
            )),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoldType {
    Gram,
    Quarter,
    Half,
    Full,
}

impl GoldType {
    pub const ALL: [GoldType; 4] = [
        GoldType::Gram,
        GoldType::Quarter,
        GoldType::Half,
        GoldType::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoldType::Gram => "gram",
            GoldType::Quarter => "quarter",
            GoldType::Half => "half",
            GoldType::Full => "full",
        }
    }
}

impl FromStr for GoldType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gram" => Ok(GoldType::Gram),
            "quarter" => Ok(GoldType::Quarter),
            "half" => Ok(GoldType::Half),
            "full" => Ok(GoldType::Full),
            other => Err(anyhow!(
                "Unknown gold type '{}' (use gram|quarter|half|full)",
                other
            )),
        }
    }
}

impl fmt::Display for GoldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl FromStr for TxKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(anyhow!("Unknown kind '{}' (use income|expense)", other)),
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully decoded account row. Storage reads go through
/// `utils::load_account*`, which fails with a decoding error instead of
/// handing callers partially-shaped data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountType,
    pub currency: String,
    pub balance: Decimal,
    pub is_active: bool,
    pub include_in_total: bool,
    pub credit_limit: Decimal,
    pub current_debt: Decimal,
    pub statement_day: Option<u32>,
    pub due_day: Option<u32>,
    pub interest_rate: Option<Decimal>,
    pub min_payment_rate: Decimal,
}
