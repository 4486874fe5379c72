// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::credit::CardState;
use crate::ledger::LedgerError;
use crate::models::{Account, AccountType, TxKind};
use crate::utils::{fmt_money, load_account, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{bail, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::json;

pub const PAYMENT_CATEGORY: &str = "Credit Card Payment";

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("status", sub)) => status(conn, sub)?,
        Some(("purchase", sub)) => purchase(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn card_state(account: &Account) -> Result<CardState> {
    if account.kind != AccountType::Credit {
        bail!("Account '{}' is not a credit card", account.name);
    }
    Ok(CardState {
        limit: account.credit_limit,
        current_debt: account.current_debt,
        interest_rate: account.interest_rate,
        min_payment_rate: account.min_payment_rate,
    })
}

/// Writes the card's debt back, keeping the stored balance in its
/// `-current_debt` convention.
fn persist_card(conn: &Connection, account_id: i64, card: &CardState) -> Result<()> {
    conn.execute(
        "UPDATE accounts SET current_debt=?1, balance=?2 WHERE id=?3",
        params![
            card.current_debt.to_string(),
            (-card.current_debt).to_string(),
            account_id
        ],
    )?;
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account = load_account(conn, sub.get_one::<String>("card").unwrap().trim())?;
    let card = card_state(&account)?;
    let tiers = card.tiers();

    if sub.get_flag("json") {
        let v = json!({
            "card": account.name,
            "limit": card.limit,
            "current_debt": card.current_debt,
            "available_limit": card.available_limit(),
            "minimum_payment": card.minimum_payment(),
            "monthly_interest": card.monthly_interest(false),
            "monthly_interest_overdue": card.monthly_interest(true),
            "regular_rate": tiers.regular,
            "overdue_rate": tiers.overdue,
            "statement_day": account.statement_day,
            "due_day": account.due_day,
        });
        maybe_print_json(true, false, &v)?;
        return Ok(());
    }

    let ccy = &account.currency;
    let rows = vec![
        vec!["Limit".into(), fmt_money(&card.limit, ccy)],
        vec!["Current debt".into(), fmt_money(&card.current_debt, ccy)],
        vec!["Available limit".into(), fmt_money(&card.available_limit(), ccy)],
        vec!["Minimum payment".into(), fmt_money(&card.minimum_payment(), ccy)],
        vec![
            format!("Monthly interest ({}%)", tiers.regular),
            fmt_money(&card.monthly_interest(false), ccy),
        ],
        vec![
            format!("Overdue interest ({}%)", tiers.overdue),
            fmt_money(&card.monthly_interest(true), ccy),
        ],
    ];
    println!("{}", pretty_table(&[account.name.as_str(), "Value"], rows));
    Ok(())
}

fn purchase(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account = load_account(conn, sub.get_one::<String>("card").unwrap().trim())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let category = sub.get_one::<String>("category").map(|s| s.to_string());
    let note = sub.get_one::<String>("note").map(|s| s.to_string());
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => Utc::now().date_naive(),
    };

    let mut card = card_state(&account)?;
    card.apply_purchase(amount)?;

    let tx = conn.transaction()?;
    persist_card(&tx, account.id, &card)?;
    tx.execute(
        "INSERT INTO transactions(date, account_id, kind, amount, category, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            date.to_string(),
            account.id,
            TxKind::Expense.as_str(),
            amount.to_string(),
            category,
            note
        ],
    )?;
    tx.commit()?;

    println!(
        "Charged {} to '{}' (debt {}, available {})",
        fmt_money(&amount, &account.currency),
        account.name,
        card.current_debt.round_dp(2),
        card.available_limit().round_dp(2)
    );
    Ok(())
}

fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account = load_account(conn, sub.get_one::<String>("card").unwrap().trim())?;
    let source = load_account(conn, sub.get_one::<String>("from").unwrap().trim())?;
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => Utc::now().date_naive(),
    };

    let mut card = card_state(&account)?;
    if !source.kind.accepts_postings() {
        bail!(
            "Source account '{}' ({}) cannot fund a payment",
            source.name,
            source.kind
        );
    }

    let pay_full = sub.get_flag("full");
    let pay_min = sub.get_flag("min");
    let amount = if pay_full {
        card.current_debt
    } else if pay_min {
        card.minimum_payment()
    } else {
        match sub.get_one::<String>("amount") {
            Some(raw) => parse_decimal(raw.trim())?,
            None => bail!("Provide --amount, --full, or --min"),
        }
    };

    // Advisory only: a below-minimum partial payment is accepted, the
    // card will accrue interest on the rest.
    if !pay_full && !pay_min && amount < card.minimum_payment() && amount < card.current_debt {
        eprintln!(
            "warning: {} is below the minimum payment {}; interest may apply",
            amount.round_dp(2),
            card.minimum_payment().round_dp(2)
        );
    }

    // All validation up front; nothing is written until every check
    // passes. Overpayment is checked before the funds check.
    card.apply_payment(amount)?;
    if amount > source.balance {
        return Err(LedgerError::InsufficientFunds {
            required: amount,
            available: source.balance,
        }
        .into());
    }
    let new_source_balance = source.balance - amount;

    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![new_source_balance.to_string(), source.id],
    )?;
    persist_card(&tx, account.id, &card)?;
    tx.execute(
        "INSERT INTO transactions(date, account_id, kind, amount, category, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            date.to_string(),
            source.id,
            TxKind::Expense.as_str(),
            amount.to_string(),
            PAYMENT_CATEGORY,
            format!("Payment to '{}'", account.name)
        ],
    )?;
    tx.commit()?;

    println!(
        "Paid {} to '{}' from '{}' (debt {}, source balance {})",
        fmt_money(&amount, &account.currency),
        account.name,
        source.name,
        card.current_debt.round_dp(2),
        new_source_balance.round_dp(2)
    );
    Ok(())
}
