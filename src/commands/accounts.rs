// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::rates::validate_statement_day;
use crate::models::AccountType;
use crate::utils::{
    fmt_money, list_accounts, load_account, maybe_print_json, parse_decimal, pretty_table,
};
use anyhow::{bail, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let kind = AccountType::from_str(sub.get_one::<String>("type").unwrap().trim())?;
    let currency = sub
        .get_one::<String>("currency")
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_else(|| "TRY".to_string());
    let include_in_total = !sub.get_flag("exclude-from-total");

    let today = Utc::now().date_naive();

    match kind {
        AccountType::Credit => {
            let limit = match sub.get_one::<String>("limit") {
                Some(raw) => parse_decimal(raw.trim())?,
                None => bail!("Credit accounts require --limit"),
            };
            if limit < Decimal::ZERO {
                bail!("Credit limit must not be negative, got {}", limit);
            }
            let debt = match sub.get_one::<String>("debt") {
                Some(raw) => parse_decimal(raw.trim())?,
                None => Decimal::ZERO,
            };
            if debt < Decimal::ZERO || debt > limit {
                bail!("Opening debt must be within [0, {}], got {}", limit, debt);
            }
            let statement_day = sub
                .get_one::<u32>("statement-day")
                .map(|d| validate_statement_day(*d, today))
                .transpose()?;
            let due_day = sub
                .get_one::<u32>("due-day")
                .map(|d| validate_statement_day(*d, today))
                .transpose()?;
            let interest_rate = sub
                .get_one::<String>("interest-rate")
                .map(|s| parse_decimal(s.trim()))
                .transpose()?;

            // Stored balance mirrors the debt with a negative sign; debt
            // is the field every later mutation goes through.
            conn.execute(
                "INSERT INTO accounts(name, type, currency, balance, include_in_total,
                     credit_limit, current_debt, statement_day, due_day, interest_rate, min_payment_rate)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    name,
                    kind.as_str(),
                    currency,
                    (-debt).to_string(),
                    include_in_total,
                    limit.to_string(),
                    debt.to_string(),
                    statement_day,
                    due_day,
                    interest_rate.map(|r| r.to_string()),
                    Decimal::new(20, 2).to_string()
                ],
            )?;
            println!(
                "Added credit card '{}' (limit {}, debt {})",
                name,
                fmt_money(&limit, &currency),
                fmt_money(&debt, &currency)
            );
        }
        AccountType::Gold => {
            if sub.get_one::<String>("balance").is_some() {
                bail!("Gold accounts start empty; record lots with 'gold buy'");
            }
            conn.execute(
                "INSERT INTO accounts(name, type, currency, balance, include_in_total)
                 VALUES (?1, ?2, ?3, '0', ?4)",
                params![name, kind.as_str(), currency, include_in_total],
            )?;
            println!("Added gold account '{}'", name);
        }
        _ => {
            let balance = match sub.get_one::<String>("balance") {
                Some(raw) => parse_decimal(raw.trim())?,
                None => Decimal::ZERO,
            };
            conn.execute(
                "INSERT INTO accounts(name, type, currency, balance, include_in_total)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    name,
                    kind.as_str(),
                    currency,
                    balance.to_string(),
                    include_in_total
                ],
            )?;
            println!(
                "Added account '{}' ({}, {})",
                name,
                kind,
                fmt_money(&balance, &currency)
            );
        }
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = list_accounts(conn, sub.get_flag("all"))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
        return Ok(());
    }
    let rows = accounts
        .into_iter()
        .map(|a| {
            let detail = match a.kind {
                AccountType::Credit => format!(
                    "debt {} / limit {}",
                    a.current_debt.round_dp(2),
                    a.credit_limit.round_dp(2)
                ),
                _ => String::new(),
            };
            vec![
                a.name,
                a.kind.to_string(),
                a.currency,
                format!("{:.2}", a.balance),
                if a.is_active { "yes" } else { "no" }.to_string(),
                detail,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Name", "Type", "CCY", "Balance", "Active", "Detail"],
            rows
        )
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let account = load_account(conn, &name)?;
    let today = Utc::now().date_naive();

    if let Some(new_name) = sub.get_one::<String>("new-name") {
        conn.execute(
            "UPDATE accounts SET name=?1 WHERE id=?2",
            params![new_name.trim(), account.id],
        )?;
    }
    if let Some(raw) = sub.get_one::<String>("limit") {
        if account.kind != AccountType::Credit {
            bail!("--limit only applies to credit accounts");
        }
        let limit = parse_decimal(raw.trim())?;
        if limit < Decimal::ZERO {
            bail!("Credit limit must not be negative, got {}", limit);
        }
        conn.execute(
            "UPDATE accounts SET credit_limit=?1 WHERE id=?2",
            params![limit.to_string(), account.id],
        )?;
    }
    if let Some(day) = sub.get_one::<u32>("statement-day") {
        if account.kind != AccountType::Credit {
            bail!("--statement-day only applies to credit accounts");
        }
        let day = validate_statement_day(*day, today)?;
        conn.execute(
            "UPDATE accounts SET statement_day=?1 WHERE id=?2",
            params![day, account.id],
        )?;
    }
    if let Some(day) = sub.get_one::<u32>("due-day") {
        if account.kind != AccountType::Credit {
            bail!("--due-day only applies to credit accounts");
        }
        let day = validate_statement_day(*day, today)?;
        conn.execute(
            "UPDATE accounts SET due_day=?1 WHERE id=?2",
            params![day, account.id],
        )?;
    }
    if let Some(include) = sub.get_one::<bool>("include-in-total") {
        conn.execute(
            "UPDATE accounts SET include_in_total=?1 WHERE id=?2",
            params![*include, account.id],
        )?;
    }
    println!("Updated account '{}'", name);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let account = load_account(conn, &name)?;
    if sub.get_flag("hard") {
        conn.execute("DELETE FROM accounts WHERE id=?1", params![account.id])?;
        println!("Removed account '{}' and its history", name);
    } else {
        conn.execute(
            "UPDATE accounts SET is_active=0 WHERE id=?1",
            params![account.id],
        )?;
        println!("Deactivated account '{}'", name);
    }
    Ok(())
}
