// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::prices;
use crate::ledger::gold::{self, Valuation};
use crate::models::{Account, AccountType, GoldType, TxKind};
use crate::utils::{
    fmt_money, latest_price, load_account, load_all_lots, load_lots, maybe_print_json, parse_date,
    parse_decimal, pretty_table, refresh_gold_balance, replace_lots,
};
use anyhow::{bail, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

pub const SALE_CATEGORY: &str = "Gold Sale";

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("buy", sub)) => buy(conn, sub)?,
        Some(("sell", sub)) => sell(conn, sub)?,
        Some(("value", sub)) => value(conn, sub)?,
        Some(("lots", sub)) => lots(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn gold_account(conn: &Connection, name: &str) -> Result<Account> {
    let account = load_account(conn, name)?;
    if account.kind != AccountType::Gold {
        bail!("Account '{}' is not a gold account", account.name);
    }
    Ok(account)
}

fn buy(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account = gold_account(conn, sub.get_one::<String>("account").unwrap().trim())?;
    let gold_type = GoldType::from_str(sub.get_one::<String>("type").unwrap().trim())?;
    let quantity = parse_decimal(sub.get_one::<String>("quantity").unwrap().trim())?;
    let unit_price = parse_decimal(sub.get_one::<String>("price").unwrap().trim())?;
    let purchased_at = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now),
        None => Utc::now(),
    };

    // Purchases stay discrete lots; the ledger rejects bad quantities
    // before anything is written.
    let mut staged = Vec::new();
    gold::add_lot(&mut staged, quantity, unit_price, purchased_at)?;
    let lot = &staged[0];

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO gold_lots(account_id, gold_type, quantity, unit_price, purchased_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            account.id,
            gold_type.as_str(),
            lot.quantity.to_string(),
            lot.unit_price.to_string(),
            lot.purchased_at.to_rfc3339()
        ],
    )?;
    let balance = refresh_gold_balance(&tx, account.id)?;
    tx.commit()?;

    println!(
        "Added lot: {} x {} gold @ {} (account '{}', value {})",
        quantity,
        gold_type,
        unit_price,
        account.name,
        balance.round_dp(2)
    );
    Ok(())
}

fn sell(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account = gold_account(conn, sub.get_one::<String>("account").unwrap().trim())?;
    let target = load_account(conn, sub.get_one::<String>("to").unwrap().trim())?;
    let gold_type = GoldType::from_str(sub.get_one::<String>("type").unwrap().trim())?;
    let quantity = parse_decimal(sub.get_one::<String>("quantity").unwrap().trim())?;
    let unit_price = parse_decimal(sub.get_one::<String>("price").unwrap().trim())?;
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => Utc::now().date_naive(),
    };

    if !target.kind.accepts_postings() {
        bail!(
            "Target account '{}' ({}) cannot receive sale proceeds",
            target.name,
            target.kind
        );
    }

    // FIFO consumption happens in memory first; InsufficientHoldings
    // propagates before any write.
    let mut lots = load_lots(conn, account.id, gold_type)?;
    let proceeds = gold::sell_fifo(&mut lots, quantity, unit_price)?;
    let new_target_balance = target.balance + proceeds;

    // Surviving lots, the target credit, and the ledger row commit as
    // one sqlite transaction.
    let tx = conn.transaction()?;
    replace_lots(&tx, account.id, gold_type, &lots)?;
    refresh_gold_balance(&tx, account.id)?;
    tx.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![new_target_balance.to_string(), target.id],
    )?;
    tx.execute(
        "INSERT INTO transactions(date, account_id, kind, amount, category, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            date.to_string(),
            target.id,
            TxKind::Income.as_str(),
            proceeds.to_string(),
            SALE_CATEGORY,
            format!("Sold {} x {} gold from '{}'", quantity, gold_type, account.name)
        ],
    )?;
    tx.commit()?;

    println!(
        "Sold {} x {} gold for {} -> '{}' (balance {})",
        quantity,
        gold_type,
        fmt_money(&proceeds, &target.currency),
        target.name,
        new_target_balance.round_dp(2)
    );
    Ok(())
}

fn value(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    if sub.get_flag("live") {
        prices::refresh(conn)?;
    }
    let account = gold_account(conn, sub.get_one::<String>("account").unwrap().trim())?;

    let mut rows = Vec::new();
    let mut parts = Vec::new();
    for (gt, lots) in load_all_lots(conn, account.id)? {
        // Types with no stored quote are valued at their own cost.
        let market = match latest_price(conn, gt)? {
            Some(p) => p,
            None => {
                let qty: Decimal = lots.iter().map(|l| l.quantity).sum();
                if qty.is_zero() {
                    continue;
                }
                lots.iter()
                    .map(|l| l.quantity * l.unit_price)
                    .sum::<Decimal>()
                    / qty
            }
        };
        let v = gold::value_lots(&lots, market);
        rows.push((gt, v));
        parts.push(v);
    }
    let total = Valuation::combine(parts);

    if sub.get_flag("json") {
        let v = json!({
            "account": account.name,
            "types": rows.iter().map(|(gt, v)| json!({
                "gold_type": gt,
                "current_value": v.current_value,
                "cost_basis": v.cost_basis,
                "profit_loss": v.profit_loss,
                "profit_loss_pct": v.profit_loss_pct.round_dp(2),
            })).collect::<Vec<_>>(),
            "total_value": total.current_value,
            "total_cost_basis": total.cost_basis,
            "total_profit_loss": total.profit_loss,
            "total_profit_loss_pct": total.profit_loss_pct.round_dp(2),
        });
        maybe_print_json(true, false, &v)?;
        return Ok(());
    }

    let mut data: Vec<Vec<String>> = rows
        .into_iter()
        .map(|(gt, v)| {
            vec![
                gt.to_string(),
                format!("{:.2}", v.current_value),
                format!("{:.2}", v.cost_basis),
                format!("{:.2}", v.profit_loss),
                format!("{:.2}%", v.profit_loss_pct),
            ]
        })
        .collect();
    data.push(vec![
        "TOTAL".into(),
        format!("{:.2}", total.current_value),
        format!("{:.2}", total.cost_basis),
        format!("{:.2}", total.profit_loss),
        format!("{:.2}%", total.profit_loss_pct),
    ]);
    println!(
        "{}",
        pretty_table(&["Type", "Value", "Cost", "P/L", "P/L %"], data)
    );
    Ok(())
}

fn lots(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account = gold_account(conn, sub.get_one::<String>("account").unwrap().trim())?;
    let mut data = Vec::new();
    for (gt, lots) in load_all_lots(conn, account.id)? {
        for lot in lots {
            data.push(vec![
                gt.to_string(),
                format!("{}", lot.quantity),
                format!("{:.2}", lot.unit_price),
                lot.purchased_at.format("%Y-%m-%d").to_string(),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Type", "Qty", "Unit Price", "Purchased"], data)
    );
    Ok(())
}
