// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::gold::Lot;
use crate::models::{Account, AccountType, GoldType};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

const UA: &str = concat!(
    "paraclip/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/paraclip)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {}", d.round_dp(2), ccy)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

const ACCOUNT_COLS: &str = "id, name, type, currency, balance, is_active, include_in_total, \
     credit_limit, current_debt, statement_day, due_day, interest_rate, min_payment_rate";

type RawAccount = (
    i64,
    String,
    String,
    String,
    String,
    i64,
    i64,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<i64>,
    Option<String>,
    Option<String>,
);

fn raw_account(r: &Row<'_>) -> rusqlite::Result<RawAccount> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
        r.get(9)?,
        r.get(10)?,
        r.get(11)?,
        r.get(12)?,
    ))
}

/// Decodes a raw account row into a typed record, or fails. The rest of
/// the code never sees a partially-shaped account.
fn decode_account(raw: RawAccount) -> Result<Account> {
    let (
        id,
        name,
        type_s,
        currency,
        balance_s,
        is_active,
        include_in_total,
        limit_s,
        debt_s,
        statement_day,
        due_day,
        rate_s,
        min_rate_s,
    ) = raw;
    let kind = AccountType::from_str(&type_s)
        .with_context(|| format!("Account '{}' has an invalid type", name))?;
    let balance = Decimal::from_str_exact(&balance_s)
        .with_context(|| format!("Invalid stored balance '{}' for account {}", balance_s, name))?;
    let decode_opt = |field: &str, v: Option<String>| -> Result<Option<Decimal>> {
        v.map(|s| {
            Decimal::from_str_exact(&s)
                .with_context(|| format!("Invalid stored {} '{}' for account {}", field, s, name))
        })
        .transpose()
    };
    let credit_limit = decode_opt("credit_limit", limit_s)?.unwrap_or(Decimal::ZERO);
    let current_debt = decode_opt("current_debt", debt_s)?.unwrap_or(Decimal::ZERO);
    let interest_rate = decode_opt("interest_rate", rate_s)?;
    let min_payment_rate =
        decode_opt("min_payment_rate", min_rate_s)?.unwrap_or_else(|| Decimal::new(20, 2));
    Ok(Account {
        id,
        name,
        kind,
        currency,
        balance,
        is_active: is_active != 0,
        include_in_total: include_in_total != 0,
        credit_limit,
        current_debt,
        statement_day: statement_day.map(|d| d as u32),
        due_day: due_day.map(|d| d as u32),
        interest_rate,
        min_payment_rate,
    })
}

pub fn load_account(conn: &Connection, name: &str) -> Result<Account> {
    let sql = format!("SELECT {} FROM accounts WHERE name=?1", ACCOUNT_COLS);
    let raw = conn
        .query_row(&sql, params![name], raw_account)
        .optional()?
        .with_context(|| format!("Account '{}' not found", name))?;
    decode_account(raw)
}

pub fn load_account_by_id(conn: &Connection, id: i64) -> Result<Account> {
    let sql = format!("SELECT {} FROM accounts WHERE id=?1", ACCOUNT_COLS);
    let raw = conn
        .query_row(&sql, params![id], raw_account)
        .optional()?
        .with_context(|| format!("Account #{} not found", id))?;
    decode_account(raw)
}

pub fn list_accounts(conn: &Connection, include_inactive: bool) -> Result<Vec<Account>> {
    let sql = if include_inactive {
        format!("SELECT {} FROM accounts ORDER BY name", ACCOUNT_COLS)
    } else {
        format!(
            "SELECT {} FROM accounts WHERE is_active=1 ORDER BY name",
            ACCOUNT_COLS
        )
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], raw_account)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(decode_account(row?)?);
    }
    Ok(out)
}

/// Loads one gold type's lots oldest-first.
pub fn load_lots(conn: &Connection, account_id: i64, gold_type: GoldType) -> Result<Vec<Lot>> {
    let mut stmt = conn.prepare(
        "SELECT quantity, unit_price, purchased_at FROM gold_lots
         WHERE account_id=?1 AND gold_type=?2 ORDER BY purchased_at, id",
    )?;
    let rows = stmt.query_map(params![account_id, gold_type.as_str()], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut lots = Vec::new();
    for row in rows {
        let (qty_s, price_s, at_s) = row?;
        let quantity = Decimal::from_str_exact(&qty_s)
            .with_context(|| format!("Invalid stored lot quantity '{}'", qty_s))?;
        let unit_price = Decimal::from_str_exact(&price_s)
            .with_context(|| format!("Invalid stored lot price '{}'", price_s))?;
        let purchased_at = DateTime::parse_from_rfc3339(&at_s)
            .with_context(|| format!("Invalid lot timestamp '{}'", at_s))?
            .with_timezone(&Utc);
        lots.push(Lot {
            quantity,
            unit_price,
            purchased_at,
        });
    }
    Ok(lots)
}

pub fn load_all_lots(conn: &Connection, account_id: i64) -> Result<BTreeMap<GoldType, Vec<Lot>>> {
    let mut map = BTreeMap::new();
    for gt in GoldType::ALL {
        let lots = load_lots(conn, account_id, gt)?;
        if !lots.is_empty() {
            map.insert(gt, lots);
        }
    }
    Ok(map)
}

/// Replaces one gold type's lot rows with the surviving in-memory lots.
/// Callers run this inside a transaction alongside the rest of the sale.
pub fn replace_lots(
    conn: &Connection,
    account_id: i64,
    gold_type: GoldType,
    lots: &[Lot],
) -> Result<()> {
    conn.execute(
        "DELETE FROM gold_lots WHERE account_id=?1 AND gold_type=?2",
        params![account_id, gold_type.as_str()],
    )?;
    for lot in lots {
        conn.execute(
            "INSERT INTO gold_lots(account_id, gold_type, quantity, unit_price, purchased_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                account_id,
                gold_type.as_str(),
                lot.quantity.to_string(),
                lot.unit_price.to_string(),
                lot.purchased_at.to_rfc3339()
            ],
        )?;
    }
    Ok(())
}

/// Latest stored market price for a gold type, if any snapshot exists.
pub fn latest_price(conn: &Connection, gold_type: GoldType) -> Result<Option<Decimal>> {
    let row: Option<String> = conn
        .query_row(
            "SELECT price FROM gold_prices WHERE gold_type=?1 ORDER BY as_of DESC, id DESC LIMIT 1",
            params![gold_type.as_str()],
            |r| r.get(0),
        )
        .optional()?;
    row.map(|s| {
        Decimal::from_str_exact(&s)
            .with_context(|| format!("Invalid stored price '{}' for {}", s, gold_type))
    })
    .transpose()
}

/// Mark-to-market value of a gold account across all its lots. Types with
/// no stored quote are valued at cost.
pub fn gold_account_value(conn: &Connection, account_id: i64) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for (gt, lots) in load_all_lots(conn, account_id)? {
        let price = latest_price(conn, gt)?;
        for lot in &lots {
            total += lot.quantity * price.unwrap_or(lot.unit_price);
        }
    }
    Ok(total)
}

/// Rewrites a gold account's stored balance from its lots and the latest
/// quotes. Run after any lot or price change.
pub fn refresh_gold_balance(conn: &Connection, account_id: i64) -> Result<Decimal> {
    let value = gold_account_value(conn, account_id)?;
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![value.to_string(), account_id],
    )?;
    Ok(value)
}
