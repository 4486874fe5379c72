// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::balance;
use crate::models::TxKind;
use crate::utils::{load_account, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => Utc::now().date_naive(),
    };
    let account_name = sub.get_one::<String>("account").unwrap().trim();
    let kind = TxKind::from_str(sub.get_one::<String>("kind").unwrap().trim())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let category = sub.get_one::<String>("category").map(|s| s.to_string());
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    let account = load_account(conn, account_name)?;
    let new_balance = balance::post(account.kind, account.balance, kind, amount)?;

    // Balance update and ledger row land together or not at all.
    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![new_balance.to_string(), account.id],
    )?;
    tx.execute(
        "INSERT INTO transactions(date, account_id, kind, amount, category, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            date.to_string(),
            account.id,
            kind.as_str(),
            amount.to_string(),
            category,
            note
        ],
    )?;
    tx.commit()?;

    println!(
        "Recorded {} of {} on {} (acct: {}, balance {})",
        kind,
        amount,
        date,
        account.name,
        new_balance.round_dp(2)
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub account: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.account.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Account", "Kind", "Amount", "Category", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.date, a.name, t.kind, t.amount, t.category, t.description FROM transactions t \
         LEFT JOIN accounts a ON t.account_id=a.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND a.name=?");
        params_vec.push(acct.into());
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        sql.push_str(" AND t.kind=?");
        params_vec.push(kind.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let account: Option<String> = r.get(1)?;
        let kind: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let category: Option<String> = r.get(4)?;
        let description: Option<String> = r.get(5)?;
        data.push(TransactionRow {
            date,
            account: account.unwrap_or_default(),
            kind,
            amount,
            category: category.unwrap_or_default(),
            description: description.unwrap_or_default(),
        });
    }
    Ok(data)
}
