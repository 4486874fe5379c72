// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::balance::{display_balance, total_balance};
use crate::models::AccountType;
use crate::utils::{gold_account_value, list_accounts, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balance", sub)) => balance(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = list_accounts(conn, false)?;

    let mut gold_values: HashMap<i64, Decimal> = HashMap::new();
    for a in accounts.iter().filter(|a| a.kind == AccountType::Gold) {
        gold_values.insert(a.id, gold_account_value(conn, a.id)?);
    }

    let mut data: Vec<Vec<String>> = accounts
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.kind.to_string(),
                a.currency.clone(),
                format!("{:.2}", display_balance(a, &gold_values)),
                if a.include_in_total { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    let total = total_balance(&accounts, &gold_values);
    data.push(vec![
        "TOTAL".into(),
        String::new(),
        String::new(),
        format!("{:.2}", total),
        String::new(),
    ]);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!(
            "{}",
            pretty_table(&["Account", "Type", "CCY", "Balance", "In Total"], data)
        );
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);

    let mut stmt = conn.prepare(
        "SELECT substr(date,1,7) AS month, kind, amount FROM transactions ORDER BY date DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    use std::collections::BTreeMap;
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for row in rows {
        let (m, kind, amount_s) = row?;
        let amount = crate::utils::parse_decimal(&amount_s)?;
        let entry = map.entry(m).or_insert((Decimal::ZERO, Decimal::ZERO));
        if kind == "income" {
            entry.0 += amount;
        } else {
            entry.1 += amount;
        }
    }

    let mut data = Vec::new();
    for (m, (inc, exp)) in map.iter().rev().take(months) {
        data.push(vec![
            m.clone(),
            format!("{:.2}", inc),
            format!("{:.2}", exp),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Month", "Income", "Expense"], data));
    }
    Ok(())
}
