// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::AccountType;
use crate::utils::{list_accounts, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Credit debt outside [0, limit]
    for a in list_accounts(conn, true)? {
        if a.kind == AccountType::Credit
            && (a.current_debt < Decimal::ZERO || a.current_debt > a.credit_limit)
        {
            rows.push(vec![
                "debt_out_of_bounds".into(),
                format!(
                    "{}: debt {} limit {}",
                    a.name, a.current_debt, a.credit_limit
                ),
            ]);
        }
    }

    // 2) Lots with non-positive quantity (should have been dropped on sale)
    let mut stmt = conn.prepare(
        "SELECT g.id, a.name, g.quantity FROM gold_lots g JOIN accounts a ON g.account_id=a.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let qty_s: String = r.get(2)?;
        let qty = Decimal::from_str_exact(&qty_s).unwrap_or(Decimal::ZERO);
        if qty <= Decimal::ZERO {
            rows.push(vec![
                "non_positive_lot".into(),
                format!("lot #{} on '{}': {}", id, name, qty_s),
            ]);
        }
    }

    // 3) Lots hanging off non-gold accounts
    let mut stmt2 = conn.prepare(
        "SELECT DISTINCT a.name FROM gold_lots g JOIN accounts a ON g.account_id=a.id
         WHERE a.type != 'gold'",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let name: String = r.get(0)?;
        rows.push(vec!["lots_on_non_gold_account".into(), name]);
    }

    // 4) Postings recorded against derived-balance accounts
    let mut stmt3 = conn.prepare(
        "SELECT DISTINCT a.name FROM transactions t JOIN accounts a ON t.account_id=a.id
         WHERE a.type = 'gold'",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let name: String = r.get(0)?;
        rows.push(vec!["posting_on_derived_balance".into(), name]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
