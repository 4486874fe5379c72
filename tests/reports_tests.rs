// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use paraclip::commands::prices::{self, Quote};
use paraclip::ledger::balance::total_balance;
use paraclip::models::GoldType;
use paraclip::{cli, commands, db, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("account", sub)) => commands::accounts::handle(conn, sub),
        Some(("gold", sub)) => commands::gold::handle(conn, sub),
        other => panic!("unexpected command {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn total_balance_applies_type_specific_rules() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Wallet", "--type", "cash", "--balance",
            "5000",
        ],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Visa", "--type", "credit", "--limit",
            "10000", "--debt", "1500",
        ],
    )
    .unwrap();
    // Opted out of the total.
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Rainy", "--type", "savings", "--balance",
            "200", "--exclude-from-total",
        ],
    )
    .unwrap();
    run(
        &mut conn,
        &["paraclip", "account", "add", "--name", "Kasa", "--type", "gold"],
    )
    .unwrap();

    prices::store_quotes(
        &conn,
        &[Quote {
            gold_type: GoldType::Gram,
            price: Decimal::from(4500u32),
            change_percent: Decimal::ZERO,
            as_of: Utc::now(),
            source: prices::FEED_SOURCE,
        }],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "paraclip", "gold", "buy", "--account", "Kasa", "--type", "gram", "--quantity",
            "10", "--price", "4000", "--date", "2025-01-01",
        ],
    )
    .unwrap();

    let accounts = utils::list_accounts(&conn, false).unwrap();
    let mut gold_values = HashMap::new();
    for a in &accounts {
        if a.kind == paraclip::models::AccountType::Gold {
            gold_values.insert(a.id, utils::gold_account_value(&conn, a.id).unwrap());
        }
    }

    // 5000 cash - 1500 credit debt + 45000 gold; savings excluded.
    let total = total_balance(&accounts, &gold_values);
    assert_eq!(total, Decimal::from_str("48500").unwrap());
}

#[test]
fn deactivated_accounts_drop_out_of_the_total() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Wallet", "--type", "cash", "--balance",
            "300",
        ],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Old", "--type", "cash", "--balance",
            "100",
        ],
    )
    .unwrap();
    run(&mut conn, &["paraclip", "account", "rm", "--name", "Old"]).unwrap();

    let accounts = utils::list_accounts(&conn, true).unwrap();
    let total = total_balance(&accounts, &HashMap::new());
    assert_eq!(total, Decimal::from(300u32));

    // Default listings exclude the soft-deleted account too.
    let visible = utils::list_accounts(&conn, false).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Wallet");
}
