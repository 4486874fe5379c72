// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use paraclip::{cli, commands, db};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
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
        Some(("tx", sub)) => commands::transactions::handle(conn, sub),
        other => panic!("unexpected command {:?}", other.map(|(n, _)| n)),
    }
}

fn balance(conn: &Connection, name: &str) -> Decimal {
    let s: String = conn
        .query_row(
            "SELECT balance FROM accounts WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .unwrap();
    Decimal::from_str(&s).unwrap()
}

#[test]
fn postings_move_the_balance_both_ways() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Wallet", "--type", "cash", "--balance",
            "100",
        ],
    )
    .unwrap();

    run(
        &mut conn,
        &[
            "paraclip", "tx", "add", "--date", "2025-08-01", "--account", "Wallet", "--kind",
            "income", "--amount", "40.50", "--category", "Salary",
        ],
    )
    .unwrap();
    assert_eq!(balance(&conn, "Wallet"), Decimal::from_str("140.50").unwrap());

    run(
        &mut conn,
        &[
            "paraclip", "tx", "add", "--date", "2025-08-02", "--account", "Wallet", "--kind",
            "expense", "--amount", "90",
        ],
    )
    .unwrap();
    assert_eq!(balance(&conn, "Wallet"), Decimal::from_str("50.50").unwrap());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn zero_amount_posting_is_rejected_entirely() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Wallet", "--type", "cash", "--balance",
            "100",
        ],
    )
    .unwrap();

    let err = run(
        &mut conn,
        &[
            "paraclip", "tx", "add", "--date", "2025-08-01", "--account", "Wallet", "--kind",
            "expense", "--amount", "0",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("must be positive"));

    assert_eq!(balance(&conn, "Wallet"), Decimal::from(100u32));
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn derived_balance_accounts_reject_direct_postings() {
    let mut conn = setup();
    run(
        &mut conn,
        &["paraclip", "account", "add", "--name", "Kasa", "--type", "gold"],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Visa", "--type", "credit", "--limit",
            "5000",
        ],
    )
    .unwrap();

    for name in ["Kasa", "Visa"] {
        let err = run(
            &mut conn,
            &[
                "paraclip", "tx", "add", "--date", "2025-08-01", "--account", name, "--kind",
                "income", "--amount", "10",
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("balance is derived"));
    }
}

#[test]
fn unknown_account_is_reported_by_name() {
    let mut conn = setup();
    let err = run(
        &mut conn,
        &[
            "paraclip", "tx", "add", "--date", "2025-08-01", "--account", "Ghost", "--kind",
            "income", "--amount", "10",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Account 'Ghost' not found"));
}
