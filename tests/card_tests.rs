// Copyright (c) 2025 Soumyadip Sarkar.
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
        Some(("card", sub)) => commands::card::handle(conn, sub),
        Some(("tx", sub)) => commands::transactions::handle(conn, sub),
        other => panic!("unexpected command {:?}", other.map(|(n, _)| n)),
    }
}

fn setup_card_and_wallet(conn: &mut Connection) {
    run(
        conn,
        &[
            "paraclip", "account", "add", "--name", "Visa", "--type", "credit", "--limit",
            "5000", "--debt", "2000",
        ],
    )
    .unwrap();
    run(
        conn,
        &[
            "paraclip", "account", "add", "--name", "Wallet", "--type", "cash", "--balance",
            "1000",
        ],
    )
    .unwrap();
}

fn debt(conn: &Connection, name: &str) -> Decimal {
    let s: String = conn
        .query_row(
            "SELECT current_debt FROM accounts WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .unwrap();
    Decimal::from_str(&s).unwrap()
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

fn tx_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn payment_moves_debt_and_source_balance_atomically() {
    let mut conn = setup();
    setup_card_and_wallet(&mut conn);

    // limit 5000, debt 2000: minimum payment is 400
    run(
        &mut conn,
        &[
            "paraclip", "card", "pay", "--card", "Visa", "--from", "Wallet", "--amount", "400",
        ],
    )
    .unwrap();

    assert_eq!(debt(&conn, "Visa"), Decimal::from_str("1600").unwrap());
    assert_eq!(balance(&conn, "Wallet"), Decimal::from_str("600").unwrap());
    // Stored card balance mirrors the debt negatively.
    assert_eq!(balance(&conn, "Visa"), Decimal::from_str("-1600").unwrap());

    let (kind, amount, category): (String, String, String) = conn
        .query_row(
            "SELECT t.kind, t.amount, t.category FROM transactions t
             JOIN accounts a ON t.account_id=a.id WHERE a.name='Wallet'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(kind, "expense");
    assert_eq!(Decimal::from_str(&amount).unwrap(), Decimal::from(400u32));
    assert_eq!(category, "Credit Card Payment");
    assert_eq!(tx_count(&conn), 1);
}

#[test]
fn min_flag_pays_the_minimum_payment() {
    let mut conn = setup();
    setup_card_and_wallet(&mut conn);

    run(
        &mut conn,
        &["paraclip", "card", "pay", "--card", "Visa", "--from", "Wallet", "--min"],
    )
    .unwrap();

    assert_eq!(debt(&conn, "Visa"), Decimal::from_str("1600").unwrap());
    assert_eq!(balance(&conn, "Wallet"), Decimal::from_str("600").unwrap());
}

#[test]
fn full_flag_clears_the_debt_exactly() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Visa", "--type", "credit", "--limit",
            "5000", "--debt", "800",
        ],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "paraclip", "account", "add", "--name", "Wallet", "--type", "cash", "--balance",
            "1000",
        ],
    )
    .unwrap();

    run(
        &mut conn,
        &["paraclip", "card", "pay", "--card", "Visa", "--from", "Wallet", "--full"],
    )
    .unwrap();

    assert_eq!(debt(&conn, "Visa"), Decimal::ZERO);
    assert_eq!(balance(&conn, "Wallet"), Decimal::from_str("200").unwrap());
}

#[test]
fn overpayment_is_rejected_without_side_effects() {
    let mut conn = setup();
    setup_card_and_wallet(&mut conn);

    let err = run(
        &mut conn,
        &[
            "paraclip", "card", "pay", "--card", "Visa", "--from", "Wallet", "--amount", "2500",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Overpayment rejected"));

    assert_eq!(debt(&conn, "Visa"), Decimal::from_str("2000").unwrap());
    assert_eq!(balance(&conn, "Wallet"), Decimal::from_str("1000").unwrap());
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn payment_beyond_source_balance_is_rejected() {
    let mut conn = setup();
    setup_card_and_wallet(&mut conn);

    let err = run(
        &mut conn,
        &[
            "paraclip", "card", "pay", "--card", "Visa", "--from", "Wallet", "--amount", "1200",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Insufficient funds"));

    assert_eq!(debt(&conn, "Visa"), Decimal::from_str("2000").unwrap());
    assert_eq!(balance(&conn, "Wallet"), Decimal::from_str("1000").unwrap());
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn purchase_adds_debt_and_records_expense() {
    let mut conn = setup();
    setup_card_and_wallet(&mut conn);

    run(
        &mut conn,
        &[
            "paraclip", "card", "purchase", "--card", "Visa", "--amount", "750", "--category",
            "Groceries",
        ],
    )
    .unwrap();

    assert_eq!(debt(&conn, "Visa"), Decimal::from_str("2750").unwrap());
    let (kind, amount): (String, String) = conn
        .query_row(
            "SELECT t.kind, t.amount FROM transactions t
             JOIN accounts a ON t.account_id=a.id WHERE a.name='Visa'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(kind, "expense");
    assert_eq!(Decimal::from_str(&amount).unwrap(), Decimal::from(750u32));
}

#[test]
fn purchase_past_the_limit_is_rejected_without_mutation() {
    let mut conn = setup();
    setup_card_and_wallet(&mut conn);

    // available limit is 3000
    let err = run(
        &mut conn,
        &["paraclip", "card", "purchase", "--card", "Visa", "--amount", "3500"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Limit exceeded"));

    assert_eq!(debt(&conn, "Visa"), Decimal::from_str("2000").unwrap());
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn paying_from_a_card_or_gold_account_is_rejected() {
    let mut conn = setup();
    setup_card_and_wallet(&mut conn);
    run(
        &mut conn,
        &["paraclip", "account", "add", "--name", "Kasa", "--type", "gold"],
    )
    .unwrap();

    let err = run(
        &mut conn,
        &[
            "paraclip", "card", "pay", "--card", "Visa", "--from", "Kasa", "--amount", "100",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("cannot fund a payment"));
    assert_eq!(tx_count(&conn), 0);
}
