// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, value_parser, Command};

pub fn build_cli() -> Command {
    Command::new("paraclip")
        .about("Personal finance ledger with credit-card and gold-lot accounting")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(arg!(--name <NAME> "Account name").required(true))
                        .arg(
                            arg!(--type <TYPE> "cash|debit|credit|savings|investment|gold")
                                .required(true),
                        )
                        .arg(arg!(--currency <CCY> "Currency code").required(false))
                        .arg(arg!(--balance <AMOUNT> "Opening balance").required(false))
                        .arg(arg!(--limit <AMOUNT> "Credit limit (credit only)").required(false))
                        .arg(arg!(--debt <AMOUNT> "Opening debt (credit only)").required(false))
                        .arg(
                            arg!(--"statement-day" <DAY> "Statement day 1-30 (credit only)")
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            arg!(--"due-day" <DAY> "Payment due day 1-30 (credit only)")
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            arg!(--"interest-rate" <PCT> "Monthly interest override (credit only)")
                                .required(false),
                        )
                        .arg(arg!(--"exclude-from-total" "Hide from the total-balance report")),
                )
                .subcommand(
                    Command::new("list")
                        .about("List accounts")
                        .arg(arg!(--all "Include inactive accounts"))
                        .arg(arg!(--json "Print JSON"))
                        .arg(arg!(--jsonl "Print JSON lines")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit an account")
                        .arg(arg!(--name <NAME> "Account name").required(true))
                        .arg(arg!(--"new-name" <NAME> "Rename the account").required(false))
                        .arg(arg!(--limit <AMOUNT> "New credit limit").required(false))
                        .arg(
                            arg!(--"statement-day" <DAY> "New statement day")
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            arg!(--"due-day" <DAY> "New due day")
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            arg!(--"include-in-total" <BOOL> "true|false")
                                .required(false)
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Deactivate an account (soft delete)")
                        .arg(arg!(--name <NAME> "Account name").required(true))
                        .arg(arg!(--hard "Delete the row and its history")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Post an income or expense")
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today").required(false))
                        .arg(arg!(--account <ACCOUNT> "Account name").required(true))
                        .arg(arg!(--kind <KIND> "income|expense").required(true))
                        .arg(arg!(--amount <AMOUNT> "Positive amount").required(true))
                        .arg(arg!(--category <CATEGORY> "Category label").required(false))
                        .arg(arg!(--note <NOTE> "Free-form description").required(false)),
                )
                .subcommand(
                    Command::new("list")
                        .about("List transactions")
                        .arg(arg!(--month <MONTH> "Filter by YYYY-MM").required(false))
                        .arg(arg!(--account <ACCOUNT> "Filter by account").required(false))
                        .arg(arg!(--kind <KIND> "Filter by income|expense").required(false))
                        .arg(
                            arg!(--limit <N> "Max rows")
                                .required(false)
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(arg!(--json "Print JSON"))
                        .arg(arg!(--jsonl "Print JSON lines")),
                ),
        )
        .subcommand(
            Command::new("card")
                .about("Credit card operations")
                .subcommand(
                    Command::new("status")
                        .about("Show limit, debt, minimum payment and interest estimate")
                        .arg(arg!(--card <CARD> "Card account name").required(true))
                        .arg(arg!(--json "Print JSON")),
                )
                .subcommand(
                    Command::new("purchase")
                        .about("Charge a purchase to a card")
                        .arg(arg!(--card <CARD> "Card account name").required(true))
                        .arg(arg!(--amount <AMOUNT> "Purchase amount").required(true))
                        .arg(arg!(--category <CATEGORY> "Category label").required(false))
                        .arg(arg!(--note <NOTE> "Free-form description").required(false))
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today").required(false)),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Pay card debt from a source account")
                        .arg(arg!(--card <CARD> "Card account name").required(true))
                        .arg(arg!(--from <ACCOUNT> "Source account name").required(true))
                        .arg(arg!(--amount <AMOUNT> "Payment amount").required(false))
                        .arg(arg!(--full "Pay the full current debt"))
                        .arg(arg!(--min "Pay the minimum payment"))
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today").required(false)),
                ),
        )
        .subcommand(
            Command::new("gold")
                .about("Gold holdings")
                .subcommand(
                    Command::new("buy")
                        .about("Record a gold purchase lot")
                        .arg(arg!(--account <ACCOUNT> "Gold account name").required(true))
                        .arg(arg!(--type <TYPE> "gram|quarter|half|full").required(true))
                        .arg(arg!(--quantity <QTY> "Quantity purchased").required(true))
                        .arg(arg!(--price <PRICE> "Unit price paid").required(true))
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today").required(false)),
                )
                .subcommand(
                    Command::new("sell")
                        .about("Sell gold FIFO and credit the proceeds to another account")
                        .arg(arg!(--account <ACCOUNT> "Gold account name").required(true))
                        .arg(arg!(--to <ACCOUNT> "Target account for the proceeds").required(true))
                        .arg(arg!(--type <TYPE> "gram|quarter|half|full").required(true))
                        .arg(arg!(--quantity <QTY> "Quantity to sell").required(true))
                        .arg(arg!(--price <PRICE> "Unit sale price").required(true))
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today").required(false)),
                )
                .subcommand(
                    Command::new("value")
                        .about("Mark-to-market valuation and profit/loss")
                        .arg(arg!(--account <ACCOUNT> "Gold account name").required(true))
                        .arg(arg!(--live "Fetch fresh quotes first"))
                        .arg(arg!(--json "Print JSON")),
                )
                .subcommand(
                    Command::new("lots")
                        .about("List purchase lots")
                        .arg(arg!(--account <ACCOUNT> "Gold account name").required(true)),
                ),
        )
        .subcommand(
            Command::new("price")
                .about("Gold price quotes")
                .subcommand(Command::new("fetch").about("Fetch and store current quotes"))
                .subcommand(Command::new("list").about("List stored quotes")),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(
                    Command::new("balance")
                        .about("Per-account balances and the aggregate total")
                        .arg(arg!(--json "Print JSON"))
                        .arg(arg!(--jsonl "Print JSON lines")),
                )
                .subcommand(
                    Command::new("cashflow")
                        .about("Monthly income vs expense")
                        .arg(
                            arg!(--months <N> "How many months back")
                                .required(false)
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(arg!(--json "Print JSON"))
                        .arg(arg!(--jsonl "Print JSON lines")),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export transactions")
                    .arg(arg!(--format <FMT> "csv|json").required(true))
                    .arg(arg!(--out <PATH> "Output file").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Run ledger integrity checks"))
}
