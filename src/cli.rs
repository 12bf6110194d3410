// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    ]
}

fn order_arg() -> Arg {
    Arg::new("order")
        .long("order")
        .value_parser(["asc", "desc"])
        .help("Sort direction (defaults per sort key)")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

/// Filters shared by `tx list` and `export transactions`.
fn tx_filter_args() -> Vec<Arg> {
    vec![
        Arg::new("search")
            .long("search")
            .help("Match description, notes or tags"),
        Arg::new("category").long("category"),
        Arg::new("account").long("account").help("Account key, e.g. checking"),
        Arg::new("type").long("type").help("income|expense|transfer"),
        Arg::new("range")
            .long("range")
            .help("all|today|week|month|quarter|year")
            .conflicts_with_all(["from", "to"]),
        Arg::new("from").long("from").help("Start date YYYY-MM-DD"),
        Arg::new("to").long("to").help("End date YYYY-MM-DD"),
        Arg::new("min").long("min").help("Minimum absolute amount"),
        Arg::new("max").long("max").help("Maximum absolute amount"),
    ]
}

/// Fields of the transaction form. `required` is false for edits.
fn tx_form_args(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("date").long("date").help("YYYY-MM-DD (default today)"),
        Arg::new("description").long("description").required(required),
        Arg::new("amount").long("amount").required(required),
        Arg::new("category").long("category").required(required),
        Arg::new("account").long("account").required(required),
        Arg::new("type").long("type").required(required),
        Arg::new("notes").long("notes"),
        Arg::new("tags").long("tags").help("Comma separated"),
        Arg::new("recurring")
            .long("recurring")
            .help("weekly|monthly|quarterly|yearly"),
    ]
}

fn budget_form_args(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("category").long("category").required(required),
        Arg::new("allocated").long("allocated").required(required),
        Arg::new("spent").long("spent"),
        Arg::new("period")
            .long("period")
            .help("weekly|monthly|quarterly|yearly"),
        Arg::new("alert").long("alert").help("Alert threshold percent"),
    ]
}

fn goal_form_args(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("name").long("name").required(required),
        Arg::new("description").long("description"),
        Arg::new("type").long("type").required(required),
        Arg::new("target").long("target").required(required),
        Arg::new("current").long("current"),
        Arg::new("deadline")
            .long("deadline")
            .required(required)
            .help("Target date YYYY-MM-DD"),
        Arg::new("monthly")
            .long("monthly")
            .help("Monthly auto-contribution"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("financeflow")
        .about("Personal finance ledger: transactions, budgets and savings goals")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINANCEFLOW_DB")
                .help("Database file (defaults to the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("list")
                        .args(tx_filter_args())
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .help("date|amount|description|category|account"),
                        )
                        .arg(order_arg())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(Command::new("add").args(tx_form_args(true)))
                .subcommand(Command::new("edit").arg(id_arg()).args(tx_form_args(false)))
                .subcommand(
                    Command::new("rm")
                        .about("Delete one or more transactions")
                        .arg(
                            Arg::new("ids")
                                .required(true)
                                .num_args(1..)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("stats")
                        .about("Income, expenses and net for the current month")
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Budgets")
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("search").long("search"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .help("on-track|warning|exceeded"),
                        )
                        .arg(Arg::new("period").long("period"))
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .help("name|allocated|spent|remaining|progress"),
                        )
                        .arg(order_arg())
                        .args(json_args()),
                )
                .subcommand(Command::new("add").args(budget_form_args(true)))
                .subcommand(Command::new("edit").arg(id_arg()).args(budget_form_args(false)))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("summary").args(json_args()))
                .subcommand(Command::new("templates").args(json_args()))
                .subcommand(
                    Command::new("apply-template")
                        .arg(Arg::new("template").required(true).help("Template id or name"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .help("Monthly income (default from config)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("search").long("search"))
                        .arg(Arg::new("status").long("status").help("active|completed"))
                        .arg(Arg::new("type").long("type"))
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .help("priority|progress|amount|deadline|remaining|name"),
                        )
                        .arg(order_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("add")
                        .args(goal_form_args(true))
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .args(goal_form_args(false))
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(
                    Command::new("contribute")
                        .arg(id_arg())
                        .arg(Arg::new("amount").required(true))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("automatic")
                                .long("automatic")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("summary").args(json_args())),
        )
        .subcommand(
            Command::new("guide")
                .about("Interactive guide progress")
                .subcommand(Command::new("status").args(json_args()))
                .subcommand(Command::new("complete").arg(Arg::new("step").required(true)))
                .subcommand(
                    Command::new("note")
                        .arg(Arg::new("step").required(true))
                        .arg(Arg::new("text").required(true)),
                )
                .subcommand(Command::new("reset")),
        )
        .subcommand(
            Command::new("config")
                .about("Thresholds, income and limits")
                .subcommand(Command::new("get").arg(Arg::new("key")).args(json_args()))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .args(tx_filter_args())
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions").arg(Arg::new("path").required(true)),
            ),
        )
}
