// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("fincontrol")
        .about("FinControl: personal finance tracking, subscriptions, savings goals, and investments")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(category_cmd())
        .subcommand(tx_cmd())
        .subcommand(subscription_cmd())
        .subcommand(goal_cmd())
        .subcommand(investment_cmd())
        .subcommand(dashboard_cmd())
        .subcommand(settings_cmd())
        .subcommand(import_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check the database for inconsistencies"))
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage income/expense categories")
        .subcommand(
            Command::new("add")
                .about("Add a category")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("income|expense"),
                ),
        )
        .subcommand(Command::new("list").about("List categories"))
        .subcommand(
            Command::new("rm")
                .about("Remove a category")
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(Command::new("seed").about("Install the default starter categories"))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and inspect transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                .arg(Arg::new("description").long("description").required(true))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .allow_negative_numbers(true)
                        .help("Positive amount"),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("income|expense"),
                )
                .arg(
                    Arg::new("method")
                        .long("method")
                        .default_value("debit")
                        .help("debit|credit"),
                )
                .arg(Arg::new("category").long("category").help("Category name"))
                .arg(
                    Arg::new("pending")
                        .long("pending")
                        .action(ArgAction::SetTrue)
                        .help("Mark as pending instead of paid"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(Arg::new("type").long("type").help("income|expense"))
                .arg(Arg::new("method").long("method").help("debit|credit"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Edit a transaction")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("description").long("description"))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .allow_negative_numbers(true),
                )
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("method").long("method"))
                .arg(Arg::new("status").long("status").help("paid|pending"))
                .arg(Arg::new("category").long("category").help("Category name, or '-' to clear")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
}

fn subscription_cmd() -> Command {
    Command::new("subscription")
        .about("Manage recurring subscriptions")
        .subcommand(
            Command::new("add")
                .about("Add a subscription")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("day")
                        .long("day")
                        .required(true)
                        .value_parser(value_parser!(u32))
                        .help("Billing day of month (1-31)"),
                )
                .arg(Arg::new("category").long("category").help("Category name")),
        )
        .subcommand(json_flags(Command::new("list").about("List subscriptions")))
        .subcommand(
            Command::new("edit")
                .about("Edit a subscription")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("amount").long("amount"))
                .arg(
                    Arg::new("day")
                        .long("day")
                        .value_parser(value_parser!(u32)),
                )
                .arg(Arg::new("category").long("category").help("Category name, or '-' to clear")),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove a subscription")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("toggle")
                .about("Pause or resume a subscription")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Track savings goals")
        .subcommand(
            Command::new("add")
                .about("Add a savings goal")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(Arg::new("deadline").long("deadline").help("YYYY-MM-DD")),
        )
        .subcommand(json_flags(Command::new("list").about("List goals with progress")))
        .subcommand(
            Command::new("update")
                .about("Set the amount saved so far")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .allow_negative_numbers(true),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove a goal")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
}

fn investment_cmd() -> Command {
    Command::new("investment")
        .about("Manage investment holdings")
        .subcommand(
            Command::new("add")
                .about("Add a holding")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("stock|fixed_income|real_estate_fund|crypto|other"),
                )
                .arg(Arg::new("quantity").long("quantity").required(true))
                .arg(Arg::new("price").long("price").required(true).help("Average purchase price"))
                .arg(Arg::new("symbol").long("symbol").help("Ticker for live quotes")),
        )
        .subcommand(json_flags(Command::new("list").about("List holdings with market values")))
        .subcommand(
            Command::new("edit")
                .about("Edit a holding")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("symbol").long("symbol"))
                .arg(Arg::new("quantity").long("quantity"))
                .arg(Arg::new("price").long("price"))
                .arg(Arg::new("current-price").long("current-price")),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove a holding")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(Command::new("fetch").about("Fetch live quotes for symbol-bearing holdings"))
}

fn dashboard_cmd() -> Command {
    json_flags(
        Command::new("dashboard")
            .about("Aggregated view for a reporting period")
            .arg(
                Arg::new("period")
                    .long("period")
                    .default_value("current_month")
                    .help("current_month|last_month|last_3_months|all"),
            ),
    )
}

fn settings_cmd() -> Command {
    Command::new("settings")
        .about("User settings")
        .subcommand(Command::new("show").about("Show current settings"))
        .subcommand(
            Command::new("set-closing-day")
                .about("Set the credit-card closing day (1-31)")
                .arg(
                    Arg::new("day")
                        .long("day")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                ),
        )
}

fn import_cmd() -> Command {
    Command::new("import")
        .about("Import data from files")
        .subcommand(
            Command::new("transactions")
                .about("Import transactions from CSV (date,description,amount,type,method,category,status)")
                .arg(Arg::new("path").long("path").required(true)),
        )
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export data to files")
        .subcommand(
            Command::new("transactions")
                .about("Export transactions")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}
