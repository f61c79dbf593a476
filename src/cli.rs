// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

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

fn req(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

pub fn build_cli() -> Command {
    Command::new("centavo")
        .version(crate_version!())
        .about("Personal finance tracker: installment plans, monthly balances, savings jars")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("income")
                .about("Income entries")
                .subcommand(
                    Command::new("add")
                        .about("Record an income entry")
                        .arg(req("month", "Month YYYY-MM"))
                        .arg(req("amount", "Amount"))
                        .arg(req("source", "Where the money came from"))
                        .arg(opt("date", "Date YYYY-MM-DD (default: today)")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List income entries")
                        .arg(opt("month", "Filter by month YYYY-MM")),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an income entry")
                        .arg(req("id", "Income id")),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Expense entries")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense entry")
                        .arg(req("month", "Month YYYY-MM"))
                        .arg(req("amount", "Amount (per installment when --installments is used)"))
                        .arg(req("reason", "What the expense is for"))
                        .arg(req("category", "card, fixed, variable or other"))
                        .arg(opt("card", "Card name (category card)"))
                        .arg(opt("date", "Date YYYY-MM-DD (default: today)"))
                        .arg(opt("status", "open or paid (default: open)"))
                        .arg(
                            opt("months", "Repeat a fixed expense for N consecutive months")
                                .value_parser(clap::value_parser!(u32)),
                        )
                        .arg(
                            opt("installments", "Split a card expense into N installments")
                                .value_parser(clap::value_parser!(u32)),
                        )
                        .arg(
                            opt("current", "Installment the purchase is currently on (default 1)")
                                .value_parser(clap::value_parser!(u32)),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List expense entries")
                        .arg(opt("month", "Filter by month YYYY-MM"))
                        .arg(opt("category", "Filter by category")),
                ))
                .subcommand(
                    Command::new("pay")
                        .about("Mark an expense as paid")
                        .arg(req("id", "Expense id")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit an expense entry")
                        .arg(req("id", "Expense id"))
                        .arg(opt("month", "New month YYYY-MM"))
                        .arg(opt("amount", "New amount"))
                        .arg(opt("reason", "New reason"))
                        .arg(opt("category", "New category"))
                        .arg(opt("date", "New date YYYY-MM-DD"))
                        .arg(opt("status", "open or paid")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an expense entry")
                        .arg(req("id", "Expense id")),
                ),
        )
        .subcommand(
            Command::new("card")
                .about("Credit cards")
                .subcommand(
                    Command::new("add")
                        .about("Register a card")
                        .arg(req("name", "Card name"))
                        .arg(req("network", "Card network"))
                        .arg(req("limit", "Credit limit"))
                        .arg(
                            req("closing-day", "Statement closing day (1-31)")
                                .value_parser(clap::value_parser!(u8).range(1..=31)),
                        )
                        .arg(
                            req("due-day", "Payment due day (1-31)")
                                .value_parser(clap::value_parser!(u8).range(1..=31)),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List cards")))
                .subcommand(
                    Command::new("edit")
                        .about("Edit a card")
                        .arg(req("id", "Card id"))
                        .arg(opt("name", "New name"))
                        .arg(opt("network", "New network"))
                        .arg(opt("limit", "New credit limit"))
                        .arg(
                            opt("closing-day", "New closing day")
                                .value_parser(clap::value_parser!(u8).range(1..=31)),
                        )
                        .arg(
                            opt("due-day", "New due day")
                                .value_parser(clap::value_parser!(u8).range(1..=31)),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a card (its expenses stay)")
                        .arg(req("id", "Card id")),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Installment plans")
                .subcommand(
                    Command::new("add")
                        .about("Register a plan and schedule its installments")
                        .arg(req("card", "Card name"))
                        .arg(req("description", "What was purchased"))
                        .arg(req("total", "Total purchase amount"))
                        .arg(
                            req("installments", "Number of installments")
                                .value_parser(clap::value_parser!(u32)),
                        )
                        .arg(
                            opt("current", "Installment the purchase is currently on (default 1)")
                                .value_parser(clap::value_parser!(u32)),
                        )
                        .arg(req("start", "Month of installment #1, YYYY-MM")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List plans")
                        .arg(opt("card", "Filter by card name")),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a plan (its expenses stay)")
                        .arg(req("id", "Plan id")),
                ),
        )
        .subcommand(
            Command::new("jar")
                .about("Savings jars")
                .subcommand(
                    Command::new("add")
                        .about("Create a jar, optionally with an initial deposit")
                        .arg(req("name", "Jar name"))
                        .arg(opt("description", "What the jar is for"))
                        .arg(opt("deposit", "Initial deposit amount"))
                        .arg(opt("month", "Month the deposit comes out of (default: current)")),
                )
                .subcommand(json_flags(Command::new("list").about("List jars")))
                .subcommand(
                    Command::new("deposit")
                        .about("Move money from a month's balance into a jar")
                        .arg(req("id", "Jar id"))
                        .arg(req("amount", "Amount"))
                        .arg(req("month", "Month the money comes out of")),
                )
                .subcommand(
                    Command::new("withdraw")
                        .about("Move money from a jar back into a month's income")
                        .arg(req("id", "Jar id"))
                        .arg(req("amount", "Amount"))
                        .arg(req("month", "Month the money goes into")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a jar")
                        .arg(req("id", "Jar id")),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import from CSV")
                .subcommand(
                    Command::new("statement")
                        .about("Import a card statement, detecting installment series")
                        .arg(req("path", "CSV file: date,description,amount[,installment]"))
                        .arg(req("card", "Card the statement belongs to"))
                        .arg(opt("month", "Invoice month YYYY-MM (default: inferred)")),
                )
                .subcommand(
                    Command::new("incomes")
                        .about("Bulk-import income entries")
                        .arg(req("path", "CSV file: month,amount,source[,date]")),
                )
                .subcommand(
                    Command::new("expenses")
                        .about("Bulk-import expense entries")
                        .arg(req("path", "CSV file: month,amount,reason,category[,status,date]")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export to CSV")
                .subcommand(
                    Command::new("incomes")
                        .about("Export income entries")
                        .arg(req("out", "Output CSV path")),
                )
                .subcommand(
                    Command::new("expenses")
                        .about("Export expense entries")
                        .arg(req("out", "Output CSV path")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Derived views")
                .subcommand(json_flags(
                    Command::new("balance")
                        .about("Monthly balance snapshot")
                        .arg(req("month", "Month YYYY-MM")),
                ))
                .subcommand(json_flags(
                    Command::new("compare")
                        .about("Compare a month against the previous one")
                        .arg(req("month", "Current month YYYY-MM"))
                        .arg(opt("previous", "Previous month (default: the month before)")),
                ))
                .subcommand(json_flags(
                    Command::new("insights")
                        .about("Rule-based insights for a month")
                        .arg(req("month", "Month YYYY-MM")),
                ))
                .subcommand(json_flags(
                    Command::new("months").about("Months with any activity, newest first"),
                )),
        )
        .subcommand(Command::new("doctor").about("Audit stored data for inconsistencies"))
}
