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
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Do not ask for confirmation")
}

pub fn build_cli() -> Command {
    Command::new("smartbudget")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track income and expenses, see where the money goes")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("More log output (repeat for more)"),
        )
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("tx")
                .about("Add, list and remove transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .default_value("Gıda")
                                .help("Built-in label or English name (Food, Transport, ...), or any text"),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .help("income|expense"),
                        )
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a transaction by id")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries derived from all transactions")
                .subcommand(
                    Command::new("summary")
                        .about("Total income, total expense and balance")
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("distribution")
                        .about("Per-category totals and shares for one type")
                        .arg(Arg::new("type").long("type").default_value("expense"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("trend")
                        .about("Income and expense for the last six months")
                        .arg(
                            Arg::new("as_of")
                                .long("as-of")
                                .help("Reference date YYYY-MM-DD, defaults to today"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("backup")
                .about("Export or restore all transactions")
                .subcommand(
                    Command::new("export")
                        .about("Write a backup file")
                        .arg(Arg::new("dir").long("dir").help("Directory for the dated backup file"))
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .conflicts_with("dir")
                                .help("Exact output path"),
                        )
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("json")
                                .help("json|csv (csv cannot be restored)"),
                        ),
                )
                .subcommand(
                    Command::new("restore")
                        .about("Replace every transaction with the contents of a backup")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(yes_arg()),
                ),
        )
        .subcommand(
            Command::new("reset")
                .about("Delete all transactions")
                .arg(yes_arg()),
        )
        .subcommand(Command::new("advice").about("Ask the AI assistant for spending advice"))
        .subcommand(
            Command::new("receipt")
                .about("Read a receipt photo with the AI assistant and record it")
                .arg(Arg::new("image").long("image").required(true))
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Show what was read without recording it"),
                )
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(
                    Command::new("unset").arg(Arg::new("key").long("key").required(true)),
                ),
        )
}
