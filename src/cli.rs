// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{DB_ENV, USER_ENV};
use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .required(required)
        .help("Month as YYYY-MM (defaults to the current month)")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn months_arg(default: &'static str) -> Arg {
    Arg::new("months")
        .long("months")
        .value_parser(value_parser!(u32).range(1..=600))
        .default_value(default)
}

pub fn build_cli() -> Command {
    Command::new("finpulse")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Personal finance summaries, savings growth, projections and alerts")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env(DB_ENV)
                .help("Path to the SQLite database"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .env(USER_ENV)
                .help("User whose records are read and written"),
        )
        .arg(
            Arg::new("as-of")
                .long("as-of")
                .global(true)
                .help("Reference date YYYY-MM-DD used as 'now' (defaults to today)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging (RUST_LOG takes precedence)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("config")
                .about("Local settings")
                .subcommand(
                    Command::new("set-user")
                        .about("Default user for later commands")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("show").about("Show resolved settings")),
        )
        .subcommand(
            Command::new("income")
                .about("Real and estimated income")
                .subcommand(
                    Command::new("add")
                        .arg(month_arg(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("estimated")
                                .long("estimated")
                                .action(ArgAction::SetTrue)
                                .help("Forecast, not yet received"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").arg(month_arg(false))))
                .subcommand(
                    Command::new("convert")
                        .about("Confirm an estimated income with the amount received")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("expense")
                .about("Dated expenses")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("fixed").long("fixed").action(ArgAction::SetTrue)),
                )
                .subcommand(json_flags(Command::new("list").arg(month_arg(false))))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("category")
                .about("Expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["fixed", "variable", "investment", "debt"])
                                .default_value("variable"),
                        )
                        .arg(Arg::new("color").long("color"))
                        .arg(Arg::new("icon").long("icon")),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("debt")
                .about("Installment debts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("total").long("total").required(true))
                        .arg(Arg::new("installment").long("installment").required(true))
                        .arg(
                            Arg::new("installments")
                                .long("installments")
                                .required(true)
                                .value_parser(value_parser!(u32).range(1..)),
                        )
                        .arg(
                            Arg::new("remaining")
                                .long("remaining")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("start").long("start").required(true)),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("pay")
                        .about("Record one installment")
                        .arg(id_arg()),
                )
                .subcommand(
                    Command::new("settle")
                        .about("Mark the debt as fully paid")
                        .arg(id_arg()),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("savings")
                .about("Savings accounts and compound growth")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").default_value("0"))
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .required(true)
                                .help("Annual yield in percent, 12 = 12%"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rate")
                        .about("Change an account's annual yield")
                        .arg(id_arg())
                        .arg(Arg::new("rate").long("rate").required(true)),
                )
                .subcommand(
                    Command::new("deposit")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("withdraw")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(json_flags(Command::new("history").arg(id_arg())))
                .subcommand(json_flags(
                    Command::new("project")
                        .about("Grow an account's balance with no further deposits")
                        .arg(id_arg())
                        .arg(months_arg("12")),
                ))
                .subcommand(json_flags(
                    Command::new("grow")
                        .about("Compound growth simulation")
                        .arg(Arg::new("initial").long("initial").required(true))
                        .arg(Arg::new("deposit").long("deposit").default_value("0"))
                        .arg(Arg::new("rate").long("rate").required(true))
                        .arg(months_arg("12")),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries, projections and alerts")
                .subcommand(json_flags(Command::new("summary").arg(month_arg(false))))
                .subcommand(json_flags(Command::new("categories").arg(month_arg(false))))
                .subcommand(json_flags(
                    Command::new("projection")
                        .arg(months_arg("6"))
                        .arg(
                            Arg::new("only")
                                .long("only")
                                .value_parser(["negative", "tight"]),
                        ),
                ))
                .subcommand(json_flags(Command::new("history")))
                .subcommand(json_flags(Command::new("alerts").arg(month_arg(false))))
                .subcommand(json_flags(Command::new("freedom").arg(month_arg(false))))
                .subcommand(json_flags(
                    Command::new("simulate")
                        .about("What if one more expense lands this month")
                        .arg(month_arg(false))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Write reports to files")
                .subcommand(
                    Command::new("history")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("expenses")
                        .arg(month_arg(false))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}
