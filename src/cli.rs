// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_args(cmd: Command) -> Command {
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
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Record id")
}

fn charge_cmd() -> Command {
    Command::new("charge")
        .about("Log and manage charging sessions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Log a charging session")
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                .arg(Arg::new("kwh").long("kwh").required(true).help("Energy added in kWh"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("public")
                        .help("public|public-xp|home|home-xp"),
                )
                .arg(
                    Arg::new("price")
                        .long("price")
                        .help("£ per kWh, defaults to the price set for the type"),
                )
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List charging sessions, newest first")
                .arg(
                    Arg::new("period")
                        .long("period")
                        .action(ArgAction::SetTrue)
                        .help("Only sessions in the active period"),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Replace fields of a charging session")
                .arg(id_arg())
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("kwh").long("kwh"))
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("price").long("price"))
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a charging session")
                .arg(id_arg()),
        )
}

fn cost_cmd() -> Command {
    Command::new("cost")
        .about("Log and manage maintenance and insurance costs")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Log a cost")
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .default_value("Other")
                        .help("e.g. Tyres, Insurance, Service, Fuel"),
                )
                .arg(Arg::new("amount").long("amount").required(true).help("Amount in £"))
                .arg(
                    Arg::new("applies")
                        .long("applies")
                        .default_value("other")
                        .help("ev|ice|both|other"),
                )
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List costs in the active period, newest first")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Ignore the active period"),
                )
                .arg(
                    Arg::new("applies")
                        .long("applies")
                        .help("Only costs tagged ev|ice|both|other"),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Replace fields of a cost")
                .arg(id_arg())
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("applies").long("applies"))
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(Command::new("rm").about("Delete a cost").arg(id_arg()))
}

fn period_cmd() -> Command {
    Command::new("period")
        .about("Active reporting period")
        .subcommand_required(true)
        .subcommand(json_args(Command::new("show").about("Show the active period")))
        .subcommand(
            Command::new("set")
                .about("Choose the active period")
                .arg(
                    Arg::new("mode")
                        .required(true)
                        .help("this-month|last-month|last-30|custom|all-time"),
                )
                .arg(Arg::new("from").long("from").help("Custom start, YYYY-MM-DD"))
                .arg(Arg::new("to").long("to").help("Custom end, YYYY-MM-DD")),
        )
        .subcommand(Command::new("reset").about("Back to this month"))
}

fn settings_cmd() -> Command {
    Command::new("settings")
        .about("Prices, efficiencies and comparison options")
        .subcommand_required(true)
        .subcommand(json_args(Command::new("show").about("Show all settings")))
        .subcommand(
            Command::new("set")
                .about("Change one setting")
                .arg(Arg::new("key").required(true).help(
                    "public|public_xp|home|home_xp|charger-hardware|charger-install|\
                     ev-miles-per-kwh|ice-mpg|both-allocation|compare-mode|legacy-applies",
                ))
                .arg(Arg::new("value").required(true)),
        )
        .subcommand(
            Command::new("fuel-price")
                .about("Record the ICE fuel price per litre from a date")
                .arg(Arg::new("per_litre").required(true).help("£ per litre"))
                .arg(Arg::new("from").long("from").help("YYYY-MM-DD, defaults to today")),
        )
        .subcommand(json_args(
            Command::new("fuel-history").about("Show the fuel price history"),
        ))
        .subcommand(
            Command::new("reset-compare")
                .about("Restore default efficiencies and allocation, record the default fuel price"),
        )
}

fn compare_cmd() -> Command {
    Command::new("compare")
        .about("EV vs ICE cost comparison")
        .subcommand_required(true)
        .subcommand(json_args(
            Command::new("totals").about("Totals for the active period"),
        ))
        .subcommand(json_args(
            Command::new("session")
                .about("Compare one charging session against petrol")
                .arg(Arg::new("kwh").long("kwh").required(true))
                .arg(Arg::new("price").long("price").required(true).help("£ per kWh")),
        ))
        .subcommand(json_args(
            Command::new("trip")
                .about("Compare a trip of a given length")
                .arg(Arg::new("miles").long("miles").required(true))
                .arg(Arg::new("price").long("price").required(true).help("£ per kWh")),
        ))
}

fn chart_cmd() -> Command {
    Command::new("chart")
        .about("Cost series over all records")
        .subcommand_required(true)
        .subcommand(json_args(
            Command::new("cumulative").about("Running EV and ICE totals per event"),
        ))
        .subcommand(json_args(
            Command::new("monthly").about("EV and ICE totals per month"),
        ))
}

fn export_cmd() -> Command {
    let out = || Arg::new("out").long("out").required(true);
    let format = || {
        Arg::new("format")
            .long("format")
            .default_value("csv")
            .help("csv|json")
    };
    Command::new("export")
        .about("Export records to a file")
        .subcommand_required(true)
        .subcommand(
            Command::new("entries")
                .about("Export charging sessions")
                .arg(format())
                .arg(out()),
        )
        .subcommand(
            Command::new("costs")
                .about("Export costs")
                .arg(format())
                .arg(out()),
        )
}

fn backup_cmd() -> Command {
    Command::new("backup")
        .about("Full JSON backup and restore")
        .subcommand_required(true)
        .subcommand(
            Command::new("export")
                .about("Write everything to a JSON file")
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Replace everything with a JSON backup")
                .arg(Arg::new("file").long("file").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("evlog")
        .version(crate_version!())
        .about("Track EV charging and running costs against a petrol car")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("EVLOG_DB")
                .help("Path to the SQLite database"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(charge_cmd())
        .subcommand(cost_cmd())
        .subcommand(period_cmd())
        .subcommand(settings_cmd())
        .subcommand(json_args(
            Command::new("summary").about("Charging summary for this month, last month and on average"),
        ))
        .subcommand(compare_cmd())
        .subcommand(chart_cmd())
        .subcommand(export_cmd())
        .subcommand(backup_cmd())
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
