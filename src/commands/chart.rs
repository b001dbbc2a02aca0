// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::db;
use crate::engine::series::{cumulative, events, monthly};
use crate::utils::{fmt_money, json_flags, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let Some((name, sub)) = m.subcommand() else {
        return Ok(());
    };
    let (json_flag, jsonl_flag) = json_flags(sub);
    let state = db::load_state(conn)?;
    let evs = events(&state.entries, &state.costs, &state.settings);

    match name {
        "cumulative" => {
            let points = cumulative(&evs);
            if maybe_print_json(json_flag, jsonl_flag, &points)? {
                return Ok(());
            }
            let rows = points
                .iter()
                .map(|p| vec![p.date.to_string(), fmt_money(&p.ev), fmt_money(&p.ice)])
                .collect();
            println!("{}", pretty_table(&["Date", "EV", "ICE"], rows));
        }
        "monthly" => {
            let points = monthly(&evs);
            if maybe_print_json(json_flag, jsonl_flag, &points)? {
                return Ok(());
            }
            let rows = points
                .iter()
                .map(|p| vec![p.month.clone(), fmt_money(&p.ev), fmt_money(&p.ice)])
                .collect();
            println!("{}", pretty_table(&["Month", "EV", "ICE"], rows));
        }
        _ => {}
    }
    Ok(())
}
