// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::db;
use crate::engine::period::resolve;
use crate::error::ValidationError;
use crate::models::{PeriodMode, UiState};
use crate::utils::{json_flags, maybe_print_json, parse_date, required, today};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("reset", _)) => {
            db::save_ui(conn, &UiState::default())?;
            tracing::info!("period reset");
            println!("{}", resolve(&UiState::default(), today()).label);
        }
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let period = resolve(&db::load_ui(conn)?, today());
    if !maybe_print_json(json_flag, jsonl_flag, &period)? {
        println!("{}", period.label);
    }
    Ok(())
}

/// Builds the stored preference for `mode`. Custom periods need both bounds;
/// other modes keep the previously stored custom bounds.
pub fn preference(
    current: &UiState,
    mode: PeriodMode,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<UiState, ValidationError> {
    let mut ui = current.clone();
    ui.period_mode = mode;
    if mode == PeriodMode::Custom {
        let (Some(f), Some(t)) = (from, to) else {
            return Err(ValidationError::IncompletePeriod);
        };
        ui.period_from = parse_date(f)?.to_string();
        ui.period_to = parse_date(t)?.to_string();
    }
    Ok(ui)
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mode: PeriodMode = required(sub, "mode")?.parse()?;
    let current = db::load_ui(conn)?;
    let ui = preference(
        &current,
        mode,
        sub.get_one::<String>("from").map(String::as_str),
        sub.get_one::<String>("to").map(String::as_str),
    )?;
    db::save_ui(conn, &ui)?;
    tracing::info!(mode = mode.as_str(), "period set");
    println!("{}", resolve(&ui, today()).label);
    Ok(())
}
