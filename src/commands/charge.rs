// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db;
use crate::engine::period::resolve;
use crate::models::{ChargeType, ChargingEntry};
use crate::state::{self, new_id, validate_entry};
use crate::utils::{
    fmt_money, fmt_num, json_flags, maybe_print_json, parse_date, parse_non_negative,
    parse_positive, pretty_table, required, today,
};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = db::load_settings(conn)?;
    let mut entries = db::load_entries(conn)?;

    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let kwh = parse_positive("kwh", required(sub, "kwh")?)?;
    let charge_type: ChargeType = required(sub, "type")?.parse()?;
    let price = match sub.get_one::<String>("price") {
        Some(p) => parse_non_negative("price", p)?,
        None => settings.default_price(charge_type),
    };
    let entry = ChargingEntry {
        id: new_id(),
        date: date.to_string(),
        kwh,
        charge_type,
        price,
        note: sub.get_one::<String>("note").cloned().unwrap_or_default(),
    };
    validate_entry(&entry)?;

    tracing::info!(id = %entry.id, date = %entry.date, %kwh, "charging entry added");
    println!(
        "Logged {} kWh ({}) on {} at £{}/kWh = {} [{}]",
        entry.kwh,
        entry.charge_type,
        entry.date,
        fmt_num(&entry.price, 2),
        fmt_money(&entry.cost()),
        entry.id
    );
    entries.push(entry);
    db::save_entries(conn, &entries)?;
    Ok(())
}

#[derive(Serialize)]
struct EntryRow {
    id: String,
    date: String,
    #[serde(with = "rust_decimal::serde::float")]
    kwh: Decimal,
    #[serde(rename = "type")]
    charge_type: ChargeType,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    cost: Decimal,
    note: String,
}

fn list(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let entries = db::load_entries(conn)?;

    let period = if sub.get_flag("period") {
        Some(resolve(&db::load_ui(conn)?, today()))
    } else {
        None
    };
    let mut selected: Vec<&ChargingEntry> = match &period {
        Some(p) => p.filter(&entries, |e| e.date.as_str()),
        None => entries.iter().collect(),
    };
    selected.sort_by(|a, b| b.date.cmp(&a.date));

    let data: Vec<EntryRow> = selected
        .into_iter()
        .map(|e| EntryRow {
            id: e.id.clone(),
            date: e.date.clone(),
            kwh: e.kwh,
            charge_type: e.charge_type,
            price: e.price,
            cost: e.cost(),
            note: e.note.clone(),
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if let Some(p) = &period {
            println!("{}", p.label);
        }
        if data.is_empty() {
            println!("No charging sessions yet.");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    fmt_num(&r.kwh, 2),
                    r.charge_type.to_string(),
                    fmt_num(&r.price, 2),
                    fmt_money(&r.cost),
                    r.note.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "kWh", "Type", "£/kWh", "Cost", "Note", "Id"], rows)
        );
    }
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let entries = db::load_entries(conn)?;
    let Some(existing) = state::find(&entries, id) else {
        bail!("No charging session with id '{}'", id);
    };

    let mut updated = existing.clone();
    if let Some(s) = sub.get_one::<String>("date") {
        updated.date = parse_date(s)?.to_string();
    }
    if let Some(s) = sub.get_one::<String>("kwh") {
        updated.kwh = parse_positive("kwh", s)?;
    }
    if let Some(s) = sub.get_one::<String>("type") {
        updated.charge_type = s.parse()?;
    }
    if let Some(s) = sub.get_one::<String>("price") {
        updated.price = parse_non_negative("price", s)?;
    }
    if let Some(s) = sub.get_one::<String>("note") {
        updated.note = s.clone();
    }
    validate_entry(&updated)?;

    let Some(next) = state::replace(&entries, updated) else {
        bail!("No charging session with id '{}'", id);
    };
    db::save_entries(conn, &next)?;
    tracing::info!(id, "charging entry updated");
    println!("Updated charging session {}", id);
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let entries = db::load_entries(conn)?;
    let Some(next) = state::remove(&entries, id) else {
        bail!("No charging session with id '{}'", id);
    };
    db::save_entries(conn, &next)?;
    tracing::info!(id, "charging entry deleted");
    println!("Deleted charging session {}", id);
    Ok(())
}
