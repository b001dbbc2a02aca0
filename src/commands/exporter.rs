// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::db;
use crate::utils::required;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("entries", sub)) => export_entries(conn, sub),
        Some(("costs", sub)) => export_costs(conn, sub),
        _ => Ok(()),
    }
}

fn format_of(sub: &clap::ArgMatches) -> Result<String> {
    let fmt = required(sub, "format")?.to_lowercase();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    Ok(fmt)
}

fn export_entries(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = format_of(sub)?;
    let out = required(sub, "out")?;

    let mut entries = db::load_entries(conn)?;
    entries.sort_by(|a, b| a.date.cmp(&b.date));

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["Date", "kWh", "Type", "Price_per_kWh", "Cost", "Note"])?;
        for e in &entries {
            wtr.write_record([
                e.date.clone(),
                e.kwh.normalize().to_string(),
                e.charge_type.to_string(),
                e.price.normalize().to_string(),
                e.cost().normalize().to_string(),
                e.note.clone(),
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&entries)?)?;
    }
    tracing::info!(out, count = entries.len(), "entries exported");
    println!("Exported {} charging sessions to {}", entries.len(), out);
    Ok(())
}

fn export_costs(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = format_of(sub)?;
    let out = required(sub, "out")?;

    let mut costs = db::load_costs(conn)?;
    costs.sort_by(|a, b| a.date.cmp(&b.date));

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["Date", "Category", "Amount", "Note", "AppliesTo"])?;
        for c in &costs {
            wtr.write_record([
                c.date.clone(),
                c.category.clone(),
                c.amount.normalize().to_string(),
                c.note.clone(),
                c.applies.to_string(),
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&costs)?)?;
    }
    tracing::info!(out, count = costs.len(), "costs exported");
    println!("Exported {} costs to {}", costs.len(), out);
    Ok(())
}
