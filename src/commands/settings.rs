// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::db;
use crate::engine::fuel::{record_price, reset_compare};
use crate::models::{ChargeType, Settings};
use crate::utils::{
    fmt_money, fmt_num, json_flags, maybe_print_json, parse_date, parse_efficiency,
    parse_non_negative, parse_positive, pretty_table, required, today,
};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("fuel-price", sub)) => fuel_price(conn, sub)?,
        Some(("fuel-history", sub)) => fuel_history(conn, sub)?,
        Some(("reset-compare", _)) => {
            let mut settings = db::load_settings(conn)?;
            reset_compare(&mut settings, today());
            db::save_settings(conn, &settings)?;
            tracing::info!("compare settings reset");
            println!(
                "Compare settings reset: {} mi/kWh, {} mpg, {}/L, split",
                settings.ev_miles_per_kwh,
                settings.ice_mpg,
                fmt_money(&settings.ice_per_litre)
            );
        }
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let s = db::load_settings(conn)?;
    if maybe_print_json(json_flag, jsonl_flag, &s)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = ChargeType::ALL
        .iter()
        .map(|t| vec![format!("price {}", t), fmt_num(&s.default_price(*t), 2)])
        .collect();
    rows.extend([
        vec!["charger-hardware".into(), fmt_money(&s.charger_hardware)],
        vec!["charger-install".into(), fmt_money(&s.charger_install)],
        vec!["ev-miles-per-kwh".into(), s.ev_miles_per_kwh.to_string()],
        vec!["ice-mpg".into(), s.ice_mpg.to_string()],
        vec!["ice-per-litre".into(), fmt_num(&s.ice_per_litre, 3)],
        vec!["both-allocation".into(), s.both_allocation_mode.to_string()],
        vec!["compare-mode".into(), s.compare_mode.to_string()],
        vec!["legacy-applies".into(), s.legacy_applies_default.to_string()],
    ]);
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

/// Applies one `key value` pair. Prices and setup costs may be zero,
/// efficiencies must be positive.
pub fn apply(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    let key = key.trim().to_lowercase().replace('_', "-");
    match key.as_str() {
        "public" | "public-xp" | "home" | "home-xp" => {
            let t: ChargeType = key.parse()?;
            settings.set_default_price(t, parse_non_negative("price", value)?);
        }
        "charger-hardware" => settings.charger_hardware = parse_non_negative("charger-hardware", value)?,
        "charger-install" => settings.charger_install = parse_non_negative("charger-install", value)?,
        "ev-miles-per-kwh" => settings.ev_miles_per_kwh = parse_efficiency("ev-miles-per-kwh", value)?,
        "ice-mpg" => settings.ice_mpg = parse_efficiency("ice-mpg", value)?,
        "both-allocation" => settings.both_allocation_mode = value.parse()?,
        "compare-mode" => settings.compare_mode = value.parse()?,
        "legacy-applies" => settings.legacy_applies_default = value.parse()?,
        "ice-per-litre" => bail!("Use `settings fuel-price` to record a fuel price"),
        _ => bail!("Unknown setting '{}'", key),
    }
    Ok(())
}

fn set(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = required(sub, "key")?;
    let value = required(sub, "value")?;
    let mut settings = db::load_settings(conn)?;
    apply(&mut settings, key, value)?;
    db::save_settings(conn, &settings)?;
    tracing::info!(key, value, "setting changed");
    println!("Set {} = {}", key, value);
    Ok(())
}

fn fuel_price(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let per_litre = parse_positive("per_litre", required(sub, "per_litre")?)?;
    let from = match sub.get_one::<String>("from") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let mut settings = db::load_settings(conn)?;
    record_price(&mut settings, from, per_litre);
    db::save_settings(conn, &settings)?;
    tracing::info!(%from, %per_litre, "fuel price recorded");
    println!(
        "Fuel price £{}/L from {} (current £{}/L)",
        fmt_num(&per_litre, 3),
        from,
        fmt_num(&settings.ice_per_litre, 3)
    );
    Ok(())
}

fn fuel_history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let settings = db::load_settings(conn)?;
    let history = &settings.ice_per_litre_history;
    if maybe_print_json(json_flag, jsonl_flag, history)? {
        return Ok(());
    }
    if history.is_empty() {
        println!(
            "No fuel price history; using £{}/L",
            fmt_num(&settings.ice_per_litre, 3)
        );
        return Ok(());
    }
    let rows: Vec<Vec<String>> = history
        .iter()
        .map(|r| vec![r.from.to_string(), fmt_num(&r.per_litre, 3)])
        .collect();
    println!("{}", pretty_table(&["From", "£/L"], rows));
    Ok(())
}
