// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::db;
use crate::engine::period::resolve;
use crate::engine::totals::{QuickCompare, compare, session, trip};
use crate::models::CompareMode;
use crate::utils::{
    fmt_money, fmt_num, json_flags, maybe_print_json, parse_non_negative, parse_positive,
    pretty_table, required, today,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("totals", sub)) => totals(conn, sub)?,
        Some(("session", sub)) => {
            let kwh = parse_positive("kwh", required(sub, "kwh")?)?;
            let price = parse_non_negative("price", required(sub, "price")?)?;
            let settings = db::load_settings(conn)?;
            print_quick(sub, &session(kwh, price, &settings))?;
        }
        Some(("trip", sub)) => {
            let miles = parse_positive("miles", required(sub, "miles")?)?;
            let price = parse_non_negative("price", required(sub, "price")?)?;
            let settings = db::load_settings(conn)?;
            print_quick(sub, &trip(miles, price, &settings))?;
        }
        _ => {}
    }
    Ok(())
}

fn totals(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let state = db::load_state(conn)?;
    let period = resolve(&state.ui, today());
    let c = compare(&state.entries, &state.costs, &state.settings, &period);
    if maybe_print_json(json_flag, jsonl_flag, &c)? {
        return Ok(());
    }

    println!("{}", c.period.label);
    let e = &c.energy;
    println!(
        "{} sessions, {} kWh, avg £{}/kWh, ~{} miles",
        e.sessions,
        fmt_num(&e.total_kwh, 1),
        fmt_num(&e.avg_price_per_kwh, 3),
        fmt_num(&e.estimated_miles, 0)
    );

    let mut rows = vec![
        vec!["Energy / fuel".to_string(), fmt_money(&e.ev_energy_cost), fmt_money(&c.ice_fuel_cost)],
        vec!["Maintenance".to_string(), fmt_money(&c.ev_maintenance), fmt_money(&c.ice_maintenance)],
        vec!["Insurance".to_string(), fmt_money(&c.ev_insurance), fmt_money(&c.ice_insurance)],
    ];
    if c.compare_mode == CompareMode::Full {
        let ev_fuel = c.ev_total - e.ev_energy_cost - c.ev_maintenance - c.ev_insurance;
        rows.push(vec!["Fuel costs".to_string(), fmt_money(&ev_fuel), String::new()]);
    }
    rows.push(vec!["Total".to_string(), fmt_money(&c.ev_total), fmt_money(&c.ice_total)]);
    rows.push(vec![
        "Equivalent fuel for EV miles".to_string(),
        String::new(),
        fmt_money(&c.ice_equivalent_fuel),
    ]);
    rows.push(vec![
        "Total incl. equivalent fuel".to_string(),
        fmt_money(&c.ev_total),
        fmt_money(&c.ice_total_plus_equivalent_fuel),
    ]);
    println!("{}", pretty_table(&["", "EV", "ICE"], rows));

    if !c.costs.by_category.is_empty() {
        let cat_rows: Vec<Vec<String>> = c
            .costs
            .by_category
            .iter()
            .map(|(k, v)| vec![k.clone(), fmt_money(v)])
            .collect();
        println!("{}", pretty_table(&["Category", "Total"], cat_rows));
    }

    println!(
        "Savings: {} (both-allocation {}, compare-mode {})",
        fmt_money(&c.savings),
        c.both_allocation_mode,
        c.compare_mode
    );
    if !c.ev_setup_costs.is_zero() {
        println!("One-off charger setup: {}", fmt_money(&c.ev_setup_costs));
    }
    Ok(())
}

fn print_quick(sub: &clap::ArgMatches, q: &QuickCompare) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, q)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Miles", "EV", "ICE", "Savings", "%"],
            vec![vec![
                fmt_num(&q.miles, 1),
                fmt_money(&q.ev_cost),
                fmt_money(&q.ice_cost),
                fmt_money(&q.savings),
                fmt_num(&q.percent, 1),
            ]]
        )
    );
    if q.ev_cheaper {
        println!("EV is cheaper");
    } else {
        println!("ICE is cheaper or equal");
    }
    Ok(())
}
