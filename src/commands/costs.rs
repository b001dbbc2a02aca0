// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db;
use crate::engine::arith::add as arith_add;
use crate::engine::period::resolve;
use crate::models::{AppliesTo, CostEntry};
use crate::state::{self, new_id, validate_cost};
use crate::utils::{
    fmt_money, json_flags, maybe_print_json, parse_date, parse_positive, pretty_table, required,
    today,
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
    let mut costs = db::load_costs(conn)?;

    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let amount = parse_positive("amount", required(sub, "amount")?)?;
    let applies: AppliesTo = required(sub, "applies")?.parse()?;
    let cost = CostEntry {
        id: new_id(),
        date: date.to_string(),
        category: required(sub, "category")?.trim().to_string(),
        amount,
        note: sub.get_one::<String>("note").cloned().unwrap_or_default(),
        applies,
    };
    validate_cost(&cost)?;

    tracing::info!(id = %cost.id, date = %cost.date, %amount, applies = %applies, "cost added");
    println!(
        "Logged {} {} on {} for {} [{}]",
        cost.category_key(),
        fmt_money(&cost.amount),
        cost.date,
        applies.label(),
        cost.id
    );
    costs.push(cost);
    db::save_costs(conn, &costs)?;
    Ok(())
}

#[derive(Serialize)]
struct CategoryTotal {
    category: String,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

#[derive(Serialize)]
struct CostListing<'a> {
    period: String,
    costs: Vec<&'a CostEntry>,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
    by_category: Vec<CategoryTotal>,
}

fn list(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let costs = db::load_costs(conn)?;
    let filter = sub
        .get_one::<String>("applies")
        .map(|s| s.parse::<AppliesTo>())
        .transpose()?;

    let (label, mut selected) = if sub.get_flag("all") {
        ("All time".to_string(), costs.iter().collect::<Vec<_>>())
    } else {
        let period = resolve(&db::load_ui(conn)?, today());
        let selected = period.filter(&costs, |c| c.date.as_str());
        (period.label, selected)
    };
    if let Some(tag) = filter {
        selected.retain(|c| c.applies == tag);
    }
    selected.sort_by(|a, b| b.date.cmp(&a.date));

    let total: Decimal = selected.iter().map(|c| c.amount).sum();
    let mut by_cat: BTreeMap<String, Decimal> = BTreeMap::new();
    for c in &selected {
        let slot = by_cat.entry(c.category_key().to_string()).or_insert(Decimal::ZERO);
        *slot = arith_add(*slot, c.amount);
    }

    if jsonl_flag {
        maybe_print_json(false, true, &selected)?;
        return Ok(());
    }
    let listing = CostListing {
        period: label,
        costs: selected,
        total,
        by_category: by_cat
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect(),
    };
    if maybe_print_json(json_flag, false, &listing)? {
        return Ok(());
    }

    println!("{}", listing.period);
    if listing.costs.is_empty() {
        println!("No costs yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = listing
        .costs
        .iter()
        .map(|c| {
            vec![
                c.date.clone(),
                c.category.clone(),
                c.applies.label().to_string(),
                fmt_money(&c.amount),
                c.note.clone(),
                c.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Category", "Applies", "Amount", "Note", "Id"], rows)
    );
    let cat_rows: Vec<Vec<String>> = listing
        .by_category
        .iter()
        .map(|c| vec![c.category.clone(), fmt_money(&c.total)])
        .collect();
    println!("{}", pretty_table(&["Category", "Total"], cat_rows));
    println!("Total: {}", fmt_money(&listing.total));
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let costs = db::load_costs(conn)?;
    let Some(existing) = state::find(&costs, id) else {
        bail!("No cost with id '{}'", id);
    };

    let mut updated = existing.clone();
    if let Some(s) = sub.get_one::<String>("date") {
        updated.date = parse_date(s)?.to_string();
    }
    if let Some(s) = sub.get_one::<String>("category") {
        updated.category = s.trim().to_string();
    }
    if let Some(s) = sub.get_one::<String>("amount") {
        updated.amount = parse_positive("amount", s)?;
    }
    if let Some(s) = sub.get_one::<String>("applies") {
        updated.applies = s.parse()?;
    }
    if let Some(s) = sub.get_one::<String>("note") {
        updated.note = s.clone();
    }
    validate_cost(&updated)?;

    let Some(next) = state::replace(&costs, updated) else {
        bail!("No cost with id '{}'", id);
    };
    db::save_costs(conn, &next)?;
    tracing::info!(id, "cost updated");
    println!("Updated cost {}", id);
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let costs = db::load_costs(conn)?;
    let Some(next) = state::remove(&costs, id) else {
        bail!("No cost with id '{}'", id);
    };
    db::save_costs(conn, &next)?;
    tracing::info!(id, "cost deleted");
    println!("Deleted cost {}", id);
    Ok(())
}
