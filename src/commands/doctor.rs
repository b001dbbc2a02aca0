// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{PeriodMode, parse_day};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn count(conn: &Connection, table: &str) -> Result<usize> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
    Ok(usize::try_from(n).unwrap_or(0))
}

/// Problems in the stored data as `(issue, detail)` pairs.
pub fn issues(conn: &Connection) -> Result<Vec<(String, String)>> {
    let state = db::load_state(conn)?;
    let mut out = Vec::new();

    // 1) Rows that could not be read at all
    for (table, loaded) in [("entries", state.entries.len()), ("costs", state.costs.len())] {
        let stored = count(conn, table)?;
        if stored > loaded {
            out.push((
                "unreadable_rows".to_string(),
                format!("{} {} rows skipped", stored - loaded, table),
            ));
        }
    }

    // 2) Records the engine ignores or zeroes out
    for e in &state.entries {
        if e.day().is_none() {
            out.push(("entry_bad_date".into(), format!("{} '{}'", e.id, e.date)));
        }
        if e.kwh <= Decimal::ZERO {
            out.push(("entry_non_positive_kwh".into(), format!("{} {}", e.id, e.kwh)));
        }
        if e.price < Decimal::ZERO {
            out.push(("entry_negative_price".into(), format!("{} {}", e.id, e.price)));
        }
    }
    for c in &state.costs {
        if c.day().is_none() {
            out.push(("cost_bad_date".into(), format!("{} '{}'", c.id, c.date)));
        }
        if c.amount <= Decimal::ZERO {
            out.push(("cost_non_positive_amount".into(), format!("{} {}", c.id, c.amount)));
        }
    }

    // 3) Settings that silence parts of the comparison
    let s = &state.settings;
    if s.ev_miles_per_kwh <= Decimal::ZERO {
        out.push(("zero_ev_efficiency".into(), s.ev_miles_per_kwh.to_string()));
    }
    if s.ice_mpg <= Decimal::ZERO {
        out.push(("zero_ice_mpg".into(), s.ice_mpg.to_string()));
    }

    // 4) Sessions priced with a fuel record from after their date
    if let Some(first) = s.ice_per_litre_history.first() {
        let early = state
            .entries
            .iter()
            .filter(|e| e.day().is_some_and(|d| d < first.from))
            .count();
        if early > 0 {
            out.push((
                "fuel_price_before_history".into(),
                format!("{} sessions before {}", early, first.from),
            ));
        }
    }

    if state.ui.period_mode == PeriodMode::Custom
        && (parse_day(&state.ui.period_from).is_none() || parse_day(&state.ui.period_to).is_none())
    {
        out.push(("custom_period_incomplete".into(), "using this month".into()));
    }
    Ok(out)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows: Vec<Vec<String>> = issues(conn)?
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
