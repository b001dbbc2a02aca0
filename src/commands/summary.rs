// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::db;
use crate::engine::period::{Period, resolve};
use crate::engine::summary::{ChargingStats, Overview, overview, stats};
use crate::utils::{fmt_money, fmt_num, json_flags, maybe_print_json, pretty_table, today};

#[derive(Serialize)]
struct Report {
    #[serde(flatten)]
    overview: Overview,
    period: Period,
    period_stats: ChargingStats,
}

fn stats_row(label: &str, s: &ChargingStats) -> Vec<String> {
    vec![
        label.to_string(),
        s.sessions.to_string(),
        fmt_num(&s.total_kwh, 1),
        fmt_money(&s.total_cost),
        fmt_num(&s.avg_price_per_kwh, 3),
    ]
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(m);
    let entries = db::load_entries(conn)?;
    let now = today();
    let period = resolve(&db::load_ui(conn)?, now);

    let report = Report {
        overview: overview(&entries, now),
        period_stats: stats(&entries, &period),
        period,
    };
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }

    let mut rows = vec![
        stats_row("This month", &report.overview.this_month),
        stats_row("Last month", &report.overview.last_month),
    ];
    if let Some(avg) = &report.overview.average {
        rows.push(vec![
            format!("Average ({} months)", avg.months),
            String::new(),
            fmt_num(&avg.kwh, 1),
            fmt_money(&avg.cost),
            fmt_num(&avg.avg_price_per_kwh, 3),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["", "Sessions", "kWh", "Cost", "Avg £/kWh"], rows)
    );

    let p = &report.period_stats;
    println!("{}", report.period.label);
    let mut prow = stats_row("Period", p);
    prow.push(if report.period.range.is_some() {
        fmt_money(&p.per_day)
    } else {
        "-".to_string()
    });
    println!(
        "{}",
        pretty_table(
            &["", "Sessions", "kWh", "Cost", "Avg £/kWh", "Per day"],
            vec![prow]
        )
    );
    Ok(())
}
