// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::arith::{add, div};
use crate::engine::period::{Period, resolve};
use crate::models::{ChargingEntry, PeriodMode, UiState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChargingStats {
    pub sessions: usize,
    pub total_kwh: Decimal,
    pub total_cost: Decimal,
    pub avg_price_per_kwh: Decimal,
    /// Cost per calendar day of the period; zero for all-time.
    pub per_day: Decimal,
}

pub fn stats(entries: &[ChargingEntry], period: &Period) -> ChargingStats {
    let mut out = ChargingStats::default();
    for e in period.filter(entries, |e| e.date.as_str()) {
        out.sessions += 1;
        out.total_kwh = add(out.total_kwh, e.kwh);
        out.total_cost = add(out.total_cost, e.cost());
    }
    if out.total_kwh > Decimal::ZERO {
        out.avg_price_per_kwh = div(out.total_cost, out.total_kwh);
    }
    if let Some(days) = period.days().filter(|d| *d > 0) {
        out.per_day = div(out.total_cost, Decimal::from(days));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAverage {
    pub months: usize,
    pub kwh: Decimal,
    pub cost: Decimal,
    pub avg_price_per_kwh: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub this_month: ChargingStats,
    pub last_month: ChargingStats,
    /// `None` until at least one entry has a valid date.
    pub average: Option<MonthlyAverage>,
}

/// This month, last month and the per-month average over every month that
/// has at least one session.
pub fn overview(entries: &[ChargingEntry], today: NaiveDate) -> Overview {
    let this = resolve(&ui_for(PeriodMode::ThisMonth), today);
    let last = resolve(&ui_for(PeriodMode::LastMonth), today);

    let mut months = BTreeSet::new();
    let mut kwh = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    for e in entries {
        if let Some(d) = e.day() {
            months.insert(d.format("%Y-%m").to_string());
            kwh = add(kwh, e.kwh);
            cost = add(cost, e.cost());
        }
    }
    let average = if months.is_empty() {
        None
    } else {
        let n = Decimal::from(months.len());
        Some(MonthlyAverage {
            months: months.len(),
            kwh: div(kwh, n),
            cost: div(cost, n),
            avg_price_per_kwh: div(cost, kwh),
        })
    };

    Overview {
        this_month: stats(entries, &this),
        last_month: stats(entries, &last),
        average,
    }
}

fn ui_for(mode: PeriodMode) -> UiState {
    UiState {
        period_mode: mode,
        ..UiState::default()
    }
}
