// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::arith::add;
use crate::engine::allocation::allocate_one;
use crate::engine::energy::ice_equivalent;
use crate::models::{AppliesTo, ChargingEntry, CostEntry, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesEvent {
    pub date: NaiveDate,
    pub ev_delta: Decimal,
    pub ice_delta: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub ev: Decimal,
    pub ice: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    pub ev: Decimal,
    pub ice: Decimal,
}

/// One event per charging entry and per cost, ascending by date. Entries add
/// their cost to the EV side and their fuel equivalent to the ICE side. Costs
/// tagged `other` count on the EV side. Records with malformed dates are left
/// out.
pub fn events(entries: &[ChargingEntry], costs: &[CostEntry], settings: &Settings) -> Vec<SeriesEvent> {
    let mut out = Vec::with_capacity(entries.len() + costs.len());
    for e in entries {
        let Some(date) = e.day() else {
            tracing::debug!(id = %e.id, date = %e.date, "skipping entry with malformed date");
            continue;
        };
        out.push(SeriesEvent {
            date,
            ev_delta: e.cost(),
            ice_delta: ice_equivalent(e, settings),
        });
    }
    for c in costs {
        let Some(date) = c.day() else {
            tracing::debug!(id = %c.id, date = %c.date, "skipping cost with malformed date");
            continue;
        };
        let (ev_delta, ice_delta) = match c.applies {
            AppliesTo::Other => (c.amount, Decimal::ZERO),
            tag => allocate_one(tag, c.amount, settings.both_allocation_mode),
        };
        out.push(SeriesEvent {
            date,
            ev_delta,
            ice_delta,
        });
    }
    // Stable: same-day events keep entries-then-costs order.
    out.sort_by_key(|ev| ev.date);
    out
}

/// Running totals, one point per event.
pub fn cumulative(events: &[SeriesEvent]) -> Vec<CumulativePoint> {
    let mut ev = Decimal::ZERO;
    let mut ice = Decimal::ZERO;
    events
        .iter()
        .map(|e| {
            ev = add(ev, e.ev_delta);
            ice = add(ice, e.ice_delta);
            CumulativePoint {
                date: e.date,
                ev,
                ice,
            }
        })
        .collect()
}

/// Per-month sums (not cumulative), ascending by month.
pub fn monthly(events: &[SeriesEvent]) -> Vec<MonthlyPoint> {
    let mut by_month: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for e in events {
        let slot = by_month
            .entry(e.date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        slot.0 = add(slot.0, e.ev_delta);
        slot.1 = add(slot.1, e.ice_delta);
    }
    by_month
        .into_iter()
        .map(|(month, (ev, ice))| MonthlyPoint { month, ev, ice })
        .collect()
}
