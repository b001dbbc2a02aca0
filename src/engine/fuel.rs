// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::engine::arith::{div, mul};
use crate::models::{LITRES_PER_UK_GALLON, PriceRecord, Settings};

/// Price per litre in force on `date`: the latest record dated on or before
/// it, else the earliest record, else `fallback` when the history is empty.
/// `history` must be sorted ascending by `from`.
pub fn price_on(history: &[PriceRecord], date: NaiveDate, fallback: Decimal) -> Decimal {
    let Some(first) = history.first() else {
        return fallback;
    };
    history
        .iter()
        .take_while(|r| r.from <= date)
        .last()
        .unwrap_or(first)
        .per_litre
}

/// Inserts a record, overwriting one with the same `from` date.
pub fn add_record(history: &mut Vec<PriceRecord>, from: NaiveDate, per_litre: Decimal) {
    if let Some(existing) = history.iter_mut().find(|r| r.from == from) {
        existing.per_litre = per_litre;
        return;
    }
    history.push(PriceRecord { from, per_litre });
    history.sort_by_key(|r| r.from);
}

/// Records a new fuel price and makes the latest record the current price.
pub fn record_price(settings: &mut Settings, from: NaiveDate, per_litre: Decimal) {
    add_record(&mut settings.ice_per_litre_history, from, per_litre);
    if let Some(latest) = settings.ice_per_litre_history.last() {
        settings.ice_per_litre = latest.per_litre;
    }
    tracing::debug!(%from, %per_litre, "fuel price recorded");
}

/// Cost of driving `miles` in a car doing `mpg` (UK gallons) at `per_litre`.
/// Non-positive mpg yields zero.
pub fn fuel_cost(miles: Decimal, mpg: Decimal, per_litre: Decimal) -> Decimal {
    if mpg <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let gallons = div(miles, mpg);
    mul(mul(gallons, LITRES_PER_UK_GALLON), per_litre)
}

/// Puts a restored history back into ascending order and drops duplicate
/// dates, keeping the last one seen.
pub fn normalize_history(history: &mut Vec<PriceRecord>) {
    let mut out: Vec<PriceRecord> = Vec::with_capacity(history.len());
    for r in history.drain(..) {
        add_record(&mut out, r.from, r.per_litre);
    }
    *history = out;
}

/// Puts efficiency and allocation back to defaults and records the default
/// fuel price from `today`. Earlier price records are kept.
pub fn reset_compare(settings: &mut Settings, today: NaiveDate) {
    settings.ev_miles_per_kwh = Settings::default_ev_miles_per_kwh();
    settings.ice_mpg = Settings::default_ice_mpg();
    settings.both_allocation_mode = Default::default();
    record_price(settings, today, Settings::default_ice_per_litre());
}
