// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::arith::{add, div, mul};
use crate::engine::fuel::{fuel_cost, price_on};
use crate::models::{ChargingEntry, Settings};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnergyEstimate {
    pub sessions: usize,
    pub total_kwh: Decimal,
    pub ev_energy_cost: Decimal,
    pub avg_price_per_kwh: Decimal,
    pub estimated_miles: Decimal,
    pub ice_equivalent_fuel_cost: Decimal,
}

pub fn miles_for(kwh: Decimal, settings: &Settings) -> Decimal {
    if settings.ev_miles_per_kwh <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    mul(kwh, settings.ev_miles_per_kwh)
}

/// Fuel an ICE car would have burned covering this entry's miles, priced
/// at the fuel price in force on the entry's date.
pub fn ice_equivalent(entry: &ChargingEntry, settings: &Settings) -> Decimal {
    let miles = miles_for(entry.kwh, settings);
    let per_litre = match entry.day() {
        Some(d) => price_on(&settings.ice_per_litre_history, d, settings.ice_per_litre),
        None => settings.ice_per_litre,
    };
    fuel_cost(miles, settings.ice_mpg, per_litre)
}

pub fn estimate<'a>(entries: impl IntoIterator<Item = &'a ChargingEntry>, settings: &Settings) -> EnergyEstimate {
    let mut out = EnergyEstimate::default();
    for e in entries {
        out.sessions += 1;
        out.total_kwh = add(out.total_kwh, e.kwh);
        out.ev_energy_cost = add(out.ev_energy_cost, e.cost());
        out.ice_equivalent_fuel_cost = add(out.ice_equivalent_fuel_cost, ice_equivalent(e, settings));
    }
    out.estimated_miles = miles_for(out.total_kwh, settings);
    if out.total_kwh > Decimal::ZERO {
        out.avg_price_per_kwh = div(out.ev_energy_cost, out.total_kwh);
    }
    out
}
