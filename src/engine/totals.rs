// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::arith::{add, div, mul, sub, sum};
use crate::engine::allocation::{CostBreakdown, allocate};
use crate::engine::energy::{EnergyEstimate, estimate, miles_for};
use crate::engine::fuel::fuel_cost;
use crate::engine::period::Period;
use crate::models::{BothAllocationMode, ChargingEntry, CompareMode, CostEntry, Settings};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub period: Period,
    pub both_allocation_mode: BothAllocationMode,
    pub compare_mode: CompareMode,
    pub energy: EnergyEstimate,
    pub costs: CostBreakdown,
    pub ev_maintenance: Decimal,
    pub ev_insurance: Decimal,
    pub ev_total: Decimal,
    /// Logged ICE fuel purchases; always zero in costs-only mode.
    pub ice_fuel_cost: Decimal,
    pub ice_maintenance: Decimal,
    pub ice_insurance: Decimal,
    /// ICE running costs with no assumed driving.
    pub ice_total: Decimal,
    pub ice_equivalent_fuel: Decimal,
    /// What the ICE side would have cost had it also covered the EV miles.
    pub ice_total_plus_equivalent_fuel: Decimal,
    /// `ice_total_plus_equivalent_fuel - ev_total`; positive means the EV is cheaper.
    pub savings: Decimal,
    /// One-off charger hardware and install, reported outside the totals.
    pub ev_setup_costs: Decimal,
}

/// Builds the EV vs ICE comparison for the entries and costs inside `period`.
/// Costs tagged `other` are carried on the EV side.
pub fn compare(
    entries: &[ChargingEntry],
    costs: &[CostEntry],
    settings: &Settings,
    period: &Period,
) -> Comparison {
    let mode = settings.both_allocation_mode;
    let entries_in = period.filter(entries, |e| e.date.as_str());
    let costs_in = period.filter(costs, |c| c.date.as_str());

    let energy = estimate(entries_in.iter().copied(), settings);
    let breakdown = allocate(
        costs_in.iter().copied(),
        settings.compare_mode == CompareMode::Full,
    );

    let ev_maintenance = add(breakdown.maintenance.effective_ev(mode), breakdown.maintenance.other);
    let ev_insurance = add(breakdown.insurance.effective_ev(mode), breakdown.insurance.other);
    let ev_fuel = add(breakdown.fuel.effective_ev(mode), breakdown.fuel.other);
    let ev_total = sum([energy.ev_energy_cost, ev_maintenance, ev_insurance, ev_fuel]);

    let ice_fuel_cost = match settings.compare_mode {
        CompareMode::Full => breakdown.fuel.effective_ice(mode),
        CompareMode::CostsOnly => Decimal::ZERO,
    };
    let ice_maintenance = breakdown.maintenance.effective_ice(mode);
    let ice_insurance = breakdown.insurance.effective_ice(mode);
    let ice_total = sum([ice_fuel_cost, ice_maintenance, ice_insurance]);

    let ice_equivalent_fuel = energy.ice_equivalent_fuel_cost;
    let ice_total_plus_equivalent_fuel = add(ice_total, ice_equivalent_fuel);

    tracing::debug!(
        period = %period.label,
        entries = entries_in.len(),
        costs = costs_in.len(),
        %ev_total,
        %ice_total,
        "comparison built"
    );

    Comparison {
        period: period.clone(),
        both_allocation_mode: mode,
        compare_mode: settings.compare_mode,
        energy,
        costs: breakdown,
        ev_maintenance,
        ev_insurance,
        ev_total,
        ice_fuel_cost,
        ice_maintenance,
        ice_insurance,
        ice_total,
        ice_equivalent_fuel,
        ice_total_plus_equivalent_fuel,
        savings: sub(ice_total_plus_equivalent_fuel, ev_total),
        ev_setup_costs: settings.charger_setup_cost(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickCompare {
    pub miles: Decimal,
    pub ev_cost: Decimal,
    pub ice_cost: Decimal,
    pub savings: Decimal,
    pub ev_cheaper: bool,
    /// Savings as a share of the ICE cost, 0 when the ICE cost is 0.
    pub percent: Decimal,
}

impl QuickCompare {
    fn new(miles: Decimal, ev_cost: Decimal, ice_cost: Decimal) -> Self {
        let savings = sub(ice_cost, ev_cost);
        let percent = if ice_cost > Decimal::ZERO {
            mul(div(savings, ice_cost), Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };
        Self {
            miles,
            ev_cost,
            ice_cost,
            savings,
            ev_cheaper: savings > Decimal::ZERO,
            percent,
        }
    }
}

/// One charging session against the current fuel price.
pub fn session(kwh: Decimal, price_per_kwh: Decimal, settings: &Settings) -> QuickCompare {
    let miles = miles_for(kwh, settings);
    let ice = fuel_cost(miles, settings.ice_mpg, settings.ice_per_litre);
    QuickCompare::new(miles, mul(kwh, price_per_kwh), ice)
}

/// A trip of `miles` charged at `price_per_kwh`.
pub fn trip(miles: Decimal, price_per_kwh: Decimal, settings: &Settings) -> QuickCompare {
    let ev = if settings.ev_miles_per_kwh > Decimal::ZERO {
        mul(div(miles, settings.ev_miles_per_kwh), price_per_kwh)
    } else {
        Decimal::ZERO
    };
    let ice = fuel_cost(miles, settings.ice_mpg, settings.ice_per_litre);
    QuickCompare::new(miles, ev, ice)
}
