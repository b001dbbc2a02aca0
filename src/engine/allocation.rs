// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::arith::{add, div, sum};
use crate::models::{AppliesTo, BothAllocationMode, CostEntry};

/// Raw sums per `applies` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Buckets {
    pub ev: Decimal,
    pub ice: Decimal,
    pub both: Decimal,
    pub other: Decimal,
}

impl Buckets {
    pub fn add(&mut self, applies: AppliesTo, amount: Decimal) {
        match applies {
            AppliesTo::Ev => self.ev = add(self.ev, amount),
            AppliesTo::Ice => self.ice = add(self.ice, amount),
            AppliesTo::Both => self.both = add(self.both, amount),
            AppliesTo::Other => self.other = add(self.other, amount),
        }
    }

    /// What each vehicle is credited with from the `both` bucket.
    pub fn shared_share(&self, mode: BothAllocationMode) -> Decimal {
        both_share(self.both, mode)
    }

    pub fn effective_ev(&self, mode: BothAllocationMode) -> Decimal {
        add(self.ev, self.shared_share(mode))
    }

    pub fn effective_ice(&self, mode: BothAllocationMode) -> Decimal {
        add(self.ice, self.shared_share(mode))
    }

    /// Plain sum of every bucket, no double counting.
    pub fn total(&self) -> Decimal {
        sum([self.ev, self.ice, self.both, self.other])
    }
}

pub fn both_share(amount: Decimal, mode: BothAllocationMode) -> Decimal {
    match mode {
        BothAllocationMode::Split => div(amount, Decimal::TWO),
        BothAllocationMode::Double => amount,
    }
}

/// (EV side, ICE side) credit for a single cost.
pub fn allocate_one(applies: AppliesTo, amount: Decimal, mode: BothAllocationMode) -> (Decimal, Decimal) {
    match applies {
        AppliesTo::Ev => (amount, Decimal::ZERO),
        AppliesTo::Ice => (Decimal::ZERO, amount),
        AppliesTo::Both => {
            let share = both_share(amount, mode);
            (share, share)
        }
        AppliesTo::Other => (Decimal::ZERO, Decimal::ZERO),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub maintenance: Buckets,
    pub insurance: Buckets,
    /// Only populated when fuel purchases are reported separately.
    pub fuel: Buckets,
    pub by_category: BTreeMap<String, Decimal>,
}

impl CostBreakdown {
    pub fn total(&self) -> Decimal {
        sum([self.maintenance.total(), self.insurance.total(), self.fuel.total()])
    }
}

/// Buckets costs by tag, partitioned into insurance / maintenance (and fuel
/// when `separate_fuel` is set). Zero amounts are ignored.
pub fn allocate<'a>(costs: impl IntoIterator<Item = &'a CostEntry>, separate_fuel: bool) -> CostBreakdown {
    let mut out = CostBreakdown::default();
    for c in costs {
        if c.amount.is_zero() {
            continue;
        }
        let bucket = if c.is_insurance() {
            &mut out.insurance
        } else if separate_fuel && c.is_fuel() {
            &mut out.fuel
        } else {
            &mut out.maintenance
        };
        bucket.add(c.applies, c.amount);
        let slot = out
            .by_category
            .entry(c.category_key().to_string())
            .or_insert(Decimal::ZERO);
        *slot = add(*slot, c.amount);
    }
    out
}
