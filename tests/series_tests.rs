// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use evlog::engine::series::{cumulative, events, monthly};
use evlog::models::{AppliesTo, BothAllocationMode, ChargeType, ChargingEntry, CostEntry, Settings};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn settings() -> Settings {
    Settings {
        ev_miles_per_kwh: d("3"),
        ice_mpg: d("40"),
        ice_per_litre: d("1.50"),
        ..Settings::default()
    }
}

fn data() -> (Vec<ChargingEntry>, Vec<CostEntry>) {
    let entries = vec![ChargingEntry {
        id: "e1".into(),
        date: "2024-01-10".into(),
        kwh: d("10"),
        charge_type: ChargeType::Public,
        price: d("0.10"),
        note: String::new(),
    }];
    let cost = |id: &str, date: &str, amount: &str, applies| CostEntry {
        id: id.into(),
        date: date.into(),
        category: "Service".into(),
        amount: d(amount),
        note: String::new(),
        applies,
    };
    let costs = vec![
        cost("c2", "2024-02-01", "10", AppliesTo::Other),
        cost("c1", "2024-01-05", "100", AppliesTo::Both),
        cost("c3", "someday", "999", AppliesTo::Ev),
        cost("c4", "2024-02-03", "40", AppliesTo::Ice),
    ];
    (entries, costs)
}

#[test]
fn events_are_sorted_and_skip_malformed_dates() {
    let (entries, costs) = data();
    let evs = events(&entries, &costs, &settings());
    let dates: Vec<NaiveDate> = evs.iter().map(|e| e.date).collect();
    assert_eq!(
        dates,
        vec![day("2024-01-05"), day("2024-01-10"), day("2024-02-01"), day("2024-02-03")]
    );
    // other lands on the EV side
    assert_eq!((evs[2].ev_delta, evs[2].ice_delta), (d("10"), Decimal::ZERO));
    assert_eq!((evs[3].ev_delta, evs[3].ice_delta), (Decimal::ZERO, d("40")));
}

#[test]
fn cumulative_emits_running_totals_per_event() {
    let (entries, costs) = data();
    let points = cumulative(&events(&entries, &costs, &settings()));
    let totals: Vec<(Decimal, Decimal)> = points.iter().map(|p| (p.ev, p.ice)).collect();
    assert_eq!(
        totals,
        vec![
            (d("50"), d("50")),
            (d("51"), d("55.11435125")),
            (d("61"), d("55.11435125")),
            (d("61"), d("95.11435125")),
        ]
    );
}

#[test]
fn monthly_sums_within_each_month() {
    let (entries, costs) = data();
    let months = monthly(&events(&entries, &costs, &settings()));
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month, "2024-01");
    assert_eq!((months[0].ev, months[0].ice), (d("51"), d("55.11435125")));
    assert_eq!(months[1].month, "2024-02");
    assert_eq!((months[1].ev, months[1].ice), (d("10"), d("40")));
}

#[test]
fn both_follows_allocation_mode() {
    let (entries, costs) = data();
    let s = Settings {
        both_allocation_mode: BothAllocationMode::Double,
        ..settings()
    };
    let evs = events(&entries, &costs, &s);
    assert_eq!((evs[0].ev_delta, evs[0].ice_delta), (d("100"), d("100")));
}

#[test]
fn empty_inputs_give_empty_series() {
    let evs = events(&[], &[], &settings());
    assert!(cumulative(&evs).is_empty());
    assert!(monthly(&evs).is_empty());
}
