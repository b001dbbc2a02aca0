// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use evlog::engine::period::Period;
use evlog::engine::summary::{overview, stats};
use evlog::models::{ChargeType, ChargingEntry};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn entry(date: &str, kwh: &str, price: &str) -> ChargingEntry {
    ChargingEntry {
        id: date.to_string(),
        date: date.to_string(),
        kwh: d(kwh),
        charge_type: ChargeType::Public,
        price: d(price),
        note: String::new(),
    }
}

fn entries() -> Vec<ChargingEntry> {
    vec![
        entry("2024-03-01", "10", "0.10"),
        entry("2024-03-05", "20", "0.20"),
        entry("2024-02-10", "10", "0.50"),
        entry("2024-01-20", "5", "0.20"),
        entry("not-a-date", "100", "1"),
    ]
}

#[test]
fn overview_splits_this_and_last_month() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let o = overview(&entries(), today);

    assert_eq!(o.this_month.sessions, 2);
    assert_eq!(o.this_month.total_kwh, d("30"));
    assert_eq!(o.this_month.total_cost, d("5"));
    assert_eq!(o.this_month.avg_price_per_kwh, d("5") / d("30"));
    assert_eq!(o.this_month.per_day, d("5") / d("31"));

    assert_eq!(o.last_month.sessions, 1);
    assert_eq!(o.last_month.total_cost, d("5"));
}

#[test]
fn monthly_average_counts_only_months_with_sessions() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let avg = overview(&entries(), today).average.unwrap();
    assert_eq!(avg.months, 3);
    assert_eq!(avg.kwh, d("15"));
    assert_eq!(avg.cost, d("11") / d("3"));
    assert_eq!(avg.avg_price_per_kwh, d("11") / d("45"));
}

#[test]
fn no_entries_means_no_average() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let o = overview(&[], today);
    assert!(o.average.is_none());
    assert_eq!(o.this_month.sessions, 0);
    assert_eq!(o.this_month.avg_price_per_kwh, Decimal::ZERO);
}

#[test]
fn all_time_stats_include_everything_without_per_day() {
    let s = stats(&entries(), &Period::all_time());
    assert_eq!(s.sessions, 5);
    assert_eq!(s.per_day, Decimal::ZERO);
}
