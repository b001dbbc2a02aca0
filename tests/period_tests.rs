// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use evlog::engine::period::{DateRange, Period, month_bounds, resolve};
use evlog::models::{PeriodMode, UiState};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn ui(mode: PeriodMode, from: &str, to: &str) -> UiState {
    UiState {
        period_mode: mode,
        period_from: from.to_string(),
        period_to: to.to_string(),
    }
}

#[test]
fn this_month_covers_whole_calendar_month() {
    let p = resolve(&ui(PeriodMode::ThisMonth, "", ""), day("2024-03-15"));
    assert_eq!(p.range, Some(DateRange { from: day("2024-03-01"), to: day("2024-03-31") }));
    assert_eq!(p.label, "This month (2024-03-01 to 2024-03-31)");
    assert_eq!(p.days(), Some(31));
}

#[test]
fn last_month_handles_leap_february_and_year_boundary() {
    let feb = resolve(&ui(PeriodMode::LastMonth, "", ""), day("2024-03-15"));
    assert_eq!(feb.range, Some(DateRange { from: day("2024-02-01"), to: day("2024-02-29") }));

    let dec = resolve(&ui(PeriodMode::LastMonth, "", ""), day("2024-01-05"));
    assert_eq!(dec.range, Some(DateRange { from: day("2023-12-01"), to: day("2023-12-31") }));
}

#[test]
fn last_30_is_thirty_inclusive_days_ending_today() {
    let p = resolve(&ui(PeriodMode::Last30, "", ""), day("2024-03-15"));
    assert_eq!(p.range, Some(DateRange { from: day("2024-02-15"), to: day("2024-03-15") }));
    assert_eq!(p.days(), Some(30));
}

#[test]
fn custom_range_with_reversed_bounds_is_swapped() {
    let p = resolve(&ui(PeriodMode::Custom, "2024-03-10", "2024-03-01"), day("2024-06-01"));
    assert_eq!(p.mode, PeriodMode::Custom);
    assert_eq!(p.range, Some(DateRange { from: day("2024-03-01"), to: day("2024-03-10") }));
}

#[test]
fn incomplete_custom_range_falls_back_to_this_month() {
    for (from, to) in [("2024-03-01", ""), ("", "2024-03-10"), ("garbage", "2024-03-10")] {
        let p = resolve(&ui(PeriodMode::Custom, from, to), day("2024-05-20"));
        assert_eq!(p.mode, PeriodMode::ThisMonth);
        assert_eq!(p, resolve(&ui(PeriodMode::ThisMonth, "", ""), day("2024-05-20")));
    }
}

#[test]
fn bounds_are_inclusive_and_malformed_dates_never_match() {
    let p = resolve(&ui(PeriodMode::Custom, "2024-03-01", "2024-03-10"), day("2024-06-01"));
    assert!(p.includes("2024-03-01"));
    assert!(p.includes("2024-03-10"));
    assert!(!p.includes("2024-02-29"));
    assert!(!p.includes("2024-03-11"));
    assert!(!p.includes("10/03/2024"));
    assert!(!p.includes(""));
}

#[test]
fn all_time_includes_everything() {
    let p = resolve(&ui(PeriodMode::AllTime, "", ""), day("2024-06-01"));
    assert_eq!(p, Period::all_time());
    assert!(p.includes("1999-01-01"));
    assert!(p.includes("not a date"));
    assert_eq!(p.days(), None);
}

#[test]
fn filter_keeps_items_in_range() {
    let items = vec!["2024-02-28", "2024-03-01", "2024-03-31", "2024-04-01", "bad"];
    let p = resolve(&ui(PeriodMode::ThisMonth, "", ""), day("2024-03-15"));
    let kept: Vec<&&str> = p.filter(&items, |s| *s);
    assert_eq!(kept, vec![&"2024-03-01", &"2024-03-31"]);
}

#[test]
fn month_bounds_for_december() {
    assert_eq!(
        month_bounds(day("2023-12-25")),
        DateRange { from: day("2023-12-01"), to: day("2023-12-31") }
    );
}
