// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use evlog::commands::{period, settings};
use evlog::engine::period::resolve;
use evlog::error::ValidationError;
use evlog::models::{AppliesTo, BothAllocationMode, CompareMode, PeriodMode, Settings, UiState};
use evlog::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["evlog"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("settings", sub)) => settings::handle(conn, sub),
        Some(("period", sub)) => period::handle(conn, sub),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn apply_updates_known_keys() {
    let mut s = Settings::default();
    settings::apply(&mut s, "home_xp", "0.25").unwrap();
    settings::apply(&mut s, "public", "0").unwrap();
    settings::apply(&mut s, "ev-miles-per-kwh", "3.4").unwrap();
    settings::apply(&mut s, "both-allocation", "double").unwrap();
    settings::apply(&mut s, "compare-mode", "full").unwrap();
    settings::apply(&mut s, "legacy-applies", "ev").unwrap();
    settings::apply(&mut s, "charger-hardware", "499").unwrap();

    assert_eq!(s.home_xp, d("0.25"));
    assert_eq!(s.public, Decimal::ZERO);
    assert_eq!(s.ev_miles_per_kwh, d("3.4"));
    assert_eq!(s.both_allocation_mode, BothAllocationMode::Double);
    assert_eq!(s.compare_mode, CompareMode::Full);
    assert_eq!(s.legacy_applies_default, AppliesTo::Ev);
    assert_eq!(s.charger_setup_cost(), d("499"));
}

#[test]
fn apply_rejects_bad_values_and_keys() {
    let mut s = Settings::default();
    assert!(settings::apply(&mut s, "ice-mpg", "0").is_err());
    assert!(settings::apply(&mut s, "home", "-1").is_err());
    assert!(settings::apply(&mut s, "both-allocation", "triple").is_err());
    assert!(settings::apply(&mut s, "colour", "red").is_err());
    assert_eq!(s, Settings::default());
}

#[test]
fn settings_persist_through_cli() {
    let mut conn = setup();
    run(&mut conn, &["settings", "set", "ice-mpg", "52"]).unwrap();
    run(&mut conn, &["settings", "fuel-price", "1.39", "--from", "2024-01-01"]).unwrap();
    run(&mut conn, &["settings", "fuel-price", "1.52", "--from", "2024-04-01"]).unwrap();

    let s = db::load_settings(&conn).unwrap();
    assert_eq!(s.ice_mpg, d("52"));
    assert_eq!(s.ice_per_litre, d("1.52"));
    assert_eq!(s.ice_per_litre_history.len(), 2);

    run(&mut conn, &["settings", "reset-compare"]).unwrap();
    let s = db::load_settings(&conn).unwrap();
    assert_eq!(s.ice_mpg, d("45"));
    assert_eq!(s.ice_per_litre_history.len(), 3);

    run(&mut conn, &["settings", "show", "--json"]).unwrap();
    run(&mut conn, &["settings", "fuel-history"]).unwrap();
}

#[test]
fn custom_period_needs_both_bounds() {
    let current = UiState::default();
    assert_eq!(
        period::preference(&current, PeriodMode::Custom, Some("2024-03-01"), None),
        Err(ValidationError::IncompletePeriod)
    );
    let ui = period::preference(&current, PeriodMode::Custom, Some("2024-03-10"), Some("2024-03-01"))
        .unwrap();
    let p = resolve(&ui, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert!(p.includes("2024-03-05"));
    assert!(!p.includes("2024-03-11"));
}

#[test]
fn period_set_and_reset_through_cli() {
    let mut conn = setup();
    run(&mut conn, &["period", "set", "custom", "--from", "2024-03-01", "--to", "2024-03-31"]).unwrap();
    let ui = db::load_ui(&conn).unwrap();
    assert_eq!(ui.period_mode, PeriodMode::Custom);
    assert_eq!(ui.period_from, "2024-03-01");

    // switching mode keeps the custom bounds for later
    run(&mut conn, &["period", "set", "all-time"]).unwrap();
    let ui = db::load_ui(&conn).unwrap();
    assert_eq!(ui.period_mode, PeriodMode::AllTime);
    assert_eq!(ui.period_to, "2024-03-31");

    assert!(run(&mut conn, &["period", "set", "fortnight"]).is_err());
    assert!(run(&mut conn, &["period", "set", "custom", "--from", "2024-03-01"]).is_err());
    assert_eq!(db::load_ui(&conn).unwrap().period_mode, PeriodMode::AllTime);

    run(&mut conn, &["period", "reset"]).unwrap();
    assert_eq!(db::load_ui(&conn).unwrap(), UiState::default());
}

#[test]
fn implausible_efficiencies_and_prices_are_rejected() {
    let mut s = Settings::default();
    assert_eq!(
        settings::apply(&mut s, "ice-mpg", "0.0000000000000000000000000001")
            .unwrap_err()
            .downcast::<ValidationError>()
            .unwrap(),
        ValidationError::TooSmall {
            field: "ice-mpg",
            value: "0.0000000000000000000000000001".into(),
            min: d("0.01"),
        }
    );
    assert!(settings::apply(&mut s, "ev-miles-per-kwh", "0.001").is_err());
    assert!(settings::apply(&mut s, "home", "79228162514264337593543950335").is_err());
    assert!(settings::apply(&mut s, "charger-install", "1000001").is_err());
    assert_eq!(s, Settings::default());

    settings::apply(&mut s, "ice-mpg", "0.01").unwrap();
    settings::apply(&mut s, "charger-install", "1000000").unwrap();
    assert_eq!(s.ice_mpg, d("0.01"));
}
