// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use evlog::commands::backup;
use evlog::error::BackupError;
use evlog::models::{AppliesTo, ChargeType, PeriodMode};
use evlog::state::{restore, to_json};
use evlog::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

const LEGACY: &str = r#"{
  "entries": [
    {"id": 1700000000000, "date": "2024-01-02", "kwh": 10, "type": "🏠 Home (XP)", "price": 0.3, "note": ""},
    {"date": "2024-01-05", "kwh": 7.5, "type": "public", "price": 0.56}
  ],
  "costs": [
    {"date": "2024-01-03", "cat": "Tyres", "amount": 120, "target": "ice"},
    {"id": "c2", "date": "2024-01-04", "category": "Wash", "amount": 5},
    {"id": "c3", "date": "2024-01-06", "category": "Service", "amount": 90, "applies": "both", "target": "ev"}
  ],
  "settings": {
    "evMilesPerKwh": 3,
    "icePerLitreHistory": [
      {"from": "2024-03-01", "perLitre": 1.5},
      {"from": "2024-01-01", "perLitre": 1.4}
    ]
  }
}"#;

#[test]
fn restore_normalizes_legacy_records() {
    let state = restore(LEGACY).unwrap();

    assert_eq!(state.entries.len(), 2);
    assert_eq!(state.entries[0].id, "1700000000000");
    assert_eq!(state.entries[0].charge_type, ChargeType::HomeXp);
    assert!(!state.entries[1].id.is_empty());
    assert_eq!(state.entries[1].kwh, d("7.5"));

    assert_eq!(state.costs[0].category, "Tyres");
    assert_eq!(state.costs[0].applies, AppliesTo::Ice);
    assert!(!state.costs[0].id.is_empty());
    assert_eq!(state.costs[1].applies, AppliesTo::Other);
    // applies wins over target
    assert_eq!(state.costs[2].applies, AppliesTo::Both);

    assert_eq!(state.settings.ev_miles_per_kwh, d("3"));
    assert_eq!(state.settings.ice_mpg, d("45"));
    let froms: Vec<String> = state
        .settings
        .ice_per_litre_history
        .iter()
        .map(|r| r.from.to_string())
        .collect();
    assert_eq!(froms, vec!["2024-01-01", "2024-03-01"]);
    assert_eq!(state.ui.period_mode, PeriodMode::ThisMonth);
}

#[test]
fn legacy_default_tag_is_configurable() {
    let raw = r#"{"entries": [], "costs": [{"id": "x", "date": "2024-01-01", "category": "Tyres", "amount": 10}],
                  "settings": {"legacyAppliesDefault": "ev"}}"#;
    let state = restore(raw).unwrap();
    assert_eq!(state.costs[0].applies, AppliesTo::Ev);
}

#[test]
fn restore_rejects_wrong_shapes() {
    assert!(matches!(restore("not json"), Err(BackupError::Json(_))));
    assert!(matches!(restore("[]"), Err(BackupError::NotAnObject)));
    assert!(matches!(
        restore(r#"{"entries": {}, "settings": {}}"#),
        Err(BackupError::EntriesNotArray)
    ));
    assert!(matches!(restore(r#"{"entries": []}"#), Err(BackupError::MissingSettings)));
    assert!(matches!(
        restore(r#"{"entries": [], "settings": {}, "costs": "nope"}"#),
        Err(BackupError::CostsNotArray)
    ));
    assert!(matches!(
        restore(r#"{"entries": [{"date": 20240101, "kwh": 10}], "settings": {}}"#),
        Err(BackupError::Record { kind: "entries", index: 0, .. })
    ));
}

#[test]
fn minimal_document_restores_with_defaults() {
    let state = restore(r#"{"entries": [], "settings": {}}"#).unwrap();
    assert!(state.entries.is_empty());
    assert!(state.costs.is_empty());
    assert_eq!(state.settings.public, d("0.56"));
}

#[test]
fn exported_document_restores_to_same_records() {
    let state = restore(LEGACY).unwrap();
    let again = restore(&to_json(&state).unwrap()).unwrap();
    assert_eq!(again.entries, state.entries);
    assert_eq!(again.costs, state.costs);
    assert_eq!(again.settings.ice_per_litre_history, state.settings.ice_per_litre_history);
}

#[test]
fn backup_import_and_export_through_cli() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.json");
    std::fs::write(&input, LEGACY).unwrap();
    let in_str = input.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from(["evlog", "backup", "import", "--file", &in_str]);
    if let Some(("backup", sub)) = matches.subcommand() {
        backup::handle(&mut conn, sub).unwrap();
    } else {
        panic!("no backup subcommand");
    }
    let loaded = db::load_state(&conn).unwrap();
    assert_eq!(loaded.entries.len(), 2);
    assert_eq!(loaded.costs.len(), 3);
    assert_eq!(loaded.settings.ice_per_litre_history.len(), 2);

    let output = dir.path().join("out.json");
    let out_str = output.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from(["evlog", "backup", "export", "--out", &out_str]);
    if let Some(("backup", sub)) = matches.subcommand() {
        backup::handle(&mut conn, sub).unwrap();
    } else {
        panic!("no backup subcommand");
    }
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert!(doc["entries"].is_array());
    assert!(doc["settings"].is_object());
    assert_eq!(doc["costs"].as_array().unwrap().len(), 3);
    assert!(doc["entries"][0]["kwh"].is_number());
}

#[test]
fn invalid_backup_leaves_data_untouched() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.json");
    std::fs::write(&good, LEGACY).unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"entries": "oops", "settings": {}}"#).unwrap();

    for (path, ok) in [(&good, true), (&bad, false)] {
        let p = path.to_string_lossy().to_string();
        let matches = cli::build_cli().get_matches_from(["evlog", "backup", "import", "--file", &p]);
        let Some(("backup", sub)) = matches.subcommand() else {
            panic!("no backup subcommand");
        };
        assert_eq!(backup::handle(&mut conn, sub).is_ok(), ok);
    }
    assert_eq!(db::load_entries(&conn).unwrap().len(), 2);
}

#[test]
fn malformed_settings_fields_fall_back_individually() {
    let raw = r#"{"entries": [], "settings": {"iceMpg": null, "home": "cheap", "evMilesPerKwh": 3.5,
                  "bothAllocationMode": 7, "icePerLitreHistory": [{"from": "2024-01-01", "perLitre": 1.4}, {"from": "soon"}]}}"#;
    let mut current = evlog::models::Settings::default();
    current.ice_mpg = d("52");
    current.home = d("0.12");
    current.public = d("0.61");

    let state = evlog::state::restore_onto(raw, &current).unwrap();
    assert_eq!(state.settings.ice_mpg, d("45"));
    assert_eq!(state.settings.home, d("0.09"));
    assert_eq!(state.settings.ev_miles_per_kwh, d("3.5"));
    // absent from the backup, so the current value stays
    assert_eq!(state.settings.public, d("0.61"));
    assert_eq!(state.settings.both_allocation_mode, evlog::models::BothAllocationMode::Split);
    assert_eq!(state.settings.ice_per_litre_history.len(), 1);
}

#[test]
fn null_record_numbers_read_as_zero_and_are_flagged() {
    let raw = r#"{"entries": [{"id": "e1", "date": "2024-01-02", "kwh": null, "type": "home", "price": null}],
                  "costs": [{"id": "c1", "date": "2024-01-03", "category": "Tyres", "amount": "lots", "applies": "ev"}],
                  "settings": {}}"#;
    let state = restore(raw).unwrap();
    assert_eq!(state.entries[0].kwh, Decimal::ZERO);
    assert_eq!(state.entries[0].price, Decimal::ZERO);
    assert_eq!(state.costs[0].amount, Decimal::ZERO);

    let mut conn = setup();
    db::save_state(&mut conn, &state).unwrap();
    let issues = evlog::commands::doctor::issues(&conn).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|(k, _)| k.as_str()).collect();
    assert!(kinds.contains(&"entry_non_positive_kwh"));
    assert!(kinds.contains(&"cost_non_positive_amount"));
}
