// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use evlog::commands::costs;
use evlog::models::AppliesTo;
use evlog::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["evlog", "cost"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().try_get_matches_from(argv)?;
    if let Some(("cost", sub)) = matches.subcommand() {
        costs::handle(conn, sub)
    } else {
        panic!("no cost subcommand");
    }
}

#[test]
fn add_stores_four_way_tag() {
    let mut conn = setup();
    run(
        &mut conn,
        &["add", "--date", "2024-03-01", "--category", "Insurance", "--amount", "420", "--applies", "ICE"],
    )
    .unwrap();
    run(&mut conn, &["add", "--date", "2024-03-02", "--amount", "12.50"]).unwrap();

    let stored = db::load_costs(&conn).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].applies, AppliesTo::Ice);
    assert!(stored[0].is_insurance());
    assert_eq!(stored[1].applies, AppliesTo::Other);
    assert_eq!(stored[1].category, "Other");
    assert_eq!(stored[1].amount, "12.50".parse::<Decimal>().unwrap());
}

#[test]
fn add_rejects_non_positive_amount_and_unknown_tag() {
    let mut conn = setup();
    assert!(run(&mut conn, &["add", "--amount", "0"]).is_err());
    assert!(run(&mut conn, &["add", "--amount", "-5"]).is_err());
    assert!(run(&mut conn, &["add", "--amount", "5", "--applies", "bike"]).is_err());
    assert!(db::load_costs(&conn).unwrap().is_empty());
}

#[test]
fn edit_and_rm_by_id() {
    let mut conn = setup();
    run(&mut conn, &["add", "--date", "2024-03-01", "--category", "Tyres", "--amount", "200", "--applies", "ev"]).unwrap();
    let id = db::load_costs(&conn).unwrap()[0].id.clone();

    run(&mut conn, &["edit", &id, "--applies", "both", "--amount", "180"]).unwrap();
    let c = &db::load_costs(&conn).unwrap()[0];
    assert_eq!(c.applies, AppliesTo::Both);
    assert_eq!(c.amount, Decimal::from(180));
    assert_eq!(c.category, "Tyres");

    assert!(run(&mut conn, &["edit", "nope", "--amount", "1"]).is_err());
    run(&mut conn, &["rm", &id]).unwrap();
    assert!(db::load_costs(&conn).unwrap().is_empty());
    assert!(run(&mut conn, &["rm", &id]).is_err());
}

#[test]
fn list_accepts_filters() {
    let mut conn = setup();
    run(&mut conn, &["add", "--date", "2024-03-01", "--amount", "10", "--applies", "ev"]).unwrap();
    run(&mut conn, &["list", "--all", "--applies", "ev", "--json"]).unwrap();
    run(&mut conn, &["list", "--jsonl"]).unwrap();
    run(&mut conn, &["list"]).unwrap();
    assert!(run(&mut conn, &["list", "--applies", "car"]).is_err());
}
