// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::fuel::normalize_history;
use crate::models::{ChargeType, ChargingEntry, CostEntry, PriceRecord, Settings, UiState};
use crate::state::AppState;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Evlog", "evlog"));

pub fn db_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = override_path {
        return Ok(p.to_path_buf());
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("evlog.sqlite"))
}

pub fn open_or_init(override_path: Option<&Path>) -> Result<Connection> {
    let path = db_path(override_path)?;
    let conn = Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS entries(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        kwh TEXT NOT NULL,
        type TEXT NOT NULL,
        price TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT ''
    );
    CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);

    CREATE TABLE IF NOT EXISTS costs(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT '',
        amount TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT '',
        applies TEXT NOT NULL CHECK(applies IN ('ev','ice','both','other'))
    );
    CREATE INDEX IF NOT EXISTS idx_costs_date ON costs(date);

    -- ICE fuel price per litre, effective from from_date onwards
    CREATE TABLE IF NOT EXISTS fuel_prices(
        from_date TEXT PRIMARY KEY,
        per_litre TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

fn parse_stored_decimal(table: &str, id: &str, field: &str, raw: &str) -> Option<Decimal> {
    match raw.parse::<Decimal>() {
        Ok(d) => Some(d),
        Err(err) => {
            tracing::warn!(table, id, field, raw, %err, "skipping row with malformed number");
            None
        }
    }
}

fn get_blob(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

fn put_blob(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Reads a JSON blob, falling back to the default when it is absent or corrupt.
fn load_blob<T: serde::de::DeserializeOwned + Default>(conn: &Connection, key: &str) -> Result<T> {
    let Some(raw) = get_blob(conn, key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(v) => Ok(v),
        Err(err) => {
            tracing::warn!(key, %err, "stored blob is corrupt, using defaults");
            Ok(T::default())
        }
    }
}

pub fn load_entries(conn: &Connection) -> Result<Vec<ChargingEntry>> {
    let mut stmt =
        conn.prepare("SELECT id, date, kwh, type, price, note FROM entries ORDER BY date, id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, date, kwh_s, typ, price_s, note) = row?;
        let (Some(kwh), Some(price)) = (
            parse_stored_decimal("entries", &id, "kwh", &kwh_s),
            parse_stored_decimal("entries", &id, "price", &price_s),
        ) else {
            continue;
        };
        out.push(ChargingEntry {
            id,
            date,
            kwh,
            charge_type: ChargeType::from(typ),
            price,
            note,
        });
    }
    Ok(out)
}

pub fn load_costs(conn: &Connection) -> Result<Vec<CostEntry>> {
    let mut stmt = conn
        .prepare("SELECT id, date, category, amount, note, applies FROM costs ORDER BY date, id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, date, category, amount_s, note, applies) = row?;
        let Some(amount) = parse_stored_decimal("costs", &id, "amount", &amount_s) else {
            continue;
        };
        out.push(CostEntry {
            id,
            date,
            category,
            amount,
            note,
            applies: applies.into(),
        });
    }
    Ok(out)
}

fn load_fuel_prices(conn: &Connection) -> Result<Vec<PriceRecord>> {
    let mut stmt = conn.prepare("SELECT from_date, per_litre FROM fuel_prices ORDER BY from_date")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        let (from_s, per_s) = row?;
        let Some(from) = crate::models::parse_day(&from_s) else {
            tracing::warn!(from = %from_s, "skipping fuel price with malformed date");
            continue;
        };
        let Some(per_litre) = parse_stored_decimal("fuel_prices", &from_s, "per_litre", &per_s)
        else {
            continue;
        };
        out.push(PriceRecord { from, per_litre });
    }
    normalize_history(&mut out);
    Ok(out)
}

pub fn load_settings(conn: &Connection) -> Result<Settings> {
    let mut settings: Settings = load_blob(conn, "settings")?;
    settings.ice_per_litre_history = load_fuel_prices(conn)?;
    Ok(settings)
}

pub fn load_ui(conn: &Connection) -> Result<UiState> {
    load_blob(conn, "ui")
}

pub fn load_state(conn: &Connection) -> Result<AppState> {
    Ok(AppState {
        entries: load_entries(conn)?,
        costs: load_costs(conn)?,
        settings: load_settings(conn)?,
        ui: load_ui(conn)?,
    })
}

/// Deletes the rows of `table` whose id is in `before` but not in `after`.
/// Rows that never loaded are not in `before` and so are left alone.
fn delete_missing(conn: &Connection, table: &str, before: &[String], after: &HashSet<&str>) -> Result<()> {
    let mut stmt = conn.prepare_cached(&format!("DELETE FROM {} WHERE id=?1", table))?;
    for id in before.iter().filter(|id| !after.contains(id.as_str())) {
        stmt.execute(params![id])?;
    }
    Ok(())
}

fn upsert_entries(conn: &Connection, entries: &[ChargingEntry]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO entries(id, date, kwh, type, price, note) VALUES (?1,?2,?3,?4,?5,?6)
         ON CONFLICT(id) DO UPDATE SET date=excluded.date, kwh=excluded.kwh, type=excluded.type,
             price=excluded.price, note=excluded.note",
    )?;
    for e in entries {
        stmt.execute(params![
            e.id,
            e.date,
            e.kwh.to_string(),
            e.charge_type.as_str(),
            e.price.to_string(),
            e.note
        ])?;
    }
    Ok(())
}

fn upsert_costs(conn: &Connection, costs: &[CostEntry]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO costs(id, date, category, amount, note, applies) VALUES (?1,?2,?3,?4,?5,?6)
         ON CONFLICT(id) DO UPDATE SET date=excluded.date, category=excluded.category,
             amount=excluded.amount, note=excluded.note, applies=excluded.applies",
    )?;
    for c in costs {
        stmt.execute(params![
            c.id,
            c.date,
            c.category,
            c.amount.to_string(),
            c.note,
            c.applies.as_str()
        ])?;
    }
    Ok(())
}

fn write_settings(conn: &Connection, settings: &Settings) -> Result<()> {
    conn.execute("DELETE FROM fuel_prices", [])?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO fuel_prices(from_date, per_litre) VALUES (?1, ?2)
         ON CONFLICT(from_date) DO UPDATE SET per_litre=excluded.per_litre",
    )?;
    for r in &settings.ice_per_litre_history {
        stmt.execute(params![r.from.to_string(), r.per_litre.to_string()])?;
    }
    // History lives in its own table.
    let blob = Settings {
        ice_per_litre_history: Vec::new(),
        ..settings.clone()
    };
    put_blob(conn, "settings", &serde_json::to_string(&blob)?)
}

fn write_ui(conn: &Connection, ui: &UiState) -> Result<()> {
    put_blob(conn, "ui", &serde_json::to_string(ui)?)
}

/// Makes the readable entries match `entries`: missing ids are deleted, the
/// rest are inserted or updated. Rows that failed to load are kept so
/// `doctor` can still report them.
pub fn save_entries(conn: &mut Connection, entries: &[ChargingEntry]) -> Result<()> {
    let tx = conn.transaction()?;
    let before: Vec<String> = load_entries(&tx)?.into_iter().map(|e| e.id).collect();
    let after: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    delete_missing(&tx, "entries", &before, &after)?;
    upsert_entries(&tx, entries)?;
    tx.commit()?;
    Ok(())
}

/// Same contract as [`save_entries`].
pub fn save_costs(conn: &mut Connection, costs: &[CostEntry]) -> Result<()> {
    let tx = conn.transaction()?;
    let before: Vec<String> = load_costs(&tx)?.into_iter().map(|c| c.id).collect();
    let after: HashSet<&str> = costs.iter().map(|c| c.id.as_str()).collect();
    delete_missing(&tx, "costs", &before, &after)?;
    upsert_costs(&tx, costs)?;
    tx.commit()?;
    Ok(())
}

pub fn save_settings(conn: &mut Connection, settings: &Settings) -> Result<()> {
    let tx = conn.transaction()?;
    write_settings(&tx, settings)?;
    tx.commit()?;
    Ok(())
}

pub fn save_ui(conn: &Connection, ui: &UiState) -> Result<()> {
    write_ui(conn, ui)
}

/// Replaces everything stored with `state` in one transaction, unreadable
/// rows included.
pub fn save_state(conn: &mut Connection, state: &AppState) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM entries", [])?;
    upsert_entries(&tx, &state.entries)?;
    tx.execute("DELETE FROM costs", [])?;
    upsert_costs(&tx, &state.costs)?;
    write_settings(&tx, &state.settings)?;
    write_ui(&tx, &state.ui)?;
    tx.commit()?;
    Ok(())
}
