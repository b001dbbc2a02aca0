// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The whole tracker state as one document, plus the pure operations that
//! mutate it. Backups use this exact shape:
//! `{ "entries": [...], "costs": [...], "settings": {...}, "ui": {...} }`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::engine::fuel::normalize_history;
use crate::error::{BackupError, ValidationError};
use crate::utils::check_max;
use crate::models::{
    AppliesTo, ChargeType, ChargingEntry, CostEntry, Settings, UiState, lenient_decimal, parse_day,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub entries: Vec<ChargingEntry>,
    pub costs: Vec<CostEntry>,
    pub settings: Settings,
    pub ui: UiState,
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub trait Keyed {
    fn id(&self) -> &str;
}

impl Keyed for ChargingEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyed for CostEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn find<'a, T: Keyed>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|it| it.id() == id)
}

/// New collection with the item sharing `replacement`'s id swapped out, or
/// `None` when no such item exists.
pub fn replace<T: Keyed + Clone>(items: &[T], replacement: T) -> Option<Vec<T>> {
    let pos = items.iter().position(|it| it.id() == replacement.id())?;
    let mut out = items.to_vec();
    out[pos] = replacement;
    Some(out)
}

/// New collection without `id`, or `None` when it is not present.
pub fn remove<T: Keyed + Clone>(items: &[T], id: &str) -> Option<Vec<T>> {
    find(items, id)?;
    Some(items.iter().filter(|it| it.id() != id).cloned().collect())
}

pub fn validate_entry(e: &ChargingEntry) -> Result<(), ValidationError> {
    if parse_day(&e.date).is_none() {
        return Err(ValidationError::Date(e.date.clone()));
    }
    if e.kwh <= Decimal::ZERO {
        return Err(ValidationError::NotPositive {
            field: "kwh",
            value: e.kwh.to_string(),
        });
    }
    if e.price < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: "price",
            value: e.price.to_string(),
        });
    }
    check_max("kwh", e.kwh)?;
    check_max("price", e.price)?;
    Ok(())
}

pub fn validate_cost(c: &CostEntry) -> Result<(), ValidationError> {
    if parse_day(&c.date).is_none() {
        return Err(ValidationError::Date(c.date.clone()));
    }
    if c.amount <= Decimal::ZERO {
        return Err(ValidationError::NotPositive {
            field: "amount",
            value: c.amount.to_string(),
        });
    }
    check_max("amount", c.amount)?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    kwh: Decimal,
    #[serde(rename = "type", default)]
    charge_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    price: Decimal,
    #[serde(default)]
    note: Option<String>,
}

// Older records carry `cat` instead of `category` and a two-way `target`.
#[derive(Debug, Deserialize)]
struct RawCost {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, alias = "cat")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    amount: Decimal,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    applies: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

fn id_or_new(id: Option<Value>) -> String {
    match id {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        // Timestamp ids from older versions.
        Some(Value::Number(n)) => n.to_string(),
        _ => new_id(),
    }
}

impl RawEntry {
    fn into_entry(self) -> ChargingEntry {
        ChargingEntry {
            id: id_or_new(self.id),
            date: self.date.unwrap_or_default(),
            kwh: self.kwh,
            charge_type: self
                .charge_type
                .map(ChargeType::from)
                .unwrap_or(ChargeType::Public),
            price: self.price,
            note: self.note.unwrap_or_default(),
        }
    }
}

/// Picks the 4-way tag for a stored cost: `applies` wins, then the legacy
/// `target`, then `legacy_default`.
pub fn resolve_applies(
    applies: Option<&str>,
    target: Option<&str>,
    legacy_default: AppliesTo,
) -> AppliesTo {
    let pick = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    match (pick(applies), pick(target)) {
        (Some(a), _) => AppliesTo::from(a),
        (None, Some(t)) => AppliesTo::from(t),
        (None, None) => legacy_default,
    }
}

impl RawCost {
    fn into_cost(self, legacy_default: AppliesTo) -> CostEntry {
        let applies = resolve_applies(
            self.applies.as_deref(),
            self.target.as_deref(),
            legacy_default,
        );
        CostEntry {
            id: id_or_new(self.id),
            date: self.date.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            amount: self.amount,
            note: self.note.unwrap_or_default(),
            applies,
        }
    }
}

fn records(v: &Value) -> impl Iterator<Item = (usize, &Value)> {
    v.as_array().into_iter().flatten().enumerate()
}

/// Parses a backup document over default settings. See [`restore_onto`].
pub fn restore(raw: &str) -> Result<AppState, BackupError> {
    restore_onto(raw, &Settings::default())
}

/// Parses a backup document. `entries` must be an array and `settings` must
/// be present; `costs` and `ui` are optional. Backup settings are laid over
/// `current`: absent fields keep their current value and malformed ones fall
/// back to defaults. Null or non-numeric record amounts read as 0.
pub fn restore_onto(raw: &str, current: &Settings) -> Result<AppState, BackupError> {
    let doc: Value = serde_json::from_str(raw)?;
    let obj = doc.as_object().ok_or(BackupError::NotAnObject)?;

    let entries_v = obj
        .get("entries")
        .filter(|v| v.is_array())
        .ok_or(BackupError::EntriesNotArray)?;
    let settings_v = obj
        .get("settings")
        .filter(|v| v.is_object())
        .ok_or(BackupError::MissingSettings)?;

    let mut settings = Settings::overlay(current, settings_v);
    normalize_history(&mut settings.ice_per_litre_history);

    let mut entries = Vec::new();
    for (index, item) in records(entries_v) {
        let raw: RawEntry = serde_json::from_value(item.clone()).map_err(|source| {
            BackupError::Record {
                kind: "entries",
                index,
                source,
            }
        })?;
        entries.push(raw.into_entry());
    }

    let mut costs = Vec::new();
    match obj.get("costs") {
        None | Some(Value::Null) => {}
        Some(v) if v.is_array() => {
            for (index, item) in records(v) {
                let raw: RawCost = serde_json::from_value(item.clone()).map_err(|source| {
                    BackupError::Record {
                        kind: "costs",
                        index,
                        source,
                    }
                })?;
                costs.push(raw.into_cost(settings.legacy_applies_default));
            }
        }
        Some(_) => return Err(BackupError::CostsNotArray),
    }

    let ui = obj
        .get("ui")
        .and_then(|u| serde_json::from_value::<UiState>(u.clone()).ok())
        .unwrap_or_default();

    Ok(AppState {
        entries,
        costs,
        settings,
        ui,
    })
}

pub fn to_json(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state)
}
