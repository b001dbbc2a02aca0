// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::engine::arith;
use crate::error::ValidationError;

/// Upper bound for any amount, price, kWh, mileage or efficiency typed in.
pub const MAX_INPUT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Lowest accepted miles/kWh or mpg.
pub const MIN_EFFICIENCY: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Litres in one UK (imperial) gallon.
pub const LITRES_PER_UK_GALLON: Decimal = Decimal::from_parts(454_609, 0, 0, false, 5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ChargeType {
    #[serde(rename = "public")]
    Public,
    #[serde(rename = "public-xp")]
    PublicXp,
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "home-xp")]
    HomeXp,
}

impl ChargeType {
    pub const ALL: [ChargeType; 4] = [
        ChargeType::Public,
        ChargeType::PublicXp,
        ChargeType::Home,
        ChargeType::HomeXp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeType::Public => "public",
            ChargeType::PublicXp => "public-xp",
            ChargeType::Home => "home",
            ChargeType::HomeXp => "home-xp",
        }
    }
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChargeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "public" => Ok(ChargeType::Public),
            "public-xp" => Ok(ChargeType::PublicXp),
            "home" => Ok(ChargeType::Home),
            "home-xp" => Ok(ChargeType::HomeXp),
            _ => Err(ValidationError::ChargeType(s.to_string())),
        }
    }
}

// Stored records may carry display labels ("🏠 Home (XP)") instead of tags.
impl From<String> for ChargeType {
    fn from(s: String) -> Self {
        if let Ok(t) = s.parse() {
            return t;
        }
        let lower = s.to_lowercase();
        let xp = lower.contains("xp");
        match (lower.contains("home"), xp) {
            (true, true) => ChargeType::HomeXp,
            (true, false) => ChargeType::Home,
            (false, true) => ChargeType::PublicXp,
            (false, false) => ChargeType::Public,
        }
    }
}

/// Which vehicle a cost is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AppliesTo {
    Ev,
    Ice,
    Both,
    Other,
}

impl AppliesTo {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppliesTo::Ev => "ev",
            AppliesTo::Ice => "ice",
            AppliesTo::Both => "both",
            AppliesTo::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppliesTo::Ev => "EV",
            AppliesTo::Ice => "ICE",
            AppliesTo::Both => "Both",
            AppliesTo::Other => "Other",
        }
    }
}

impl fmt::Display for AppliesTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppliesTo {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ev" => Ok(AppliesTo::Ev),
            "ice" => Ok(AppliesTo::Ice),
            "both" => Ok(AppliesTo::Both),
            "other" => Ok(AppliesTo::Other),
            _ => Err(ValidationError::Applies(s.to_string())),
        }
    }
}

impl From<String> for AppliesTo {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(AppliesTo::Other)
    }
}

/// Policy for crediting a cost tagged `both`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum BothAllocationMode {
    /// Half to each vehicle.
    #[default]
    Split,
    /// Full amount to each vehicle. Double counts on purpose.
    Double,
}

impl FromStr for BothAllocationMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "split" => Ok(BothAllocationMode::Split),
            "double" => Ok(BothAllocationMode::Double),
            _ => Err(ValidationError::AllocationMode(s.to_string())),
        }
    }
}

impl From<String> for BothAllocationMode {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for BothAllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BothAllocationMode::Split => "split",
            BothAllocationMode::Double => "double",
        })
    }
}

/// Whether logged ICE fuel purchases are reported as their own line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum CompareMode {
    #[default]
    #[serde(rename = "costs-only")]
    CostsOnly,
    #[serde(rename = "full")]
    Full,
}

impl FromStr for CompareMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "costs-only" => Ok(CompareMode::CostsOnly),
            "full" => Ok(CompareMode::Full),
            _ => Err(ValidationError::CompareMode(s.to_string())),
        }
    }
}

impl From<String> for CompareMode {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompareMode::CostsOnly => "costs-only",
            CompareMode::Full => "full",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum PeriodMode {
    #[default]
    #[serde(rename = "this-month")]
    ThisMonth,
    #[serde(rename = "last-month")]
    LastMonth,
    #[serde(rename = "last-30")]
    Last30,
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "all-time")]
    AllTime,
}

impl PeriodMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodMode::ThisMonth => "this-month",
            PeriodMode::LastMonth => "last-month",
            PeriodMode::Last30 => "last-30",
            PeriodMode::Custom => "custom",
            PeriodMode::AllTime => "all-time",
        }
    }
}

impl FromStr for PeriodMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "this-month" => Ok(PeriodMode::ThisMonth),
            "last-month" => Ok(PeriodMode::LastMonth),
            "last-30" => Ok(PeriodMode::Last30),
            "custom" => Ok(PeriodMode::Custom),
            "all-time" => Ok(PeriodMode::AllTime),
            _ => Err(ValidationError::PeriodMode(s.to_string())),
        }
    }
}

impl From<String> for PeriodMode {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub kwh: Decimal,
    #[serde(rename = "type", default = "default_charge_type")]
    pub charge_type: ChargeType,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub note: String,
}

fn default_charge_type() -> ChargeType {
    ChargeType::Public
}

impl ChargingEntry {
    pub fn cost(&self) -> Decimal {
        arith::mul(self.kwh, self.price)
    }

    /// `None` when the stored date is malformed.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    pub id: String,
    pub date: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub note: String,
    pub applies: AppliesTo,
}

impl CostEntry {
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }

    /// Category used for breakdowns; blank categories report as "Other".
    pub fn category_key(&self) -> &str {
        let c = self.category.trim();
        if c.is_empty() { "Other" } else { self.category.as_str() }
    }

    pub fn is_insurance(&self) -> bool {
        self.category.trim().eq_ignore_ascii_case("insurance")
    }

    pub fn is_fuel(&self) -> bool {
        self.category.trim().eq_ignore_ascii_case("fuel")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub from: NaiveDate,
    #[serde(rename = "perLitre", with = "rust_decimal::serde::float")]
    pub per_litre: Decimal,
}

/// Deserializing never fails: see [`Settings::overlay`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Settings {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub public: Decimal,
    #[serde(rename = "public_xp", serialize_with = "rust_decimal::serde::float::serialize")]
    pub public_xp: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub home: Decimal,
    #[serde(rename = "home_xp", serialize_with = "rust_decimal::serde::float::serialize")]
    pub home_xp: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub charger_hardware: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub charger_install: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub ev_miles_per_kwh: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub ice_mpg: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub ice_per_litre: Decimal,
    pub ice_per_litre_history: Vec<PriceRecord>,
    pub both_allocation_mode: BothAllocationMode,
    pub compare_mode: CompareMode,
    pub legacy_applies_default: AppliesTo,
}

impl Settings {
    pub fn default_ev_miles_per_kwh() -> Decimal {
        Decimal::new(28, 1)
    }

    pub fn default_ice_mpg() -> Decimal {
        Decimal::from(45)
    }

    pub fn default_ice_per_litre() -> Decimal {
        Decimal::new(144, 2)
    }

    pub fn default_price(&self, t: ChargeType) -> Decimal {
        match t {
            ChargeType::Public => self.public,
            ChargeType::PublicXp => self.public_xp,
            ChargeType::Home => self.home,
            ChargeType::HomeXp => self.home_xp,
        }
    }

    pub fn set_default_price(&mut self, t: ChargeType, price: Decimal) {
        match t {
            ChargeType::Public => self.public = price,
            ChargeType::PublicXp => self.public_xp = price,
            ChargeType::Home => self.home = price,
            ChargeType::HomeXp => self.home_xp = price,
        }
    }

    /// Copies the fields present in `v` over `base`. A field that is present
    /// but null or of the wrong type falls back to its default value.
    pub fn overlay(base: &Settings, v: &Value) -> Settings {
        let mut out = base.clone();
        let Some(obj) = v.as_object() else {
            tracing::warn!("settings are not an object, keeping current values");
            return out;
        };
        let defaults = Settings::default();

        let number = |key: &str, current: Decimal, default: Decimal| match obj.get(key) {
            None => current,
            Some(v) => json_decimal(v).unwrap_or_else(|| {
                tracing::warn!(key, value = %v, "setting is not a number, using default");
                default
            }),
        };
        out.public = number("public", out.public, defaults.public);
        out.public_xp = number("public_xp", out.public_xp, defaults.public_xp);
        out.home = number("home", out.home, defaults.home);
        out.home_xp = number("home_xp", out.home_xp, defaults.home_xp);
        out.charger_hardware = number("chargerHardware", out.charger_hardware, defaults.charger_hardware);
        out.charger_install = number("chargerInstall", out.charger_install, defaults.charger_install);
        out.ev_miles_per_kwh = number("evMilesPerKwh", out.ev_miles_per_kwh, defaults.ev_miles_per_kwh);
        out.ice_mpg = number("iceMpg", out.ice_mpg, defaults.ice_mpg);
        out.ice_per_litre = number("icePerLitre", out.ice_per_litre, defaults.ice_per_litre);

        if let Some(t) = tag(obj, "bothAllocationMode") {
            out.both_allocation_mode = t.map(BothAllocationMode::from).unwrap_or_default();
        }
        if let Some(t) = tag(obj, "compareMode") {
            out.compare_mode = t.map(CompareMode::from).unwrap_or_default();
        }
        if let Some(t) = tag(obj, "legacyAppliesDefault") {
            out.legacy_applies_default = t.map(AppliesTo::from).unwrap_or(defaults.legacy_applies_default);
        }

        match obj.get("icePerLitreHistory") {
            None => {}
            Some(Value::Array(items)) => {
                out.ice_per_litre_history = items
                    .iter()
                    .filter_map(|item| {
                        let rec = serde_json::from_value::<PriceRecord>(item.clone()).ok();
                        if rec.is_none() {
                            tracing::warn!(record = %item, "skipping malformed fuel price record");
                        }
                        rec
                    })
                    .collect();
            }
            Some(_) => out.ice_per_litre_history = Vec::new(),
        }
        out
    }

    pub fn charger_setup_cost(&self) -> Decimal {
        arith::add(self.charger_hardware, self.charger_install)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            public: Decimal::new(56, 2),
            public_xp: Decimal::new(76, 2),
            home: Decimal::new(9, 2),
            home_xp: Decimal::new(30, 2),
            charger_hardware: Decimal::ZERO,
            charger_install: Decimal::ZERO,
            ev_miles_per_kwh: Self::default_ev_miles_per_kwh(),
            ice_mpg: Self::default_ice_mpg(),
            ice_per_litre: Self::default_ice_per_litre(),
            ice_per_litre_history: Vec::new(),
            both_allocation_mode: BothAllocationMode::Split,
            compare_mode: CompareMode::CostsOnly,
            legacy_applies_default: AppliesTo::Other,
        }
    }
}

impl From<Value> for Settings {
    fn from(v: Value) -> Self {
        Settings::overlay(&Settings::default(), &v)
    }
}

/// `None` when `key` is absent, `Some(None)` when it is present but not a
/// string.
fn tag(obj: &Map<String, Value>, key: &str) -> Option<Option<String>> {
    obj.get(key).map(|v| v.as_str().map(str::to_string))
}

/// A JSON number as a `Decimal`. Strings, null and everything else are
/// rejected.
pub fn json_decimal(v: &Value) -> Option<Decimal> {
    let Value::Number(n) = v else {
        return None;
    };
    let s = n.to_string();
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&s).ok())
}

/// Deserializes a numeric record field, reading null or a non-number as 0.
pub fn lenient_decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(json_decimal).unwrap_or(Decimal::ZERO))
}

/// Persisted period preference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub period_mode: PeriodMode,
    pub period_from: String,
    pub period_to: String,
}

pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
