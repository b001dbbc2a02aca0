// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::ArgMatches;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::{MAX_INPUT, MIN_EFFICIENCY};

pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ValidationError::Date(s.to_string()))
}

pub fn parse_decimal(field: &'static str, s: &str) -> Result<Decimal, ValidationError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: s.to_string(),
        })
}

pub fn check_max(field: &'static str, d: Decimal) -> Result<Decimal, ValidationError> {
    if d > MAX_INPUT {
        return Err(ValidationError::TooLarge {
            field,
            value: d.to_string(),
            max: MAX_INPUT,
        });
    }
    Ok(d)
}

pub fn parse_positive(field: &'static str, s: &str) -> Result<Decimal, ValidationError> {
    let d = check_max(field, parse_decimal(field, s)?)?;
    if d <= Decimal::ZERO {
        return Err(ValidationError::NotPositive {
            field,
            value: s.to_string(),
        });
    }
    Ok(d)
}

pub fn parse_non_negative(field: &'static str, s: &str) -> Result<Decimal, ValidationError> {
    let d = check_max(field, parse_decimal(field, s)?)?;
    if d < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field,
            value: s.to_string(),
        });
    }
    Ok(d)
}

/// Miles per kWh or miles per gallon.
pub fn parse_efficiency(field: &'static str, s: &str) -> Result<Decimal, ValidationError> {
    let d = parse_positive(field, s)?;
    if d < MIN_EFFICIENCY {
        return Err(ValidationError::TooSmall {
            field,
            value: s.to_string(),
            min: MIN_EFFICIENCY,
        });
    }
    Ok(d)
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Value of an argument clap guarantees to be present.
pub fn required<'a>(m: &'a ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing required argument '{}'", name))
}

pub fn fmt_money(d: &Decimal) -> String {
    let r = d.round_dp(2);
    if r.is_sign_negative() && !r.is_zero() {
        format!("-£{:.2}", r.abs())
    } else {
        format!("£{:.2}", r.abs())
    }
}

pub fn fmt_num(d: &Decimal, dp: u32) -> String {
    format!("{:.*}", dp as usize, d.round_dp(dp))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Prints `v` when `--json` or `--jsonl` is set and reports whether it did.
/// JSON Lines output puts one array element per line.
pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        match serde_json::to_value(v)? {
            serde_json::Value::Array(rows) => {
                for row in &rows {
                    println!("{}", serde_json::to_string(row)?);
                }
            }
            other => println!("{}", serde_json::to_string(&other)?),
        }
        return Ok(true);
    }
    Ok(false)
}

/// `--json` / `--jsonl` flags of a subcommand, false when the subcommand does
/// not define them.
pub fn json_flags(m: &ArgMatches) -> (bool, bool) {
    let flag = |name: &str| {
        m.try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    };
    (flag("json"), flag("jsonl"))
}
