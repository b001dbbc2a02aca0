// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejected user input. Raised before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),
    #[error("Invalid {field} '{value}', expected a number")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: String },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: String },
    #[error("{field} must be at most {max} (got {value})")]
    TooLarge {
        field: &'static str,
        value: String,
        max: Decimal,
    },
    #[error("{field} must be at least {min} (got {value})")]
    TooSmall {
        field: &'static str,
        value: String,
        min: Decimal,
    },
    #[error("Unknown charge type '{0}' (use public|public-xp|home|home-xp)")]
    ChargeType(String),
    #[error("Unknown applies tag '{0}' (use ev|ice|both|other)")]
    Applies(String),
    #[error("Unknown period mode '{0}' (use this-month|last-month|last-30|custom|all-time)")]
    PeriodMode(String),
    #[error("Unknown allocation mode '{0}' (use split|double)")]
    AllocationMode(String),
    #[error("Unknown compare mode '{0}' (use costs-only|full)")]
    CompareMode(String),
    #[error("Custom period needs both --from and --to")]
    IncompletePeriod,
}

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Invalid backup JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid backup format: top level must be an object")]
    NotAnObject,
    #[error("Invalid backup format: 'entries' must be an array")]
    EntriesNotArray,
    #[error("Invalid backup format: 'costs' must be an array")]
    CostsNotArray,
    #[error("Invalid backup format: 'settings' is missing")]
    MissingSettings,
    #[error("Invalid backup record {kind}[{index}]: {source}")]
    Record {
        kind: &'static str,
        index: usize,
        source: serde_json::Error,
    },
}
