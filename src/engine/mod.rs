// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregation over charging entries, cost entries and settings.
//!
//! Nothing in here touches storage or the clock: callers pass the
//! collections, the settings and (where relevant) today's date, and every
//! call re-scans its inputs in full.

pub mod allocation;
pub mod arith;
pub mod energy;
pub mod fuel;
pub mod period;
pub mod series;
pub mod summary;
pub mod totals;
