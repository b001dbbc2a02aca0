// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod state;
pub mod utils;

use tracing_subscriber::EnvFilter;

/// Logs to stderr, filtered by `EVLOG_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("EVLOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}
