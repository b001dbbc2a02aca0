// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::db;
use crate::state::{restore_onto, to_json};
use crate::utils::required;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => {
            let out = required(sub, "out")?;
            let state = db::load_state(conn)?;
            std::fs::write(out, to_json(&state)?)
                .with_context(|| format!("Write backup to {}", out))?;
            tracing::info!(out, "backup written");
            println!(
                "Backed up {} charging sessions and {} costs to {}",
                state.entries.len(),
                state.costs.len(),
                out
            );
        }
        Some(("import", sub)) => {
            let file = required(sub, "file")?;
            let raw = std::fs::read_to_string(file)
                .with_context(|| format!("Read backup from {}", file))?;
            // Nothing is replaced unless the document has a valid shape.
            let current = db::load_settings(conn)?;
            let state = restore_onto(&raw, &current)?;
            db::save_state(conn, &state)?;
            tracing::info!(
                file,
                entries = state.entries.len(),
                costs = state.costs.len(),
                "backup restored"
            );
            println!(
                "Restored {} charging sessions and {} costs from {}",
                state.entries.len(),
                state.costs.len(),
                file
            );
        }
        _ => {}
    }
    Ok(())
}
