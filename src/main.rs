// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;

use evlog::{cli, commands, db};

fn main() -> Result<()> {
    evlog::init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_override = matches.get_one::<String>("db").map(PathBuf::from);
    let mut conn = db::open_or_init(db_override.as_deref())?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Database initialized at {}",
                db::db_path(db_override.as_deref())?.display()
            );
        }
        Some(("charge", sub)) => commands::charge::handle(&mut conn, sub)?,
        Some(("cost", sub)) => commands::costs::handle(&mut conn, sub)?,
        Some(("period", sub)) => commands::period::handle(&mut conn, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&mut conn, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&conn, sub)?,
        Some(("compare", sub)) => commands::compare::handle(&conn, sub)?,
        Some(("chart", sub)) => commands::chart::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("backup", sub)) => commands::backup::handle(&mut conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
