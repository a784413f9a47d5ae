// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Config, set_setting, unset_setting};
use crate::db::db_path;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            set_setting(conn, key, value)?;
            println!("Setting {} updated", key);
        }
        Some(("unset", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            unset_setting(conn, key)?;
            println!("Setting {} cleared", key);
        }
        _ => show(conn)?,
    }
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let cfg = Config::load(conn)?;
    let rows = vec![
        vec!["database".to_string(), db_path()?.display().to_string()],
        vec!["gemini_api_key".to_string(), cfg.masked_api_key()],
        vec!["gemini_model".to_string(), cfg.model],
        vec!["gemini_api_base".to_string(), cfg.api_base],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
