// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

use crate::backup::{backup_file_name, read_backup, write_backup, write_backup_to};
use crate::commands::open_store;
use crate::db::SlotStorage;
use crate::store::TransactionStore;
use crate::models::Transaction;
use crate::utils::{confirm, today};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => export(conn, sub),
        Some(("restore", sub)) => restore(conn, sub),
        _ => Ok(()),
    }
}

fn export(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let store = open_store(conn)?;
    let records = store.snapshot();

    let written = match fmt.as_str() {
        "json" => match sub.get_one::<String>("out") {
            Some(out) => {
                let path = PathBuf::from(out.trim());
                write_backup_to(&path, &records)?;
                path
            }
            None => write_backup(&export_dir(sub), today(), &records)?,
        },
        "csv" => {
            let path = match sub.get_one::<String>("out") {
                Some(out) => PathBuf::from(out.trim()),
                None => export_dir(sub).join(backup_file_name(today()).replace(".json", ".csv")),
            };
            write_csv(&path, &records)?;
            path
        }
        _ => return Err(anyhow!("Unknown format: {} (use json|csv)", fmt)),
    };
    println!(
        "Exported {} transactions to {}",
        records.len(),
        written.display()
    );
    Ok(())
}

fn export_dir(sub: &clap::ArgMatches) -> PathBuf {
    sub.get_one::<String>("dir")
        .map(|d| PathBuf::from(d.trim()))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn write_csv(path: &Path, records: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["id", "date", "type", "category", "description", "amount"])?;
    for t in records {
        wtr.write_record([
            t.id.clone(),
            t.date.to_string(),
            t.r#type.to_string(),
            t.category.to_string(),
            t.description.clone(),
            t.amount.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn restore(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = PathBuf::from(sub.get_one::<String>("path").unwrap().trim());
    let records = read_backup(&path)?;
    let prompt = format!(
        "This file holds {} transactions and will overwrite the current data. Continue?",
        records.len()
    );
    if !sub.get_flag("yes") && !confirm(&prompt)? {
        println!("Restore cancelled");
        return Ok(());
    }
    // The current contents are discarded, so a corrupt slot must not block this.
    let mut store = TransactionStore::empty(SlotStorage::new(conn));
    let count = records.len();
    store.replace_all(records);
    tracing::info!(count, path = %path.display(), "restored backup");
    println!("Restored {} transactions from {}", count, path.display());
    Ok(())
}
