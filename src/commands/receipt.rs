// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use crate::assistant::{Assistant, GeminiClient, draft_from_receipt, mime_for_path};
use crate::commands::open_store;
use crate::config::Config;
use crate::models::Transaction;
use crate::utils::{fmt_money, today};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let client = GeminiClient::from_config(&Config::load(conn)?)?;
    scan(conn, &client, m)?;
    Ok(())
}

/// Read the receipt image and, unless `--dry-run`, record it. Returns the
/// stored transaction. Nothing is stored if reading fails.
pub fn scan(
    conn: &Connection,
    assistant: &dyn Assistant,
    m: &clap::ArgMatches,
) -> Result<Option<Transaction>> {
    let path = PathBuf::from(m.get_one::<String>("image").unwrap().trim());
    let image =
        std::fs::read(&path).with_context(|| format!("Read image {}", path.display()))?;
    let draft = draft_from_receipt(assistant, &image, mime_for_path(&path), today())
        .context("Receipt could not be analyzed, please enter it manually")?;

    if m.get_flag("dry_run") {
        if m.get_flag("json") {
            println!(
                "{}",
                serde_json::json!({
                    "amount": draft.amount,
                    "description": draft.description,
                    "category": draft.category,
                    "date": draft.date,
                    "type": draft.r#type,
                })
            );
        } else {
            println!(
                "Read {} on {} for '{}' ({}); not recorded",
                fmt_money(&draft.amount),
                draft.date,
                draft.description,
                draft.category
            );
        }
        return Ok(None);
    }

    let mut store = open_store(conn)?;
    let tx = store.add(draft);
    if m.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&tx)?);
    } else {
        println!(
            "Recorded expense {} on {} for '{}' ({}) id={}",
            fmt_money(&tx.amount),
            tx.date,
            tx.description,
            tx.category,
            tx.id
        );
    }
    Ok(Some(tx))
}
