// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::assistant::{Assistant, GeminiClient, NOT_ENOUGH_DATA, request_advice};
use crate::commands::open_store;
use crate::config::Config;
use crate::models::Transaction;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, _m: &clap::ArgMatches) -> Result<()> {
    let records = open_store(conn)?.snapshot();
    if records.is_empty() {
        // nothing to send, so no API key is needed either
        println!("{}", NOT_ENOUGH_DATA);
        return Ok(());
    }
    let client = GeminiClient::from_config(&Config::load(conn)?)?;
    advise_with(&records, &client)?;
    Ok(())
}

/// Print advice for a newest-first snapshot and return it.
pub fn advise_with(records: &[Transaction], assistant: &dyn Assistant) -> Result<String> {
    let advice = request_advice(records, assistant).context("Could not get advice right now")?;
    println!("{}", advice);
    Ok(advice)
}
