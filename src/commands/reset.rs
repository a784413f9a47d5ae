// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SlotStorage;
use crate::store::TransactionStore;
use crate::utils::confirm;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if !m.get_flag("yes")
        && !confirm("ALL transactions will be deleted. This cannot be undone. Are you sure?")?
    {
        println!("Reset cancelled");
        return Ok(());
    }
    let mut store = TransactionStore::empty(SlotStorage::new(conn));
    store.clear();
    println!("All transactions deleted");
    Ok(())
}
