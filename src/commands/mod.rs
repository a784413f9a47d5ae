// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::db::SlotStorage;
use crate::store::TransactionStore;

pub mod advice;
pub mod backup;
pub mod receipt;
pub mod reports;
pub mod reset;
pub mod settings;
pub mod transactions;

pub fn open_store(conn: &Connection) -> Result<TransactionStore<SlotStorage<'_>>> {
    TransactionStore::open(SlotStorage::new(conn))
}
