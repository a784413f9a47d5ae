// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! On-device storage: a single SQLite file holding named slots. The
//! transaction list lives in one slot as a JSON array; settings use the rest.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::PathBuf;

use crate::models::Transaction;
use crate::store::Storage;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.smartbudget", "SmartBudget", "smartbudget"));

pub const TRANSACTIONS_SLOT: &str = "transactions";
pub const DB_PATH_ENV: &str = "SMARTBUDGET_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_PATH_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p.trim()));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("smartbudget.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS slots(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

pub fn get_slot(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM slots WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_slot(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO slots(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove_slot(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM slots WHERE key=?1", params![key])?;
    Ok(())
}

/// [`Storage`] backed by the `transactions` slot.
pub struct SlotStorage<'a> {
    conn: &'a Connection,
}

impl<'a> SlotStorage<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SlotStorage { conn }
    }
}

impl Storage for SlotStorage<'_> {
    fn load(&self) -> Result<Vec<Transaction>> {
        match get_slot(self.conn, TRANSACTIONS_SLOT)? {
            Some(json) => serde_json::from_str(&json)
                .context("Stored transactions are corrupt; restore a backup or run `smartbudget reset`"),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        set_slot(self.conn, TRANSACTIONS_SLOT, &json)
    }
}
