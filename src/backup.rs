// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Backup files and the gate that restores must pass.
//!
//! A backup is the persisted collection written as pretty-printed JSON.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::RestoreError;
use crate::models::{MAX_AMOUNT, Transaction};

/// Structural check on an untrusted payload: it must be an array, and if it
/// has any elements the first one must carry `id` and `amount`.
pub fn validate_backup(payload: &Value) -> Result<(), RestoreError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Null => return Err(RestoreError::NotAnArray("null")),
        Value::Bool(_) => return Err(RestoreError::NotAnArray("a boolean")),
        Value::Number(_) => return Err(RestoreError::NotAnArray("a number")),
        Value::String(_) => return Err(RestoreError::NotAnArray("a string")),
        Value::Object(_) => return Err(RestoreError::NotAnArray("an object")),
    };
    if let Some(first) = items.first() {
        for field in ["id", "amount"] {
            if first.get(field).is_none() {
                return Err(RestoreError::MissingField(field));
            }
        }
    }
    Ok(())
}

/// Parse a backup into records. Runs [`validate_backup`] first, then decodes
/// every element. Amounts must stay within [`MAX_AMOUNT`] and ids must be
/// unique; any failure rejects the whole payload.
pub fn parse_backup(text: &str) -> Result<Vec<Transaction>, RestoreError> {
    let payload: Value = serde_json::from_str(text)?;
    validate_backup(&payload)?;
    let Value::Array(items) = payload else {
        return Err(RestoreError::NotAnArray("a non-array value"));
    };
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let t: Transaction =
            serde_json::from_value(item).map_err(|e| RestoreError::InvalidRecord {
                index,
                reason: e.to_string(),
            })?;
        if t.amount.abs() > MAX_AMOUNT {
            return Err(RestoreError::AmountOutOfRange {
                index,
                amount: t.amount,
            });
        }
        if !seen.insert(t.id.clone()) {
            return Err(RestoreError::DuplicateId { index, id: t.id });
        }
        records.push(t);
    }
    Ok(records)
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("smartbudget-backup-{}.json", date.format("%Y-%m-%d"))
}

pub fn to_backup_json(records: &[Transaction]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write a backup into `dir` named after `date`. Returns the file written.
pub fn write_backup(dir: &Path, date: NaiveDate, records: &[Transaction]) -> Result<PathBuf> {
    let path = dir.join(backup_file_name(date));
    write_backup_to(&path, records)?;
    Ok(path)
}

pub fn write_backup_to(path: &Path, records: &[Transaction]) -> Result<()> {
    let body = to_backup_json(records)?;
    std::fs::write(path, body).with_context(|| format!("Write backup {}", path.display()))?;
    tracing::info!(path = %path.display(), count = records.len(), "backup written");
    Ok(())
}

pub fn read_backup(path: &Path) -> Result<Vec<Transaction>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Read backup {}", path.display()))?;
    let records =
        parse_backup(&text).with_context(|| format!("Invalid backup file {}", path.display()))?;
    Ok(records)
}
