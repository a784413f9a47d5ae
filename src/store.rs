// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The authoritative list of transactions, newest first.
//!
//! Every mutation builds a fresh collection and swaps it in, so snapshots
//! handed out earlier are never touched. After each change the new state is
//! passed to the [`Storage`] collaborator; a failed save is logged and
//! otherwise ignored.

use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::models::{Transaction, TransactionDraft};

/// Where the store persists itself.
pub trait Storage {
    fn load(&self) -> Result<Vec<Transaction>>;
    fn save(&self, records: &[Transaction]) -> Result<()>;
}

pub struct TransactionStore<S: Storage> {
    records: Arc<[Transaction]>,
    storage: S,
}

impl<S: Storage> TransactionStore<S> {
    /// Load the persisted collection. Unlike saves, a failed load is an error:
    /// starting empty would overwrite the user's data on the next mutation.
    pub fn open(storage: S) -> Result<Self> {
        let records = storage.load()?;
        tracing::debug!(count = records.len(), "loaded transactions");
        Ok(TransactionStore {
            records: records.into(),
            storage,
        })
    }

    /// An empty store that has not read anything from `storage`.
    pub fn empty(storage: S) -> Self {
        TransactionStore {
            records: Arc::from(Vec::new()),
            storage,
        }
    }

    pub fn snapshot(&self) -> Arc<[Transaction]> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.records.iter().find(|t| t.id == id)
    }

    /// Prepend a new record with a fresh id. The draft is taken as-is.
    pub fn add(&mut self, draft: TransactionDraft) -> Transaction {
        let tx = Transaction::from_draft(self.fresh_id(), draft);
        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(tx.clone());
        next.extend(self.records.iter().cloned());
        tracing::debug!(id = %tx.id, "added transaction");
        self.commit(next);
        tx
    }

    /// Remove the record with `id`. Returns whether anything was removed;
    /// an unknown id leaves the store exactly as it was.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            tracing::debug!(id, "delete of unknown id ignored");
            return false;
        }
        let next: Vec<Transaction> = self.records.iter().filter(|t| t.id != id).cloned().collect();
        tracing::debug!(id, "deleted transaction");
        self.commit(next);
        true
    }

    /// Swap in a whole collection, in the order given. Callers validate first.
    pub fn replace_all(&mut self, records: Vec<Transaction>) {
        tracing::debug!(count = records.len(), "replacing all transactions");
        self.commit(records);
    }

    pub fn clear(&mut self) {
        tracing::debug!("clearing all transactions");
        self.commit(Vec::new());
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self, next: Vec<Transaction>) {
        self.records = next.into();
        if let Err(err) = self.storage.save(&self.records) {
            tracing::warn!(error = %err, "failed to persist transactions");
        }
    }
}
