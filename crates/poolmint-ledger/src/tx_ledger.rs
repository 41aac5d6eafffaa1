//! The Transaction Ledger.
//!
//! Append-only settlement history. Entries are never updated or deleted,
//! and a duplicate entry id is rejected — combined with the deterministic
//! settlement ids from `poolmint-types`, this means one order can only ever
//! be recorded once.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use poolmint_types::{PoolmintError, Result, Transaction, TransactionId, UserId};

fn poisoned<T>(_: PoisonError<T>) -> PoolmintError {
    PoolmintError::Persistence {
        reason: "transaction store lock poisoned".into(),
    }
}

struct Inner {
    entries: Vec<Transaction>,
    seen: HashSet<TransactionId>,
}

/// Cloneable handle to the append-only settlement history.
#[derive(Clone)]
pub struct TransactionLedger {
    inner: Arc<RwLock<Inner>>,
}

impl TransactionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entries: Vec::new(),
                seen: HashSet::new(),
            })),
        }
    }

    /// Append one entry.
    ///
    /// # Errors
    /// Returns `DuplicateTransaction` if an entry with this id was already
    /// appended; the ledger is unchanged.
    pub fn append(&self, tx: Transaction) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        if !inner.seen.insert(tx.id) {
            return Err(PoolmintError::DuplicateTransaction(tx.id));
        }
        inner.entries.push(tx);
        Ok(())
    }

    /// All entries for one user, in append order.
    pub fn entries_for_user(&self, user: UserId) -> Result<Vec<Transaction>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .entries
            .iter()
            .filter(|tx| tx.user_id == user)
            .cloned()
            .collect())
    }

    /// Total number of entries.
    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.read().map_err(poisoned)?.entries.len())
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.inner.read().map_err(poisoned)?.entries.is_empty())
    }
}

impl Default for TransactionLedger {
    fn default() -> Self {
        Self::new()
    }
}
