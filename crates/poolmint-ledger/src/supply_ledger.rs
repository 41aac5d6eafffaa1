//! The Supply Ledger.
//!
//! Holds the persisted [`TokenSupply`] counters, created once at system
//! initialization. Settlement-time mutations go through [`crate::unit`];
//! this module provides snapshot reads and the independent consistency
//! audit.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use poolmint_types::{PoolmintError, Result, SupplyAudit, TokenSupply};
use rust_decimal::Decimal;

use crate::wallet_ledger::WalletLedger;

fn poisoned<T>(_: PoisonError<T>) -> PoolmintError {
    PoolmintError::Persistence {
        reason: "supply store lock poisoned".into(),
    }
}

/// Cloneable handle to the supply pool counters.
#[derive(Clone)]
pub struct SupplyLedger {
    supply: Arc<RwLock<TokenSupply>>,
}

impl SupplyLedger {
    /// Initialize the pool at genesis: nothing distributed yet.
    #[must_use]
    pub fn genesis(total_supply: Decimal, admin_reserve: Decimal) -> Self {
        Self {
            supply: Arc::new(RwLock::new(TokenSupply::genesis(
                total_supply,
                admin_reserve,
            ))),
        }
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, TokenSupply>> {
        self.supply.read().map_err(poisoned)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, TokenSupply>> {
        self.supply.write().map_err(poisoned)
    }

    /// Snapshot the current counters.
    pub fn snapshot(&self) -> Result<TokenSupply> {
        Ok(self.read()?.clone())
    }

    /// Independently recompute the distributed supply by summing wallet
    /// token balances and compare it against the persisted counter.
    ///
    /// A divergence flags `is_valid = false` with the discrepancy. This is
    /// a consistency check only — it never repairs the counters.
    pub fn validate(&self, wallets: &WalletLedger) -> Result<SupplyAudit> {
        let recomputed = wallets.total_token_balance()?;
        let supply = self.read()?;
        let discrepancy = recomputed - supply.distributed_supply;
        Ok(SupplyAudit {
            is_valid: discrepancy.is_zero(),
            total_supply: supply.total_supply,
            distributed_supply: recomputed,
            remaining_supply: supply.user_supply_remaining,
            discrepancy,
        })
    }
}
