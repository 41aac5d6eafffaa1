//! The Wallet Ledger.
//!
//! Per-user fiat and token balances. Deposits and withdrawals arrive from
//! external approval flows; settlement mutations go through [`crate::unit`]
//! so wallet and supply move together. Neither balance ever goes negative:
//! every debit validates before mutating.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use poolmint_types::{PoolmintError, Result, UserId, Wallet};
use rust_decimal::Decimal;

type WalletMap = HashMap<UserId, Wallet>;

fn poisoned<T>(_: PoisonError<T>) -> PoolmintError {
    PoolmintError::Persistence {
        reason: "wallet store lock poisoned".into(),
    }
}

/// Cloneable handle to the per-user balance store.
#[derive(Clone)]
pub struct WalletLedger {
    wallets: Arc<RwLock<WalletMap>>,
    /// The system-owned wallet that accumulates fee revenue.
    admin: UserId,
}

impl WalletLedger {
    /// Create an empty ledger with the given admin wallet.
    #[must_use]
    pub fn new(admin: UserId) -> Self {
        Self {
            wallets: Arc::new(RwLock::new(HashMap::new())),
            admin,
        }
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, WalletMap>> {
        self.wallets.read().map_err(poisoned)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, WalletMap>> {
        self.wallets.write().map_err(poisoned)
    }

    /// The admin wallet's user id.
    #[must_use]
    pub fn admin_user_id(&self) -> UserId {
        self.admin
    }

    /// Credit fiat to a wallet, creating it on first use. Called by the
    /// external deposit approval flow.
    pub fn deposit_fiat(&self, user: UserId, amount: Decimal) -> Result<()> {
        let mut wallets = self.write()?;
        let wallet = wallets.entry(user).or_insert_with(|| Wallet::new(user));
        wallet.fiat_balance += amount;
        Ok(())
    }

    /// Debit fiat from a wallet. Called by the external withdrawal approval
    /// flow.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the wallet cannot cover `amount`;
    /// the wallet is unchanged.
    pub fn withdraw_fiat(&self, user: UserId, amount: Decimal) -> Result<()> {
        let mut wallets = self.write()?;
        let wallet = wallets
            .get_mut(&user)
            .ok_or(PoolmintError::InsufficientBalance {
                needed: amount,
                available: Decimal::ZERO,
            })?;
        if wallet.fiat_balance < amount {
            return Err(PoolmintError::InsufficientBalance {
                needed: amount,
                available: wallet.fiat_balance,
            });
        }
        wallet.fiat_balance -= amount;
        Ok(())
    }

    /// Atomically add `amount` to the admin wallet's fiat balance.
    ///
    /// Invoked at most once per settlement by the fee-charging flows; this
    /// performs no deduplication itself.
    pub fn credit_fee_to_admin(&self, amount: Decimal) -> Result<()> {
        let mut wallets = self.write()?;
        let wallet = wallets
            .entry(self.admin)
            .or_insert_with(|| Wallet::new(self.admin));
        wallet.fiat_balance += amount;
        Ok(())
    }

    /// Snapshot a user's wallet. Unknown users read as an empty wallet.
    pub fn wallet(&self, user: UserId) -> Result<Wallet> {
        let wallets = self.read()?;
        Ok(wallets.get(&user).cloned().unwrap_or_else(|| Wallet::new(user)))
    }

    /// Sum of all wallet token balances. Used by the supply consistency
    /// audit to recompute the distributed supply independently.
    pub fn total_token_balance(&self) -> Result<Decimal> {
        let wallets = self.read()?;
        Ok(wallets.values().map(|w| w.token_balance).sum())
    }
}
