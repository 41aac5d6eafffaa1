//! Supply pool counters and the derived token valuation.
//!
//! [`TokenSupply`] is created once at system initialization and mutated only
//! inside settlement units. [`TokenValue`] is computed on demand from the
//! supply counters and never stored as authoritative state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persisted counters for the finite token supply pool.
///
/// Invariant: `distributed_supply + user_supply_remaining + admin_reserve
/// == total_supply`, and `user_supply_remaining` never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenSupply {
    /// Total tokens that will ever exist.
    pub total_supply: Decimal,
    /// Tokens issued to user wallets so far.
    pub distributed_supply: Decimal,
    /// Tokens still available for BUY settlements.
    pub user_supply_remaining: Decimal,
    /// System-owned reserve, never issued through the matching engine.
    pub admin_reserve: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl TokenSupply {
    /// Genesis supply: the full user pool is unissued.
    #[must_use]
    pub fn genesis(total_supply: Decimal, admin_reserve: Decimal) -> Self {
        Self {
            total_supply,
            distributed_supply: Decimal::ZERO,
            user_supply_remaining: total_supply - admin_reserve,
            admin_reserve,
            updated_at: Utc::now(),
        }
    }

    /// Fraction of the total supply already issued, in `[0, 1]`.
    #[must_use]
    pub fn usage_percentage(&self) -> Decimal {
        if self.total_supply.is_zero() {
            Decimal::ZERO
        } else {
            self.distributed_supply / self.total_supply
        }
    }

    /// Whether the counters sum back to the total.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.distributed_supply + self.user_supply_remaining + self.admin_reserve
            == self.total_supply
    }

    /// Issue `tokens` from the user pool. Invoked exactly once per
    /// successful BUY settlement, inside the same atomic unit as the wallet
    /// credit.
    ///
    /// # Errors
    /// Returns [`crate::PoolmintError::SupplyExhausted`] if the pool cannot
    /// cover the request; the counters are left unchanged.
    pub fn deduct(&mut self, tokens: Decimal) -> crate::Result<()> {
        if self.user_supply_remaining < tokens {
            return Err(crate::PoolmintError::SupplyExhausted {
                requested: tokens,
                remaining: self.user_supply_remaining,
            });
        }
        self.user_supply_remaining -= tokens;
        self.distributed_supply += tokens;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Return `tokens` to the user pool. Invoked once per successful SELL
    /// settlement, inside the same atomic unit as the wallet debit
    /// (restore-on-sell supply policy).
    ///
    /// # Errors
    /// Returns [`crate::PoolmintError::SupplyInvariantViolation`] if the
    /// restore would exceed the distributed counter.
    pub fn restore(&mut self, tokens: Decimal) -> crate::Result<()> {
        if self.distributed_supply < tokens {
            return Err(crate::PoolmintError::SupplyInvariantViolation {
                reason: format!(
                    "restore of {tokens} exceeds distributed supply {}",
                    self.distributed_supply
                ),
            });
        }
        self.distributed_supply -= tokens;
        self.user_supply_remaining += tokens;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Derived valuation of the token at one instant. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenValue {
    pub base_value: Decimal,
    pub inflation_factor: Decimal,
    pub current_value: Decimal,
    pub total_supply: Decimal,
    pub remaining_supply: Decimal,
    /// Set when the supply read failed and the quote fell back to the base
    /// value. A degraded quote is displayable but must never settle trades.
    pub degraded: bool,
    pub calculated_at: DateTime<Utc>,
}

impl TokenValue {
    /// Fallback quote used when the supply pool cannot be read.
    #[must_use]
    pub fn degraded(base_value: Decimal) -> Self {
        Self {
            base_value,
            inflation_factor: Decimal::ONE,
            current_value: base_value,
            total_supply: Decimal::ZERO,
            remaining_supply: Decimal::ZERO,
            degraded: true,
            calculated_at: Utc::now(),
        }
    }
}

/// Result of the independent supply consistency check.
///
/// `distributed_supply` here is recomputed from wallet balances, not read
/// from the persisted counter. A mismatch flags `is_valid = false`; the
/// check never auto-repairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplyAudit {
    pub is_valid: bool,
    pub total_supply: Decimal,
    pub distributed_supply: Decimal,
    pub remaining_supply: Decimal,
    /// Recomputed minus persisted distributed supply.
    pub discrepancy: Decimal,
}
