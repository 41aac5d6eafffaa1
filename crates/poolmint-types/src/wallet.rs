//! Wallet balances for a single user.
//!
//! A wallet carries exactly two balances: fiat and tokens. Neither may go
//! negative as a result of any settlement step — every debit is validated
//! before mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Per-user fiat and token balances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wallet {
    pub user_id: UserId,
    pub fiat_balance: Decimal,
    pub token_balance: Decimal,
}

impl Wallet {
    /// Create an empty wallet for a user.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            fiat_balance: Decimal::ZERO,
            token_balance: Decimal::ZERO,
        }
    }

    /// Whether this wallet holds no balance at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fiat_balance.is_zero() && self.token_balance.is_zero()
    }
}
