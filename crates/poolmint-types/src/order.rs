//! Order types for the Poolmint settlement engine.
//!
//! An order's lifecycle is strictly one-way:
//! `PENDING → FILLED` or `PENDING → CANCELED`. Both terminal states are
//! immutable; only the matching engine or an explicit cancel request may
//! move a LIMIT order out of PENDING.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{OrderId, UserId};

/// Which direction the order trades: fiat → tokens or tokens → fiat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// How the order prices itself: immediately at the current computed value,
/// or conditionally once the value crosses a caller-supplied threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PriceType {
    Market,
    Limit,
}

impl std::fmt::Display for PriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
        }
    }
}

/// Lifecycle status of an order. `Filled` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Filled,
    Canceled,
}

impl OrderStatus {
    /// Whether this status admits no further transition.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Filled | Self::Canceled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Filled => write!(f, "FILLED"),
            Self::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// Core order struct.
///
/// `amount` is denominated in fiat for BUY orders and in tokens for SELL
/// orders. `token_amount` records the quantity computed at settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub side: OrderSide,
    pub price_type: PriceType,
    pub amount: Decimal,
    /// Quantity issued or received at settlement; `None` until filled.
    pub token_amount: Option<Decimal>,
    /// Threshold price; `None` for MARKET orders.
    pub limit_price: Option<Decimal>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a pending LIMIT order.
    #[must_use]
    pub fn limit(user_id: UserId, side: OrderSide, amount: Decimal, limit_price: Decimal) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            side,
            price_type: PriceType::Limit,
            amount,
            token_amount: None,
            limit_price: Some(limit_price),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            executed_at: None,
            canceled_at: None,
        }
    }

    /// Create a pending MARKET order (settled inline by the engine).
    #[must_use]
    pub fn market(user_id: UserId, side: OrderSide, amount: Decimal) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            side,
            price_type: PriceType::Market,
            amount,
            token_amount: None,
            limit_price: None,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            executed_at: None,
            canceled_at: None,
        }
    }

    /// Boundary-inclusive eligibility test against the current price.
    ///
    /// BUY is eligible iff `current <= limit`; SELL iff `current >= limit`.
    /// Equality counts as eligible. MARKET orders are always eligible.
    #[must_use]
    pub fn is_eligible_at(&self, current_price: Decimal) -> bool {
        let Some(limit) = self.limit_price else {
            return self.price_type == PriceType::Market;
        };
        match self.side {
            OrderSide::Buy => current_price <= limit,
            OrderSide::Sell => current_price >= limit,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy_limit(side: OrderSide, amount: Decimal, limit_price: Decimal) -> Self {
        Self::limit(UserId::new(), side, amount, limit_price)
    }

    pub fn dummy_market(side: OrderSide, amount: Decimal) -> Self {
        Self::market(UserId::new(), side, amount)
    }
}
