//! Append-only settlement history entries.
//!
//! One [`Transaction`] is written per successful settlement, inside the same
//! atomic unit as the balance mutation it records. Entries are never updated
//! or deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{OrderId, TransactionId, UserId};

/// What kind of balance movement a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    Buy,
    Sell,
    Deposit,
    Withdraw,
    Fee,
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Withdraw => write!(f, "WITHDRAW"),
            Self::Fee => write!(f, "FEE"),
        }
    }
}

/// Terminal status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxStatus {
    Completed,
    Failed,
}

/// A single settlement history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub kind: TxKind,
    pub amount: Decimal,
    pub fee_amount: Decimal,
    pub net_amount: Decimal,
    /// Settlement price, for BUY/SELL entries.
    pub price: Option<Decimal>,
    /// Token quantity moved, for BUY/SELL entries.
    pub token_amount: Option<Decimal>,
    /// Order whose settlement produced this entry, if any.
    pub order_id: Option<OrderId>,
    pub status: TxStatus,
    /// Payment gateway label for deposit/withdraw entries.
    pub gateway: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Ledger entry for a settled order. The id is derived from the order id
    /// so the same settlement can never be recorded twice.
    #[must_use]
    pub fn for_settlement(
        order_id: OrderId,
        user_id: UserId,
        kind: TxKind,
        amount: Decimal,
        price: Decimal,
        token_amount: Decimal,
    ) -> Self {
        Self {
            id: TransactionId::for_settlement(order_id),
            user_id,
            kind,
            amount,
            fee_amount: Decimal::ZERO,
            net_amount: amount,
            price: Some(price),
            token_amount: Some(token_amount),
            order_id: Some(order_id),
            status: TxStatus::Completed,
            gateway: None,
            created_at: Utc::now(),
        }
    }

    /// Ledger entry for a deposit/withdrawal processed through a payment
    /// gateway.
    #[must_use]
    pub fn for_gateway(
        user_id: UserId,
        kind: TxKind,
        amount: Decimal,
        fee_amount: Decimal,
        net_amount: Decimal,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            kind,
            amount,
            fee_amount,
            net_amount,
            price: None,
            token_amount: None,
            order_id: None,
            status: TxStatus::Completed,
            gateway: Some(gateway.into()),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_entry_id_is_deterministic() {
        let order_id = OrderId::new();
        let user = UserId::new();
        let a = Transaction::for_settlement(
            order_id,
            user,
            TxKind::Buy,
            Decimal::new(50, 0),
            Decimal::new(35, 4),
            Decimal::new(142857143, 4),
        );
        let b = Transaction::for_settlement(
            order_id,
            user,
            TxKind::Buy,
            Decimal::new(50, 0),
            Decimal::new(35, 4),
            Decimal::new(142857143, 4),
        );
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn settlement_entry_carries_price_and_quantity() {
        let tx = Transaction::for_settlement(
            OrderId::new(),
            UserId::new(),
            TxKind::Sell,
            Decimal::new(100, 0),
            Decimal::new(35, 4),
            Decimal::new(100, 0),
        );
        assert_eq!(tx.kind, TxKind::Sell);
        assert_eq!(tx.price, Some(Decimal::new(35, 4)));
        assert_eq!(tx.token_amount, Some(Decimal::new(100, 0)));
        assert_eq!(tx.status, TxStatus::Completed);
        assert_eq!(tx.fee_amount, Decimal::ZERO);
    }

    #[test]
    fn gateway_entry_carries_fee_split() {
        let tx = Transaction::for_gateway(
            UserId::new(),
            TxKind::Withdraw,
            Decimal::new(100, 0),
            Decimal::new(10, 0),
            Decimal::new(90, 0),
            "bank-transfer",
        );
        assert_eq!(tx.fee_amount, Decimal::new(10, 0));
        assert_eq!(tx.net_amount, Decimal::new(90, 0));
        assert_eq!(tx.gateway.as_deref(), Some("bank-transfer"));
        assert!(tx.price.is_none());
        assert!(tx.order_id.is_none());
    }

    #[test]
    fn tx_kind_display() {
        assert_eq!(format!("{}", TxKind::Buy), "BUY");
        assert_eq!(format!("{}", TxKind::Withdraw), "WITHDRAW");
    }

    #[test]
    fn transaction_serde_roundtrip() {
        let tx = Transaction::for_settlement(
            OrderId::new(),
            UserId::new(),
            TxKind::Buy,
            Decimal::new(200, 0),
            Decimal::new(35, 4),
            Decimal::new(571428571, 4),
        );
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx.id, back.id);
        assert_eq!(tx.price, back.price);
    }
}
