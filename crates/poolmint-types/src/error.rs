//! Error types for the Poolmint engine.
//!
//! All errors use the `PM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Balance errors
//! - 3xx: Supply errors
//! - 4xx: Valuation errors
//! - 5xx: Settlement errors
//! - 6xx: Persistence errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{OrderId, TransactionId};

/// Central error enum for all Poolmint operations.
#[derive(Debug, Error)]
pub enum PoolmintError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The requested order was not found in the repository.
    #[error("PM_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order failed validation (missing fields, bad values, etc.).
    /// Rejected before any mutation.
    #[error("PM_ERR_101: Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// An order with this ID already exists.
    #[error("PM_ERR_102: Order already exists: {0}")]
    DuplicateOrder(OrderId),

    /// The order is already terminal (FILLED or CANCELED).
    #[error("PM_ERR_103: Order cannot be cancelled in current state")]
    OrderNotCancellable,

    /// The caller does not own the order it is trying to act on.
    #[error("PM_ERR_104: Caller does not own order {0}")]
    NotOrderOwner(OrderId),

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Not enough balance to perform the operation. Rejects a MARKET order
    /// at creation; auto-cancels a LIMIT order at settlement time.
    #[error("PM_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// A balance operation would produce a negative value.
    #[error("PM_ERR_201: Balance underflow")]
    BalanceUnderflow,

    /// No wallet exists for the given user.
    #[error("PM_ERR_202: Wallet not found for user")]
    WalletNotFound,

    // =================================================================
    // Supply Errors (3xx)
    // =================================================================
    /// The user supply pool cannot cover the tokens a BUY would issue.
    #[error("PM_ERR_300: Supply exhausted: requested {requested}, remaining {remaining}")]
    SupplyExhausted {
        requested: Decimal,
        remaining: Decimal,
    },

    /// Supply counters diverged from wallet balances — critical safety alert.
    #[error("PM_ERR_301: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Valuation Errors (4xx)
    // =================================================================
    /// No trustworthy price could be produced. Aborts an entire matching
    /// pass; no order is settled against an unknown price.
    #[error("PM_ERR_400: Price unavailable: {reason}")]
    PriceUnavailable { reason: String },

    // =================================================================
    // Settlement Errors (5xx)
    // =================================================================
    /// An order has already been settled (idempotency guard).
    #[error("PM_ERR_500: Order already settled: {0}")]
    OrderAlreadySettled(OrderId),

    /// Settlement of a single order failed.
    #[error("PM_ERR_501: Settlement failed: {reason}")]
    SettlementFailed { reason: String },

    /// A ledger entry with this ID was already appended.
    #[error("PM_ERR_502: Duplicate ledger entry: {0}")]
    DuplicateTransaction(TransactionId),

    // =================================================================
    // Persistence Errors (6xx)
    // =================================================================
    /// A store operation failed. The affected order's transaction rolls
    /// back, the error is logged, and the batch continues.
    #[error("PM_ERR_600: Persistence error: {reason}")]
    Persistence { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("PM_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("PM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config, missing fields, etc.).
    #[error("PM_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk, network).
    #[error("PM_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PoolmintError>;

// Conversion from std::io::Error
impl From<std::io::Error> for PoolmintError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
