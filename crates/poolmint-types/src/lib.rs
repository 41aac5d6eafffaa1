//! # poolmint-types
//!
//! Shared types, errors, and configuration for the **Poolmint** token
//! valuation and limit-order settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`UserId`], [`TransactionId`]
//! - **Order model**: [`Order`], [`OrderSide`], [`PriceType`], [`OrderStatus`]
//! - **Wallet model**: [`Wallet`]
//! - **Supply model**: [`TokenSupply`], [`TokenValue`], [`SupplyAudit`]
//! - **Transaction model**: [`Transaction`], [`TxKind`], [`TxStatus`]
//! - **Session model**: [`Session`], [`Role`]
//! - **Configuration**: [`EngineConfig`], [`FeeRates`]
//! - **Errors**: [`PoolmintError`] with `PM_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;
pub mod session;
pub mod supply;
pub mod transaction;
pub mod wallet;

// Re-export all primary types at crate root for ergonomic imports:
//   use poolmint_types::{Order, OrderSide, TokenSupply, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use session::*;
pub use supply::*;
pub use transaction::*;
pub use wallet::*;

// Constants are accessed via `poolmint_types::constants::FOO`
// (not re-exported to avoid name collisions).
