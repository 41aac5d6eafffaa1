//! # poolmint-ledger
//!
//! **Stateful plane**: the persisted stores the engine settles against.
//!
//! - [`WalletLedger`] — per-user fiat and token balances
//! - [`SupplyLedger`] — the finite supply pool counters
//! - [`OrderStore`] — orders with a compare-and-swap lifecycle
//! - [`TransactionLedger`] — append-only settlement history
//! - [`unit`] — cross-store settlement units (wallet + supply mutated
//!   under both locks, no partial visibility)
//!
//! Every store is a cheaply cloneable handle (`Arc` inside) so engine
//! constructors can take them as explicit parameters. All mutations are
//! check-then-mutate: either the full operation succeeds or the store is
//! unchanged. A poisoned lock surfaces as `PM_ERR_600` persistence error.

pub mod order_store;
pub mod supply_ledger;
pub mod tx_ledger;
pub mod unit;
pub mod wallet_ledger;

pub use order_store::OrderStore;
pub use supply_ledger::SupplyLedger;
pub use tx_ledger::TransactionLedger;
pub use wallet_ledger::WalletLedger;
