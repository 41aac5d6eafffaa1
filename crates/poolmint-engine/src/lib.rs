//! # poolmint-engine
//!
//! **Orchestrator plane**: the Limit Order Matching & Settlement Engine.
//!
//! ## Architecture
//!
//! One [`MatchingEngine`] instance owns handles to the four stores and a
//! [`PriceSource`](poolmint_valuation::PriceSource). A matching pass:
//!
//! 1. Takes one quote for the whole pass (aborts if degraded)
//! 2. Scans all pending LIMIT orders, oldest first
//! 3. Applies the boundary-inclusive eligibility rule
//! 4. Settles each eligible order atomically: wallet + supply + ledger
//!    entry + FILLED mark, or auto-cancel on insufficient balance
//!
//! A failure settling one order never aborts its siblings; the engine holds
//! no pass-wide lock and carries no state between invocations.

pub mod engine;
pub mod settlement;

pub use engine::{MatchingEngine, PassReport, SupplyHandle};
pub use settlement::{SettleOutcome, SkipReason};
