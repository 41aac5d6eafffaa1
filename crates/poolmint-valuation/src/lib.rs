//! # poolmint-valuation
//!
//! **Pure compute plane**: derives the live token value from the supply
//! pool and computes fees. No mutation, no I/O — every function here maps
//! inputs to outputs and nothing else.
//!
//! ## Architecture
//!
//! - [`curve`] — the inflation curve: value grows monotonically as the
//!   distributed share of the supply grows.
//! - [`engine`] — the [`ValuationEngine`] (supply-backed [`PriceSource`])
//!   with degraded fallback when the supply pool cannot be read.
//! - [`fees`] — the [`FeeSchedule`] mapping (amount, kind) to (fee, net).

pub mod curve;
pub mod engine;
pub mod fees;

pub use curve::compute_token_value;
pub use engine::{FixedPriceSource, PriceSource, SupplyReader, ValuationEngine};
pub use fees::{FeeBreakdown, FeeSchedule};
