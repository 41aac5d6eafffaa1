//! The Token Valuation Engine.
//!
//! Wraps the pure curve behind a [`PriceSource`] so callers (the matching
//! engine, the public quote endpoint, tests) can take any quote provider.
//! Reads the supply through an injected [`SupplyReader`] handle — no
//! ambient connections.
//!
//! On a supply read failure the engine does **not** error: it returns the
//! configured base value flagged as degraded. A degraded quote is usable
//! for display, but a matching pass must abort rather than settle against
//! it.

use poolmint_types::{Result, TokenSupply, TokenValue};
use rust_decimal::Decimal;

use crate::curve::compute_token_value;

/// Read access to the persisted supply counters.
pub trait SupplyReader {
    /// Snapshot the current supply pool.
    fn read_supply(&self) -> Result<TokenSupply>;
}

/// Anything that can produce a token value quote.
pub trait PriceSource {
    /// Produce one quote. Infallible by design: failures surface as a
    /// degraded quote, never as an error.
    fn quote(&self) -> TokenValue;
}

/// Supply-backed valuation engine.
pub struct ValuationEngine<S> {
    base_value: Decimal,
    inflation_slope: Decimal,
    supply: S,
}

impl<S: SupplyReader> ValuationEngine<S> {
    /// Create a valuation engine over a supply handle.
    #[must_use]
    pub fn new(base_value: Decimal, inflation_slope: Decimal, supply: S) -> Self {
        Self {
            base_value,
            inflation_slope,
            supply,
        }
    }
}

impl<S: SupplyReader> PriceSource for ValuationEngine<S> {
    fn quote(&self) -> TokenValue {
        match self.supply.read_supply() {
            Ok(snapshot) => {
                compute_token_value(self.base_value, self.inflation_slope, &snapshot)
            }
            Err(err) => {
                tracing::warn!(error = %err, "supply read failed, serving degraded quote");
                TokenValue::degraded(self.base_value)
            }
        }
    }
}

/// Fixed quote provider for tests and offline tooling.
pub struct FixedPriceSource(pub TokenValue);

impl FixedPriceSource {
    /// Healthy quote pinned at `price`.
    #[must_use]
    pub fn at(price: Decimal) -> Self {
        Self(TokenValue {
            base_value: price,
            inflation_factor: Decimal::ONE,
            current_value: price,
            total_supply: Decimal::ZERO,
            remaining_supply: Decimal::ZERO,
            degraded: false,
            calculated_at: chrono::Utc::now(),
        })
    }

    /// Degraded quote pinned at `price`.
    #[must_use]
    pub fn degraded(price: Decimal) -> Self {
        Self(TokenValue::degraded(price))
    }
}

impl PriceSource for FixedPriceSource {
    fn quote(&self) -> TokenValue {
        self.0.clone()
    }
}
