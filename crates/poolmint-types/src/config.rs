//! Configuration for the Poolmint engine.
//!
//! Engine constructors take this config plus explicit store handles — there
//! are no process-wide singletons or ambient connections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, UserId};

/// Fee percentages by transaction kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeRates {
    /// Percentage charged on BUY-side fiat flows.
    pub buy_percent: Decimal,
    /// Percentage charged on withdrawals.
    pub withdraw_percent: Decimal,
}

impl Default for FeeRates {
    fn default() -> Self {
        Self {
            buy_percent: Decimal::new(constants::BUY_FEE_PERCENT, 0),
            withdraw_percent: Decimal::new(constants::WITHDRAW_FEE_PERCENT, 0),
        }
    }
}

/// Configuration for one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Floor value of the token in fiat; the quote never drops below this.
    pub base_value: Decimal,
    /// Slope of the inflation curve: `current = base * (1 + usage * slope)`.
    pub inflation_slope: Decimal,
    /// Total token supply minted at genesis.
    pub total_supply: Decimal,
    /// Portion of the total supply reserved for the admin wallet.
    pub admin_reserve: Decimal,
    /// The system-owned wallet that accumulates fee revenue.
    pub admin_user_id: UserId,
    pub fees: FeeRates,
}

impl EngineConfig {
    /// Default config with a freshly generated admin wallet id.
    #[must_use]
    pub fn with_defaults(admin_user_id: UserId) -> Self {
        Self {
            base_value: Decimal::new(constants::DEFAULT_BASE_VALUE_TEN_THOUSANDTHS, 4),
            inflation_slope: Decimal::new(constants::DEFAULT_INFLATION_SLOPE_TENTHS, 1),
            total_supply: Decimal::from(constants::DEFAULT_TOTAL_SUPPLY),
            admin_reserve: Decimal::from(constants::DEFAULT_ADMIN_RESERVE),
            admin_user_id,
            fees: FeeRates::default(),
        }
    }

    /// Validate config values before constructing an engine.
    ///
    /// # Errors
    /// Returns [`crate::PoolmintError::Configuration`] for non-positive base
    /// value, negative slope, or a reserve exceeding the total supply.
    pub fn validate(&self) -> crate::Result<()> {
        if self.base_value <= Decimal::ZERO {
            return Err(crate::PoolmintError::Configuration(format!(
                "base_value must be positive, got {}",
                self.base_value
            )));
        }
        if self.inflation_slope < Decimal::ZERO {
            return Err(crate::PoolmintError::Configuration(format!(
                "inflation_slope must be non-negative, got {}",
                self.inflation_slope
            )));
        }
        if self.admin_reserve > self.total_supply {
            return Err(crate::PoolmintError::Configuration(format!(
                "admin_reserve {} exceeds total_supply {}",
                self.admin_reserve, self.total_supply
            )));
        }
        Ok(())
    }
}
