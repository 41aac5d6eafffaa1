//! The inflation curve.
//!
//! The token's current value is a monotone function of how much of the
//! supply has been issued:
//!
//! ```text
//! usage   = distributed_supply / total_supply
//! factor  = 1 + usage * slope
//! current = base_value * factor
//! ```
//!
//! With `slope >= 0` this guarantees `current >= base_value`, and the value
//! strictly increases as the remaining pool shrinks.

use chrono::Utc;
use poolmint_types::{TokenSupply, TokenValue};
use rust_decimal::Decimal;

/// Compute the token value for one supply snapshot.
///
/// Pure: reads the snapshot, produces a [`TokenValue`], mutates nothing.
#[must_use]
pub fn compute_token_value(
    base_value: Decimal,
    inflation_slope: Decimal,
    supply: &TokenSupply,
) -> TokenValue {
    let usage = supply.usage_percentage();
    let inflation_factor = Decimal::ONE + usage * inflation_slope;
    TokenValue {
        base_value,
        inflation_factor,
        current_value: base_value * inflation_factor,
        total_supply: supply.total_supply,
        remaining_supply: supply.user_supply_remaining,
        degraded: false,
        calculated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supply_at(total: i64, distributed: i64) -> TokenSupply {
        let mut supply = TokenSupply::genesis(Decimal::new(total, 0), Decimal::ZERO);
        supply.distributed_supply = Decimal::new(distributed, 0);
        supply.user_supply_remaining = Decimal::new(total - distributed, 0);
        supply
    }

    #[test]
    fn genesis_value_equals_base() {
        let supply = supply_at(1_000_000, 0);
        let value = compute_token_value(Decimal::new(1, 3), Decimal::new(25, 1), &supply);
        assert_eq!(value.inflation_factor, Decimal::ONE);
        assert_eq!(value.current_value, Decimal::new(1, 3));
        assert!(!value.degraded);
    }

    #[test]
    fn value_never_below_base() {
        let base = Decimal::new(1, 3);
        for distributed in [0, 1, 500_000, 999_999, 1_000_000] {
            let supply = supply_at(1_000_000, distributed);
            let value = compute_token_value(base, Decimal::new(25, 1), &supply);
            assert!(
                value.current_value >= base,
                "distributed={distributed}: {} < {base}",
                value.current_value
            );
        }
    }

    #[test]
    fn value_strictly_increases_as_remaining_shrinks() {
        let base = Decimal::new(1, 3);
        let slope = Decimal::new(25, 1);
        let mut last = Decimal::ZERO;
        for distributed in [0, 100_000, 400_000, 900_000] {
            let supply = supply_at(1_000_000, distributed);
            let value = compute_token_value(base, slope, &supply);
            assert!(
                value.current_value > last || distributed == 0,
                "not strictly increasing at distributed={distributed}"
            );
            last = value.current_value;
        }
    }

    #[test]
    fn full_distribution_applies_full_slope() {
        // usage = 1.0 → factor = 1 + slope → current = base * (1 + slope)
        let supply = supply_at(1000, 1000);
        let value = compute_token_value(Decimal::new(1, 3), Decimal::new(25, 1), &supply);
        assert_eq!(value.inflation_factor, Decimal::new(35, 1));
        assert_eq!(value.current_value, Decimal::new(35, 4)); // 0.0035
    }

    #[test]
    fn snapshot_fields_are_propagated() {
        let supply = supply_at(1_000_000, 250_000);
        let value = compute_token_value(Decimal::new(1, 3), Decimal::new(25, 1), &supply);
        assert_eq!(value.total_supply, Decimal::new(1_000_000, 0));
        assert_eq!(value.remaining_supply, Decimal::new(750_000, 0));
    }
}
