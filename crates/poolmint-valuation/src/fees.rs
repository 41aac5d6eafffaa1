//! Fee calculation.
//!
//! A pure mapping from (amount, transaction kind) to (fee, net). The rates
//! come from config: BUY-side fiat flows pay a small percentage, withdrawals
//! a larger one, everything else is free. Crediting the collected fee to the
//! admin wallet is the Wallet Ledger's job, not this module's.

use poolmint_types::{FeeRates, TxKind};
use rust_decimal::Decimal;

/// The computed fee split for one amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub fee: Decimal,
    pub net: Decimal,
}

/// Fee schedule for one engine instance.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    rates: FeeRates,
}

impl FeeSchedule {
    #[must_use]
    pub fn new(rates: FeeRates) -> Self {
        Self { rates }
    }

    /// Split `amount` into fee and net for the given transaction kind.
    ///
    /// Always `net = amount - fee`; for positive amounts both parts are
    /// non-negative.
    #[must_use]
    pub fn calculate(&self, amount: Decimal, kind: TxKind) -> FeeBreakdown {
        let percent = match kind {
            TxKind::Buy => self.rates.buy_percent,
            TxKind::Withdraw => self.rates.withdraw_percent,
            TxKind::Sell | TxKind::Deposit | TxKind::Fee => Decimal::ZERO,
        };
        let fee = amount * percent / Decimal::new(100, 0);
        FeeBreakdown {
            fee,
            net: amount - fee,
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(FeeRates::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_fee_is_one_percent() {
        let schedule = FeeSchedule::default();
        let split = schedule.calculate(Decimal::new(100, 0), TxKind::Buy);
        assert_eq!(split.fee, Decimal::new(1, 0));
        assert_eq!(split.net, Decimal::new(99, 0));
    }

    #[test]
    fn withdraw_fee_is_ten_percent() {
        let schedule = FeeSchedule::default();
        let split = schedule.calculate(Decimal::new(100, 0), TxKind::Withdraw);
        assert_eq!(split.fee, Decimal::new(10, 0));
        assert_eq!(split.net, Decimal::new(90, 0));
    }

    #[test]
    fn other_kinds_are_free() {
        let schedule = FeeSchedule::default();
        for kind in [TxKind::Sell, TxKind::Deposit, TxKind::Fee] {
            let split = schedule.calculate(Decimal::new(100, 0), kind);
            assert_eq!(split.fee, Decimal::ZERO, "{kind} should be free");
            assert_eq!(split.net, Decimal::new(100, 0));
        }
    }

    #[test]
    fn net_plus_fee_equals_amount() {
        let schedule = FeeSchedule::default();
        for amount in [Decimal::new(1, 2), Decimal::new(333, 1), Decimal::new(1_000_000, 0)] {
            for kind in [TxKind::Buy, TxKind::Withdraw, TxKind::Deposit] {
                let split = schedule.calculate(amount, kind);
                assert_eq!(split.fee + split.net, amount);
                assert!(split.fee >= Decimal::ZERO);
                assert!(split.net >= Decimal::ZERO);
            }
        }
    }

    #[test]
    fn fractional_amount_fee() {
        let schedule = FeeSchedule::default();
        let split = schedule.calculate(Decimal::new(1250, 2), TxKind::Buy); // 12.50
        assert_eq!(split.fee, Decimal::new(125, 3)); // 0.125
        assert_eq!(split.net, Decimal::new(12375, 3)); // 12.375
    }
}
