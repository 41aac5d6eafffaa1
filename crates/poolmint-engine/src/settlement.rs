//! Per-order atomic settlement.
//!
//! Each order settles inside its own transactional boundary:
//!
//! 1. Re-validate the wallet balance at settlement time (not creation time)
//!    and move wallet + supply together under both locks
//! 2. Compare-and-swap the order PENDING → FILLED
//! 3. Append the ledger entry
//!
//! Insufficient balance auto-cancels the order instead of raising — the
//! failure is local to one order. A lost fill CAS (manual cancel won the
//! race) compensates the balance unit and leaves the cancel in place, so
//! exactly one terminal state survives.

use poolmint_ledger::unit;
use poolmint_types::{Order, OrderSide, PoolmintError, Result, Transaction, TxKind};
use poolmint_valuation::PriceSource;
use rust_decimal::Decimal;

use crate::engine::MatchingEngine;

/// Why an order was left untouched by a settlement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The supply pool cannot cover the tokens a BUY would issue; the
    /// order stays PENDING for a later pass.
    SupplyExhausted,
    /// The order reached a terminal state between scan and settlement.
    RaceLost,
}

/// Outcome of settling one order.
#[derive(Debug, Clone)]
pub enum SettleOutcome {
    /// Settled and marked FILLED.
    Filled(Order),
    /// Balance was insufficient at settlement time; marked CANCELED.
    AutoCanceled(Order),
    /// Left untouched.
    Skipped(SkipReason),
}

impl<P: PriceSource> MatchingEngine<P> {
    /// Settle one order at the given price. Atomic per order: on any error
    /// path the stores are left as if the attempt never happened.
    pub(crate) fn settle_at(&self, order: &Order, price: Decimal) -> Result<SettleOutcome> {
        match order.side {
            OrderSide::Buy => self.settle_buy(order, price),
            OrderSide::Sell => self.settle_sell(order, price),
        }
    }

    fn settle_buy(&self, order: &Order, price: Decimal) -> Result<SettleOutcome> {
        let tokens = order.amount / price;

        match unit::settle_buy(&self.wallets, &self.supply, order.user_id, order.amount, tokens) {
            Ok(()) => {}
            Err(PoolmintError::InsufficientBalance { .. }) => {
                return self.auto_cancel(order);
            }
            Err(PoolmintError::SupplyExhausted { requested, remaining }) => {
                tracing::debug!(
                    order_id = %order.id,
                    %requested,
                    %remaining,
                    "supply exhausted, order left pending"
                );
                return Ok(SettleOutcome::Skipped(SkipReason::SupplyExhausted));
            }
            Err(err) => return Err(err),
        }

        match self.orders.fill(order.id, tokens) {
            Ok(filled) => {
                self.transactions.append(Transaction::for_settlement(
                    order.id,
                    order.user_id,
                    TxKind::Buy,
                    order.amount,
                    price,
                    tokens,
                ))?;
                tracing::debug!(
                    order_id = %order.id,
                    %price,
                    %tokens,
                    "buy settled"
                );
                Ok(SettleOutcome::Filled(filled))
            }
            Err(PoolmintError::OrderAlreadySettled(_)) => {
                // Manual cancel won the race; put the funds back.
                self.compensate_buy(order, tokens);
                Ok(SettleOutcome::Skipped(SkipReason::RaceLost))
            }
            Err(err) => {
                self.compensate_buy(order, tokens);
                Err(err)
            }
        }
    }

    fn settle_sell(&self, order: &Order, price: Decimal) -> Result<SettleOutcome> {
        let usd_received = order.amount * price;

        match unit::settle_sell(
            &self.wallets,
            &self.supply,
            order.user_id,
            order.amount,
            usd_received,
        ) {
            Ok(()) => {}
            Err(PoolmintError::InsufficientBalance { .. }) => {
                return self.auto_cancel(order);
            }
            Err(err) => return Err(err),
        }

        match self.orders.fill(order.id, order.amount) {
            Ok(filled) => {
                self.transactions.append(Transaction::for_settlement(
                    order.id,
                    order.user_id,
                    TxKind::Sell,
                    usd_received,
                    price,
                    order.amount,
                ))?;
                tracing::debug!(
                    order_id = %order.id,
                    %price,
                    %usd_received,
                    "sell settled"
                );
                Ok(SettleOutcome::Filled(filled))
            }
            Err(PoolmintError::OrderAlreadySettled(_)) => {
                self.compensate_sell(order, usd_received);
                Ok(SettleOutcome::Skipped(SkipReason::RaceLost))
            }
            Err(err) => {
                self.compensate_sell(order, usd_received);
                Err(err)
            }
        }
    }

    /// Balance insufficient at settlement time: CANCELED, not an error.
    /// The user sees the terminal order; the pass moves on.
    fn auto_cancel(&self, order: &Order) -> Result<SettleOutcome> {
        match self.orders.cancel(order.id) {
            Ok(canceled) => {
                tracing::info!(
                    order_id = %order.id,
                    user = %order.user_id,
                    "auto-canceled: insufficient balance at settlement"
                );
                Ok(SettleOutcome::AutoCanceled(canceled))
            }
            Err(PoolmintError::OrderNotCancellable) => {
                Ok(SettleOutcome::Skipped(SkipReason::RaceLost))
            }
            Err(err) => Err(err),
        }
    }

    fn compensate_buy(&self, order: &Order, tokens: Decimal) {
        if let Err(err) =
            unit::reverse_buy(&self.wallets, &self.supply, order.user_id, order.amount, tokens)
        {
            tracing::warn!(order_id = %order.id, error = %err, "buy compensation failed");
        }
    }

    fn compensate_sell(&self, order: &Order, usd_received: Decimal) {
        if let Err(err) = unit::reverse_sell(
            &self.wallets,
            &self.supply,
            order.user_id,
            order.amount,
            usd_received,
        ) {
            tracing::warn!(order_id = %order.id, error = %err, "sell compensation failed");
        }
    }
}
