//! The matching engine front door.
//!
//! Constructors take explicit store handles and a price source — no
//! process-wide singletons, no ambient connections. Callers arrive with an
//! already-authenticated [`Session`]; the engine performs only ownership
//! comparison.

use poolmint_ledger::{OrderStore, SupplyLedger, TransactionLedger, WalletLedger};
use poolmint_types::{
    EngineConfig, Order, OrderId, OrderSide, OrderStatus, PoolmintError, PriceType, Result,
    Session, SupplyAudit, TokenSupply, TokenValue, Transaction, TxKind,
};
use poolmint_valuation::{FeeSchedule, PriceSource, SupplyReader};
use rust_decimal::Decimal;

use crate::settlement::{SettleOutcome, SkipReason};

/// Adapter letting a [`poolmint_valuation::ValuationEngine`] read the
/// persisted supply counters through a [`SupplyLedger`] handle.
pub struct SupplyHandle(pub SupplyLedger);

impl SupplyReader for SupplyHandle {
    fn read_supply(&self) -> Result<TokenSupply> {
        self.0.snapshot()
    }
}

/// Summary of one matching pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// Pending LIMIT orders examined.
    pub scanned: usize,
    /// Orders settled to FILLED.
    pub executed: usize,
    /// Orders auto-canceled for insufficient balance.
    pub canceled: usize,
}

/// The Limit Order Matching & Settlement Engine.
pub struct MatchingEngine<P> {
    pub(crate) config: EngineConfig,
    pub(crate) wallets: WalletLedger,
    pub(crate) supply: SupplyLedger,
    pub(crate) orders: OrderStore,
    pub(crate) transactions: TransactionLedger,
    pub(crate) fees: FeeSchedule,
    price_source: P,
}

impl<P: PriceSource> MatchingEngine<P> {
    /// Build an engine over explicit store handles.
    ///
    /// # Errors
    /// Returns `Configuration` if the config fails validation.
    pub fn new(
        config: EngineConfig,
        wallets: WalletLedger,
        supply: SupplyLedger,
        orders: OrderStore,
        transactions: TransactionLedger,
        price_source: P,
    ) -> Result<Self> {
        config.validate()?;
        if config.admin_user_id != wallets.admin_user_id() {
            return Err(PoolmintError::Configuration(
                "config admin wallet does not match the wallet ledger's admin".into(),
            ));
        }
        let fees = FeeSchedule::new(config.fees.clone());
        Ok(Self {
            config,
            wallets,
            supply,
            orders,
            transactions,
            fees,
            price_source,
        })
    }

    /// Read-only price quote. A degraded quote is returned as-is; only
    /// settlement paths refuse to act on it.
    #[must_use]
    pub fn current_token_value(&self) -> TokenValue {
        self.price_source.quote()
    }

    /// Validate and accept an order for the session's user.
    ///
    /// LIMIT orders persist as PENDING and wait for a matching pass.
    /// MARKET orders settle inline at the current quote; a MARKET order
    /// that cannot settle is rejected synchronously with the reason.
    pub fn create_order(
        &self,
        session: &Session,
        side: OrderSide,
        price_type: PriceType,
        amount: Decimal,
        limit_price: Option<Decimal>,
    ) -> Result<Order> {
        if amount <= Decimal::ZERO {
            return Err(PoolmintError::InvalidOrder {
                reason: format!("amount must be positive, got {amount}"),
            });
        }

        match price_type {
            PriceType::Limit => {
                let price = limit_price.ok_or_else(|| PoolmintError::InvalidOrder {
                    reason: "LIMIT order requires a limit price".into(),
                })?;
                if price <= Decimal::ZERO {
                    return Err(PoolmintError::InvalidOrder {
                        reason: format!("limit price must be positive, got {price}"),
                    });
                }
                let order = Order::limit(session.id, side, amount, price);
                self.orders.insert(order.clone())?;
                tracing::info!(
                    order_id = %order.id,
                    %side,
                    %amount,
                    limit_price = %price,
                    "limit order accepted"
                );
                Ok(order)
            }
            PriceType::Market => {
                if limit_price.is_some() {
                    return Err(PoolmintError::InvalidOrder {
                        reason: "MARKET order must not carry a limit price".into(),
                    });
                }
                self.create_market_order(session, side, amount)
            }
        }
    }

    /// MARKET path: settle inline using the same per-order settlement as
    /// the matching pass.
    fn create_market_order(
        &self,
        session: &Session,
        side: OrderSide,
        amount: Decimal,
    ) -> Result<Order> {
        let quote = self.price_source.quote();
        if quote.degraded {
            return Err(PoolmintError::PriceUnavailable {
                reason: "degraded quote; market order refused".into(),
            });
        }

        let order = Order::market(session.id, side, amount);
        self.orders.insert(order.clone())?;

        match self.settle_at(&order, quote.current_value) {
            Ok(SettleOutcome::Filled(filled)) => Ok(filled),
            Ok(SettleOutcome::AutoCanceled(_)) => {
                let wallet = self.wallets.wallet(session.id)?;
                let available = match side {
                    OrderSide::Buy => wallet.fiat_balance,
                    OrderSide::Sell => wallet.token_balance,
                };
                Err(PoolmintError::InsufficientBalance {
                    needed: amount,
                    available,
                })
            }
            Ok(SettleOutcome::Skipped(SkipReason::SupplyExhausted)) => {
                // Leave the order visible as CANCELED, then report why.
                let _ = self.orders.cancel(order.id);
                let remaining = self.supply.snapshot()?.user_supply_remaining;
                Err(PoolmintError::SupplyExhausted {
                    requested: amount / quote.current_value,
                    remaining,
                })
            }
            Ok(SettleOutcome::Skipped(SkipReason::RaceLost)) => {
                Err(PoolmintError::OrderAlreadySettled(order.id))
            }
            Err(err) => {
                let _ = self.orders.cancel(order.id);
                Err(err)
            }
        }
    }

    /// Conditional PENDING → CANCELED transition, rejected unless the
    /// session owns the order (or is an admin).
    pub fn cancel_order(&self, order_id: OrderId, session: &Session) -> Result<Order> {
        let order = self
            .orders
            .get(order_id)?
            .ok_or(PoolmintError::OrderNotFound(order_id))?;
        if !session.can_act_for(order.user_id) {
            return Err(PoolmintError::NotOrderOwner(order_id));
        }
        let canceled = self.orders.cancel(order_id)?;
        tracing::info!(order_id = %order_id, user = %session.id, "order canceled");
        Ok(canceled)
    }

    /// One synchronous matching pass over all pending LIMIT orders.
    ///
    /// The pass takes one quote up front; if the quote is degraded the
    /// whole pass aborts before touching any order. Per-order failures are
    /// logged and the pass continues with the next order. Re-invoking with
    /// no new orders and no price change executes nothing — the engine only
    /// ever acts on PENDING status.
    pub fn run_matching_pass(&self) -> Result<PassReport> {
        let quote = self.price_source.quote();
        if quote.degraded {
            return Err(PoolmintError::PriceUnavailable {
                reason: "degraded quote; matching pass aborted".into(),
            });
        }
        let price = quote.current_value;

        let pending = self.orders.pending_limit_orders()?;
        let mut report = PassReport {
            scanned: 0,
            executed: 0,
            canceled: 0,
        };

        for order in pending {
            report.scanned += 1;

            if !order.is_eligible_at(price) {
                tracing::debug!(
                    order_id = %order.id,
                    side = %order.side,
                    limit = ?order.limit_price,
                    %price,
                    "order not eligible, left pending"
                );
                continue;
            }

            match self.settle_at(&order, price) {
                Ok(SettleOutcome::Filled(_)) => report.executed += 1,
                Ok(SettleOutcome::AutoCanceled(_)) => report.canceled += 1,
                Ok(SettleOutcome::Skipped(reason)) => {
                    tracing::debug!(order_id = %order.id, ?reason, "order skipped");
                }
                Err(err) => {
                    // Local to this order; siblings still settle.
                    tracing::warn!(order_id = %order.id, error = %err, "settlement failed");
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            executed = report.executed,
            canceled = report.canceled,
            %price,
            "matching pass complete"
        );
        Ok(report)
    }

    /// Credit an approved deposit to the user's wallet and record it.
    pub fn approve_deposit(
        &self,
        user: poolmint_types::UserId,
        amount: Decimal,
        gateway: &str,
    ) -> Result<Transaction> {
        if amount <= Decimal::ZERO {
            return Err(PoolmintError::InvalidOrder {
                reason: format!("deposit amount must be positive, got {amount}"),
            });
        }
        let split = self.fees.calculate(amount, TxKind::Deposit);
        self.wallets.deposit_fiat(user, split.net)?;
        let tx = Transaction::for_gateway(user, TxKind::Deposit, amount, split.fee, split.net, gateway);
        self.transactions.append(tx.clone())?;
        Ok(tx)
    }

    /// Debit an approved withdrawal, route the fee to the admin wallet,
    /// and record it.
    pub fn approve_withdrawal(
        &self,
        user: poolmint_types::UserId,
        amount: Decimal,
        gateway: &str,
    ) -> Result<Transaction> {
        if amount <= Decimal::ZERO {
            return Err(PoolmintError::InvalidOrder {
                reason: format!("withdrawal amount must be positive, got {amount}"),
            });
        }
        let split = self.fees.calculate(amount, TxKind::Withdraw);
        self.wallets.withdraw_fiat(user, amount)?;
        self.wallets.credit_fee_to_admin(split.fee)?;
        let tx =
            Transaction::for_gateway(user, TxKind::Withdraw, amount, split.fee, split.net, gateway);
        self.transactions.append(tx.clone())?;
        tracing::info!(%user, %amount, fee = %split.fee, "withdrawal approved");
        Ok(tx)
    }

    /// Run the independent supply consistency audit.
    pub fn audit_supply(&self) -> Result<SupplyAudit> {
        self.supply.validate(&self.wallets)
    }

    /// Orders belonging to one user, newest first.
    pub fn orders_for_user(&self, user: poolmint_types::UserId) -> Result<Vec<Order>> {
        self.orders.orders_for_user(user)
    }

    /// Current status of one order, if it exists.
    pub fn order_status(&self, order_id: OrderId) -> Result<Option<OrderStatus>> {
        Ok(self.orders.get(order_id)?.map(|o| o.status))
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
