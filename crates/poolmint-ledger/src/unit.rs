//! Cross-store settlement units.
//!
//! A BUY settlement credits tokens to a wallet and deducts them from the
//! supply pool; a SELL does the reverse. Both stores are mutated while both
//! write locks are held (wallet lock first, then supply), so there is no
//! window where tokens exist in a wallet without a matching supply
//! deduction, or vice versa.
//!
//! Every unit validates all preconditions before mutating anything: on any
//! error both stores are unchanged. The `reverse_*` units compensate a
//! completed unit when the order-status compare-and-swap afterwards loses a
//! race to a manual cancel.

use poolmint_types::{PoolmintError, Result, UserId, Wallet};
use rust_decimal::Decimal;

use crate::{SupplyLedger, WalletLedger};

/// BUY settlement: debit `fiat_amount` fiat, credit `tokens` tokens, and
/// deduct `tokens` from the user supply pool — one atomic unit.
///
/// # Errors
/// - `InsufficientBalance` if the wallet cannot cover `fiat_amount`
/// - `SupplyExhausted` if the pool cannot cover `tokens`
///
/// Either way, nothing is mutated.
pub fn settle_buy(
    wallets: &WalletLedger,
    supply: &SupplyLedger,
    user: UserId,
    fiat_amount: Decimal,
    tokens: Decimal,
) -> Result<()> {
    let mut wallet_map = wallets.write()?;
    let mut pool = supply.write()?;

    let wallet = wallet_map.entry(user).or_insert_with(|| Wallet::new(user));
    if wallet.fiat_balance < fiat_amount {
        return Err(PoolmintError::InsufficientBalance {
            needed: fiat_amount,
            available: wallet.fiat_balance,
        });
    }

    // Validates the pool and mutates it; the wallet mutation below cannot
    // fail once the balance check above has passed.
    pool.deduct(tokens)?;
    wallet.fiat_balance -= fiat_amount;
    wallet.token_balance += tokens;
    Ok(())
}

/// Compensate a completed BUY unit (fill CAS lost to a manual cancel).
pub fn reverse_buy(
    wallets: &WalletLedger,
    supply: &SupplyLedger,
    user: UserId,
    fiat_amount: Decimal,
    tokens: Decimal,
) -> Result<()> {
    let mut wallet_map = wallets.write()?;
    let mut pool = supply.write()?;

    let wallet = wallet_map
        .get_mut(&user)
        .ok_or(PoolmintError::WalletNotFound)?;
    if wallet.token_balance < tokens {
        return Err(PoolmintError::BalanceUnderflow);
    }

    pool.restore(tokens)?;
    wallet.token_balance -= tokens;
    wallet.fiat_balance += fiat_amount;
    Ok(())
}

/// SELL settlement: debit `tokens` tokens, credit `fiat_amount` fiat, and
/// restore `tokens` to the user supply pool — one atomic unit.
///
/// # Errors
/// - `InsufficientBalance` if the wallet cannot cover `tokens`
/// - `SupplyInvariantViolation` if the restore exceeds the distributed
///   counter (tokens that were never issued through the pool)
pub fn settle_sell(
    wallets: &WalletLedger,
    supply: &SupplyLedger,
    user: UserId,
    tokens: Decimal,
    fiat_amount: Decimal,
) -> Result<()> {
    let mut wallet_map = wallets.write()?;
    let mut pool = supply.write()?;

    let wallet = wallet_map.entry(user).or_insert_with(|| Wallet::new(user));
    if wallet.token_balance < tokens {
        return Err(PoolmintError::InsufficientBalance {
            needed: tokens,
            available: wallet.token_balance,
        });
    }

    pool.restore(tokens)?;
    wallet.token_balance -= tokens;
    wallet.fiat_balance += fiat_amount;
    Ok(())
}

/// Compensate a completed SELL unit.
pub fn reverse_sell(
    wallets: &WalletLedger,
    supply: &SupplyLedger,
    user: UserId,
    tokens: Decimal,
    fiat_amount: Decimal,
) -> Result<()> {
    let mut wallet_map = wallets.write()?;
    let mut pool = supply.write()?;

    let wallet = wallet_map
        .get_mut(&user)
        .ok_or(PoolmintError::WalletNotFound)?;
    if wallet.fiat_balance < fiat_amount {
        return Err(PoolmintError::BalanceUnderflow);
    }

    pool.deduct(tokens)?;
    wallet.fiat_balance -= fiat_amount;
    wallet.token_balance += tokens;
    Ok(())
}

#[cfg(test)]
mod tests {
    use poolmint_types::UserId;

    use super::*;

    fn setup(total: i64) -> (WalletLedger, SupplyLedger, UserId) {
        let wallets = WalletLedger::new(UserId::new());
        let supply = SupplyLedger::genesis(Decimal::new(total, 0), Decimal::ZERO);
        (wallets, supply, UserId::new())
    }

    #[test]
    fn buy_moves_fiat_tokens_and_supply_together() {
        let (wallets, supply, user) = setup(1_000_000);
        wallets.deposit_fiat(user, Decimal::new(100, 0)).unwrap();

        settle_buy(
            &wallets,
            &supply,
            user,
            Decimal::new(50, 0),
            Decimal::new(20_000, 0),
        )
        .unwrap();

        let wallet = wallets.wallet(user).unwrap();
        assert_eq!(wallet.fiat_balance, Decimal::new(50, 0));
        assert_eq!(wallet.token_balance, Decimal::new(20_000, 0));

        let snap = supply.snapshot().unwrap();
        assert_eq!(snap.distributed_supply, Decimal::new(20_000, 0));
        assert_eq!(snap.user_supply_remaining, Decimal::new(980_000, 0));
        assert!(snap.is_balanced());
    }

    #[test]
    fn buy_insufficient_fiat_mutates_nothing() {
        let (wallets, supply, user) = setup(1_000_000);
        wallets.deposit_fiat(user, Decimal::new(10, 0)).unwrap();

        let err = settle_buy(
            &wallets,
            &supply,
            user,
            Decimal::new(50, 0),
            Decimal::new(20_000, 0),
        )
        .unwrap_err();
        assert!(matches!(err, PoolmintError::InsufficientBalance { .. }));

        assert_eq!(wallets.wallet(user).unwrap().fiat_balance, Decimal::new(10, 0));
        assert_eq!(supply.snapshot().unwrap().distributed_supply, Decimal::ZERO);
    }

    #[test]
    fn buy_exhausted_supply_mutates_nothing() {
        let (wallets, supply, user) = setup(100);
        wallets.deposit_fiat(user, Decimal::new(1000, 0)).unwrap();

        let err = settle_buy(
            &wallets,
            &supply,
            user,
            Decimal::new(500, 0),
            Decimal::new(101, 0),
        )
        .unwrap_err();
        assert!(matches!(err, PoolmintError::SupplyExhausted { .. }));

        let wallet = wallets.wallet(user).unwrap();
        assert_eq!(wallet.fiat_balance, Decimal::new(1000, 0));
        assert_eq!(wallet.token_balance, Decimal::ZERO);
        assert_eq!(
            supply.snapshot().unwrap().user_supply_remaining,
            Decimal::new(100, 0)
        );
    }

    #[test]
    fn sell_returns_tokens_to_pool() {
        let (wallets, supply, user) = setup(1_000_000);
        wallets.deposit_fiat(user, Decimal::new(100, 0)).unwrap();
        settle_buy(
            &wallets,
            &supply,
            user,
            Decimal::new(100, 0),
            Decimal::new(40_000, 0),
        )
        .unwrap();

        settle_sell(
            &wallets,
            &supply,
            user,
            Decimal::new(40_000, 0),
            Decimal::new(140, 0),
        )
        .unwrap();

        let wallet = wallets.wallet(user).unwrap();
        assert_eq!(wallet.token_balance, Decimal::ZERO);
        assert_eq!(wallet.fiat_balance, Decimal::new(140, 0));

        let snap = supply.snapshot().unwrap();
        assert_eq!(snap.distributed_supply, Decimal::ZERO);
        assert_eq!(snap.user_supply_remaining, Decimal::new(1_000_000, 0));
    }

    #[test]
    fn sell_insufficient_tokens_mutates_nothing() {
        let (wallets, supply, user) = setup(1_000_000);
        wallets.deposit_fiat(user, Decimal::new(100, 0)).unwrap();

        let err = settle_sell(
            &wallets,
            &supply,
            user,
            Decimal::new(10, 0),
            Decimal::new(1, 0),
        )
        .unwrap_err();
        assert!(matches!(err, PoolmintError::InsufficientBalance { .. }));
        assert_eq!(wallets.wallet(user).unwrap().fiat_balance, Decimal::new(100, 0));
    }

    #[test]
    fn reverse_buy_restores_both_stores() {
        let (wallets, supply, user) = setup(1_000_000);
        wallets.deposit_fiat(user, Decimal::new(100, 0)).unwrap();
        settle_buy(
            &wallets,
            &supply,
            user,
            Decimal::new(100, 0),
            Decimal::new(40_000, 0),
        )
        .unwrap();

        reverse_buy(
            &wallets,
            &supply,
            user,
            Decimal::new(100, 0),
            Decimal::new(40_000, 0),
        )
        .unwrap();

        let wallet = wallets.wallet(user).unwrap();
        assert_eq!(wallet.fiat_balance, Decimal::new(100, 0));
        assert_eq!(wallet.token_balance, Decimal::ZERO);
        let snap = supply.snapshot().unwrap();
        assert_eq!(snap.user_supply_remaining, Decimal::new(1_000_000, 0));
    }

    #[test]
    fn audit_stays_valid_across_buy_sell_cycles() {
        let (wallets, supply, user) = setup(1_000_000);
        wallets.deposit_fiat(user, Decimal::new(1000, 0)).unwrap();

        for _ in 0..3 {
            settle_buy(
                &wallets,
                &supply,
                user,
                Decimal::new(100, 0),
                Decimal::new(30_000, 0),
            )
            .unwrap();
            settle_sell(
                &wallets,
                &supply,
                user,
                Decimal::new(30_000, 0),
                Decimal::new(100, 0),
            )
            .unwrap();
        }

        let audit = supply.validate(&wallets).unwrap();
        assert!(audit.is_valid, "discrepancy: {}", audit.discrepancy);
    }
}
