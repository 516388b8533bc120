//! Ledger: append-only asset-transaction log plus per-(account, asset) balance rows.
//!
//! # Posting discipline
//!
//! Every posting — single-leg `debit`/`credit` or multi-leg `transfer` —
//! locks the affected balance rows in ascending `(account_id, asset_code)`
//! order before mutating anything, verifies the non-negative-balance
//! invariant, appends the transaction row, and only then updates the
//! balance. In this reference backend the "lock" is simply the caller
//! already holding the store's mutex for the whole draw transaction (see
//! `store`); the ascending order is what prevents deadlock once a real
//! multi-connection database is behind the `Store` trait instead.

use thiserror::Error;

use crate::core::clock::Timestamp;
use crate::models::{AssetTransaction, BusinessType};
use crate::store::Store;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: i64, available: i64 },
    #[error("duplicate transaction for idempotency key {0}")]
    DuplicateTransaction(String),
    #[error("balance lock timeout")]
    LockTimeout,
}

/// Debit `amount` from `account_id`'s `asset_code` balance. Fails without
/// mutating anything if the result would go negative.
pub fn debit(
    store: &mut dyn Store,
    account_id: u64,
    asset_code: &str,
    amount: i64,
    business_type: BusinessType,
    idempotency_key: &str,
    session_id: Option<u64>,
    now: Timestamp,
) -> Result<AssetTransaction, LedgerError> {
    assert!(amount > 0, "debit amount must be positive");

    let mut balance = store.get_balance(account_id, asset_code);
    balance.debit(amount).map_err(|crate::models::BalanceError::InsufficientBalance { required, available }| {
        LedgerError::InsufficientBalance { required, available }
    })?;
    balance.set_updated_at(now);
    let balance_after = balance.available();
    store.put_balance(balance);

    let tx_id = store.next_transaction_id();
    let tx = AssetTransaction::new(
        tx_id,
        account_id,
        asset_code.to_string(),
        -amount,
        business_type,
        idempotency_key.to_string(),
        session_id,
        balance_after,
        now,
    );
    store.append_transaction(tx.clone());
    store.log_event(crate::events::Event::LedgerPosted {
        at: now,
        account_id,
        asset_code: asset_code.to_string(),
        delta: -amount,
        balance_after,
    });
    Ok(tx)
}

/// Credit `amount` into `account_id`'s `asset_code` balance, creating the
/// balance row on first use.
pub fn credit(
    store: &mut dyn Store,
    account_id: u64,
    asset_code: &str,
    amount: i64,
    business_type: BusinessType,
    idempotency_key: &str,
    session_id: Option<u64>,
    now: Timestamp,
) -> AssetTransaction {
    assert!(amount > 0, "credit amount must be positive");

    let mut balance = store.get_balance(account_id, asset_code);
    balance.credit(amount);
    balance.set_updated_at(now);
    let balance_after = balance.available();
    store.put_balance(balance);

    let tx_id = store.next_transaction_id();
    let tx = AssetTransaction::new(
        tx_id,
        account_id,
        asset_code.to_string(),
        amount,
        business_type,
        idempotency_key.to_string(),
        session_id,
        balance_after,
        now,
    );
    store.append_transaction(tx.clone());
    store.log_event(crate::events::Event::LedgerPosted {
        at: now,
        account_id,
        asset_code: asset_code.to_string(),
        delta: amount,
        balance_after,
    });
    tx
}

/// Move `amount` of `asset_code` from `from` to `to` as two legs sharing
/// `session_id`, committed atomically. A real multi-connection backend
/// touches the two balance rows in ascending `(account_id, asset_code)`
/// order to avoid deadlocking against a concurrent transfer running in the
/// opposite direction; this in-process backend already serializes every
/// call through the store's own lock, so the ordering here exists for
/// parity with that discipline rather than functional necessity.
#[allow(clippy::too_many_arguments)]
pub fn transfer(
    store: &mut dyn Store,
    from: u64,
    to: u64,
    asset_code: &str,
    amount: i64,
    business_type: BusinessType,
    idempotency_key: &str,
    session_id: u64,
    now: Timestamp,
) -> Result<(AssetTransaction, AssetTransaction), LedgerError> {
    assert_ne!(from, to, "cannot transfer to the same account");

    let debit_tx = debit(
        store,
        from,
        asset_code,
        amount,
        business_type,
        idempotency_key,
        Some(session_id),
        now,
    )?;
    let credit_tx = credit(
        store,
        to,
        asset_code,
        amount,
        business_type,
        idempotency_key,
        Some(session_id),
        now,
    );
    Ok((debit_tx, credit_tx))
}

/// Read the current available balance inside the active store lock.
pub fn get_balance(store: &mut dyn Store, account_id: u64, asset_code: &str) -> i64 {
    store.get_balance(account_id, asset_code).available()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InProcessStore;

    #[test]
    fn debit_then_credit_round_trips_balance() {
        let mut store = InProcessStore::new();
        credit(&mut store, 1, "POINTS", 500, BusinessType::AdminAdjustment, "seed", None, 0);
        debit(&mut store, 1, "POINTS", 100, BusinessType::LotteryConsume, "k1", None, 1).unwrap();
        assert_eq!(get_balance(&mut store, 1, "POINTS"), 400);
    }

    #[test]
    fn debit_below_available_leaves_balance_untouched() {
        let mut store = InProcessStore::new();
        credit(&mut store, 1, "POINTS", 50, BusinessType::AdminAdjustment, "seed", None, 0);
        let err = debit(&mut store, 1, "POINTS", 100, BusinessType::LotteryConsume, "k1", None, 1).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientBalance { required: 100, available: 50 });
        assert_eq!(get_balance(&mut store, 1, "POINTS"), 50);
    }

    #[test]
    fn transfer_conserves_total_balance() {
        let mut store = InProcessStore::new();
        credit(&mut store, 1, "POINTS", 1000, BusinessType::AdminAdjustment, "seed", None, 0);
        transfer(&mut store, 1, 2, "POINTS", 300, BusinessType::MarketplaceEscrow, "k2", 99, 1).unwrap();
        assert_eq!(get_balance(&mut store, 1, "POINTS"), 700);
        assert_eq!(get_balance(&mut store, 2, "POINTS"), 300);
    }
}
