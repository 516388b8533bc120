//! Asset balance model
//!
//! One row per (account, asset_code). `available` is the spendable amount;
//! `frozen` tracks escrow-style holds the marketplace stub can place on an
//! account without the ledger needing to know about listings.
//!
//! CRITICAL: all amounts are i64 minor units (points are already integral;
//! no fractional points exist in this engine).

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type AssetCode = String;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BalanceError {
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: i64, available: i64 },
}

/// Available and frozen amount of one asset held by one account.
///
/// # Example
/// ```
/// use lottery_engine_core::models::balance::AssetBalance;
///
/// let mut balance = AssetBalance::new(1, "POINTS".to_string());
/// balance.credit(100);
/// assert_eq!(balance.available(), 100);
/// balance.debit(30).unwrap();
/// assert_eq!(balance.available(), 70);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetBalance {
    account_id: u64,
    asset_code: AssetCode,
    available: i64,
    frozen: i64,
    updated_at: i64,
}

impl AssetBalance {
    /// Create a zeroed balance row for `(account_id, asset_code)`.
    pub fn new(account_id: u64, asset_code: AssetCode) -> Self {
        Self {
            account_id,
            asset_code,
            available: 0,
            frozen: 0,
            updated_at: 0,
        }
    }

    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    pub fn asset_code(&self) -> &str {
        &self.asset_code
    }

    pub fn available(&self) -> i64 {
        self.available
    }

    pub fn frozen(&self) -> i64 {
        self.frozen
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// Increase `available` by `amount`. `amount` must be non-negative.
    pub fn credit(&mut self, amount: i64) {
        assert!(amount >= 0, "credit amount must be non-negative");
        self.available += amount;
    }

    /// Decrease `available` by `amount`, failing if it would go negative.
    pub fn debit(&mut self, amount: i64) -> Result<(), BalanceError> {
        assert!(amount >= 0, "debit amount must be non-negative");
        if self.available < amount {
            return Err(BalanceError::InsufficientBalance {
                required: amount,
                available: self.available,
            });
        }
        self.available -= amount;
        Ok(())
    }

    pub(crate) fn set_updated_at(&mut self, at: i64) {
        self.updated_at = at;
    }
}
