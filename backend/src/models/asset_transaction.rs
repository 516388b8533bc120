//! Asset transaction model
//!
//! An append-only ledger row. Every balance mutation produces exactly one of
//! these; the transaction log is the system's audit trail and, together with
//! `lottery_draw_decisions`, its event log (see `events`).
//!
//! CRITICAL: instances are never mutated after construction. `balance_after`
//! is stamped once, at append time, inside the same lock as the balance
//! update it describes.

use serde::{Deserialize, Serialize};

use crate::models::balance::AssetCode;

/// Why an asset moved. Closed set so downstream readers (accounting,
/// localization) can exhaustively match without a fallback branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    LotteryConsume,
    LotteryReward,
    MarketplaceEscrow,
    MarketplaceRelease,
    AdminAdjustment,
}

/// One append-only ledger entry.
///
/// # Example
/// ```
/// use lottery_engine_core::models::asset_transaction::{AssetTransaction, BusinessType};
///
/// let tx = AssetTransaction::new(
///     1, 7, "POINTS".to_string(), -100, BusinessType::LotteryConsume,
///     "idem-key-1".to_string(), None, 400, 0,
/// );
/// assert_eq!(tx.balance_after(), 400);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetTransaction {
    transaction_id: u64,
    account_id: u64,
    asset_code: AssetCode,
    delta: i64,
    business_type: BusinessType,
    idempotency_key: String,
    lottery_session_id: Option<u64>,
    balance_after: i64,
    created_at: i64,
}

impl AssetTransaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transaction_id: u64,
        account_id: u64,
        asset_code: AssetCode,
        delta: i64,
        business_type: BusinessType,
        idempotency_key: String,
        lottery_session_id: Option<u64>,
        balance_after: i64,
        created_at: i64,
    ) -> Self {
        assert!(delta != 0, "a transaction must move a non-zero amount");
        Self {
            transaction_id,
            account_id,
            asset_code,
            delta,
            business_type,
            idempotency_key,
            lottery_session_id,
            balance_after,
            created_at,
        }
    }

    pub fn transaction_id(&self) -> u64 {
        self.transaction_id
    }

    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    pub fn asset_code(&self) -> &str {
        &self.asset_code
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }

    pub fn business_type(&self) -> BusinessType {
        self.business_type
    }

    pub fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }

    pub fn lottery_session_id(&self) -> Option<u64> {
        self.lottery_session_id
    }

    pub fn balance_after(&self) -> i64 {
        self.balance_after
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}
