//! Account model
//!
//! An account is the unit that owns asset balances. Every user has a `user`
//! account created lazily on first balance mutation; `system`/`pool` accounts
//! back campaign payout pools and platform-level bookkeeping.
//!
//! CRITICAL: account identity never changes after creation; `account_id` is
//! the join key for every AssetBalance and AssetTransaction row.

use serde::{Deserialize, Serialize};

/// Kind of account, used to decide which invariants apply (e.g. a `pool`
/// account may legitimately run negative as the other leg of a payout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// A real end user.
    User,
    /// Platform-owned housekeeping account (fees, adjustments).
    System,
    /// Per-campaign payout pool backing material/points awards.
    Pool,
}

/// An account owning zero or more [`crate::models::balance::AssetBalance`] rows.
///
/// # Example
/// ```
/// use lottery_engine_core::models::account::{Account, AccountType};
///
/// let account = Account::new(1, Some(42), AccountType::User);
/// assert_eq!(account.owner_user_id(), Some(42));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: u64,
    owner_user_id: Option<u64>,
    account_type: AccountType,
}

impl Account {
    /// Create a new account.
    ///
    /// `owner_user_id` is `None` for `system`/`pool` accounts.
    pub fn new(id: u64, owner_user_id: Option<u64>, account_type: AccountType) -> Self {
        assert!(
            account_type != AccountType::User || owner_user_id.is_some(),
            "a user account must have an owner_user_id"
        );
        Self {
            id,
            owner_user_id,
            account_type,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn owner_user_id(&self) -> Option<u64> {
        self.owner_user_id
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }
}
