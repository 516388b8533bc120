//! Central error taxonomy.
//!
//! Components return their own narrow `thiserror` enums; this is the single
//! place those get flattened into the externally-visible kind/code the
//! response envelope exposes. No component maps to an HTTP-equivalent code
//! itself — only `EngineError::http_status`/`code` does, so adding a new
//! transport never means touching ledger/inventory/pipeline code.

use thiserror::Error;

use crate::fairness::FairnessError;
use crate::idempotency::IdempotencyError;
use crate::inventory::InventoryError;
use crate::ledger::LedgerError;
use crate::models::{BalanceError, ItemInstanceError};
use crate::pipeline::PipelineError;

/// Engine-wide error. Every variant names the category of failure it represents.
#[derive(Debug, Error)]
pub enum EngineError {
    // -- Validation (400) --
    #[error("campaign {0} not found")]
    CampaignNotFound(String),
    #[error("invalid draw_count {0}; must be one of 1, 3, 5, 10")]
    InvalidDrawCount(u32),
    #[error("missing Idempotency-Key")]
    MissingIdempotencyKey,

    // -- Authorization (401/403) --
    #[error("user {0} is not eligible to draw on this campaign")]
    NotEligible(u64),

    // -- Resource (404) --
    #[error("campaign {0} is not active")]
    CampaignNotActive(u64),
    #[error("prize {0} not found")]
    PrizeNotFound(u64),
    #[error("user {0} not found")]
    UserNotFound(u64),

    // -- Conflict (409) --
    #[error("idempotency key conflict for key {0}")]
    IdempotencyKeyConflict(String),

    // -- Quota (429) --
    #[error("user {0} exceeded the daily draw quota")]
    QuotaExceeded(u64),

    // -- Exhaustion (retriable) --
    #[error("no awardable prize for campaign {0}")]
    NoAwardablePrize(u64),

    // -- Validation: insufficient balance --
    #[error("insufficient points: required {required}, available {available}")]
    InsufficientPoints { required: i64, available: i64 },

    // -- Transient (retried once internally by the caller) --
    #[error("transient store contention: {0}")]
    Transient(String),

    // -- Internal --
    #[error("internal invariant violation: {0}")]
    Internal(String),
}

/// HTTP-equivalent mapping, exercised by tests without binding to any HTTP
/// server crate (transport itself is out of scope).
impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::CampaignNotFound(_) => "CAMPAIGN_NOT_FOUND",
            EngineError::InvalidDrawCount(_) => "INVALID_DRAW_COUNT",
            EngineError::MissingIdempotencyKey => "MISSING_IDEMPOTENCY_KEY",
            EngineError::NotEligible(_) => "NOT_ELIGIBLE",
            EngineError::CampaignNotActive(_) => "CAMPAIGN_NOT_ACTIVE",
            EngineError::PrizeNotFound(_) => "PRIZE_NOT_FOUND",
            EngineError::UserNotFound(_) => "USER_NOT_FOUND",
            EngineError::IdempotencyKeyConflict(_) => "IDEMPOTENCY_KEY_CONFLICT",
            EngineError::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            EngineError::NoAwardablePrize(_) => "NO_AWARDABLE_PRIZE",
            EngineError::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            EngineError::Transient(_) => "TRANSIENT_DB",
            EngineError::Internal(_) => "INTERNAL",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            EngineError::CampaignNotFound(_) | EngineError::PrizeNotFound(_) | EngineError::UserNotFound(_) => 404,
            EngineError::InvalidDrawCount(_)
            | EngineError::MissingIdempotencyKey
            | EngineError::InsufficientPoints { .. } => 400,
            EngineError::NotEligible(_) | EngineError::CampaignNotActive(_) => 403,
            EngineError::IdempotencyKeyConflict(_) => 409,
            EngineError::QuotaExceeded(_) => 429,
            EngineError::NoAwardablePrize(_) | EngineError::Transient(_) => 503,
            EngineError::Internal(_) => 500,
        }
    }

    /// Whether a caller may safely retry the same `Idempotency-Key`.
    pub fn is_retriable(&self) -> bool {
        matches!(self, EngineError::Transient(_) | EngineError::NoAwardablePrize(_))
    }
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance { required, available } => {
                EngineError::InsufficientPoints { required, available }
            }
            LedgerError::DuplicateTransaction(key) => EngineError::IdempotencyKeyConflict(key),
            LedgerError::LockTimeout => EngineError::Transient("balance lock timeout".to_string()),
        }
    }
}

impl From<IdempotencyError> for EngineError {
    fn from(err: IdempotencyError) -> Self {
        match err {
            IdempotencyError::Conflict(key) => EngineError::IdempotencyKeyConflict(key),
        }
    }
}

impl From<InventoryError> for EngineError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::PrizeNotFound(id) => EngineError::PrizeNotFound(id),
            InventoryError::CampaignNotFound(id) => EngineError::CampaignNotFound(id.to_string()),
        }
    }
}

impl From<FairnessError> for EngineError {
    fn from(err: FairnessError) -> Self {
        match err {
            FairnessError::Invariant(msg) => EngineError::Internal(msg),
        }
    }
}

impl From<PipelineError> for EngineError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoAwardablePrize(campaign_id) => EngineError::NoAwardablePrize(campaign_id),
        }
    }
}

impl From<BalanceError> for EngineError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::InsufficientBalance { required, available } => {
                EngineError::InsufficientPoints { required, available }
            }
        }
    }
}

impl From<ItemInstanceError> for EngineError {
    fn from(err: ItemInstanceError) -> Self {
        EngineError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let err = EngineError::IdempotencyKeyConflict("k".to_string());
        assert_eq!(err.http_status(), 409);
        assert_eq!(err.code(), "IDEMPOTENCY_KEY_CONFLICT");
    }

    #[test]
    fn no_awardable_prize_is_retriable() {
        assert!(EngineError::NoAwardablePrize(1).is_retriable());
        assert!(!EngineError::Internal("x".to_string()).is_retriable());
    }
}
