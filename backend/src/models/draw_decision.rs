//! Draw decision model
//!
//! The append-only audit record produced by the decision pipeline for every
//! draw. Together with `asset_transactions` this is the system's event log:
//! given the same fairness/inventory snapshot and `rng_seed_snapshot`, a
//! decision must be reproducible bit-for-bit.

use serde::{Deserialize, Serialize};

use crate::models::prize::Tier;

/// Which pipeline stage produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Preset,
    Override,
    Guarantee,
    Normal,
}

/// Which tier-weight adjustments were in effect for a `Normal` decision.
/// Non-`Normal` decisions carry `Adjustments::none()` rather than special-
/// casing serialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    pub budget_tier: Option<BudgetTier>,
    pub luck_debt_multiplier: f64,
    pub anti_empty_forced: bool,
    pub anti_high_capped: bool,
}

impl Adjustments {
    pub fn none() -> Self {
        Self {
            budget_tier: None,
            luck_debt_multiplier: 1.0,
            anti_empty_forced: false,
            anti_high_capped: false,
        }
    }
}

/// Coarse classification of the campaign's remaining budget at decision time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    B0,
    B1,
    B2,
    B3,
}

/// Exactly how many CSPRNG draws this decision consumed, and from what
/// stream position, so it can be replayed without re-running earlier draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngSnapshot {
    pub stream_position: u64,
    pub draws_consumed: u32,
}

/// One audit record: the full context behind one awarded (or empty) prize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawDecision {
    draw_id: u64,
    user_id: u64,
    campaign_id: u64,
    session_id: u64,
    source: DecisionSource,
    chosen_tier: Tier,
    chosen_prize_id: Option<u64>,
    rng_seed_snapshot: RngSnapshot,
    adjustments: Adjustments,
    created_at: i64,
}

impl DrawDecision {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        draw_id: u64,
        user_id: u64,
        campaign_id: u64,
        session_id: u64,
        source: DecisionSource,
        chosen_tier: Tier,
        chosen_prize_id: Option<u64>,
        rng_seed_snapshot: RngSnapshot,
        adjustments: Adjustments,
        created_at: i64,
    ) -> Self {
        Self {
            draw_id,
            user_id,
            campaign_id,
            session_id,
            source,
            chosen_tier,
            chosen_prize_id,
            rng_seed_snapshot,
            adjustments,
            created_at,
        }
    }

    pub fn draw_id(&self) -> u64 {
        self.draw_id
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn campaign_id(&self) -> u64 {
        self.campaign_id
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn source(&self) -> DecisionSource {
        self.source
    }

    pub fn chosen_tier(&self) -> Tier {
        self.chosen_tier
    }

    pub fn chosen_prize_id(&self) -> Option<u64> {
        self.chosen_prize_id
    }

    pub fn rng_seed_snapshot(&self) -> RngSnapshot {
        self.rng_seed_snapshot
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_adjustments_are_no_op() {
        let adjustments = Adjustments::none();
        assert_eq!(adjustments.luck_debt_multiplier, 1.0);
        assert!(!adjustments.anti_empty_forced);
    }
}
