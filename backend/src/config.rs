//! Engine configuration.
//!
//! Every tunable lives here as a typed field, loaded once at construction,
//! separating "what varies between deployments" (this struct) from "what
//! the engine always does" (the component code).

use serde::{Deserialize, Serialize};

/// Which debt class clears first when a single award could repay either
/// kind. A configuration knob rather than a hard-coded guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtClearOrder {
    InventoryFirst,
    BudgetFirst,
}

impl Default for DebtClearOrder {
    fn default() -> Self {
        DebtClearOrder::InventoryFirst
    }
}

/// Budget-pool thresholds classifying a campaign's `effective_budget` into
/// B0..B3 tiers. `low`/`mid`/`high` are the lower bounds of B1/B2/B3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetTierThresholds {
    pub low: i64,
    pub mid: i64,
    pub high: i64,
}

impl Default for BudgetTierThresholds {
    fn default() -> Self {
        Self { low: 100, mid: 500, high: 1000 }
    }
}

/// Guarantee rules evaluated at pipeline stage 3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GuaranteeConfig {
    /// Every `every_nth_draw`-th draw (1-indexed, by `draws_total`) floors
    /// the tier at `Mid`. `None` disables the rule.
    pub every_nth_draw: Option<u64>,
    /// Floors a brand-new user's very first draw at `Low`.
    pub guarantee_first_draw: bool,
}

impl Default for GuaranteeConfig {
    fn default() -> Self {
        Self { every_nth_draw: Some(50), guarantee_first_draw: true }
    }
}

/// Anti-streak and luck-debt tunables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FairnessConfig {
    pub force_threshold: u32,
    pub high_streak_threshold: u32,
    pub cooldown_draws: u32,
    pub expected_empty_rate: f64,
    pub luck_debt_min_sample: u64,
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            force_threshold: 5,
            high_streak_threshold: 5,
            cooldown_draws: 3,
            expected_empty_rate: 0.3,
            luck_debt_min_sample: 10,
        }
    }
}

/// Idempotency TTLs and processing timeout, re-exported here so the whole
/// configuration surface is visible from one struct even though the
/// component's own defaults (`idempotency::DEFAULT_*`) remain the values
/// actually compiled in when a deployment doesn't override them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdempotencyConfig {
    pub ttl_completed_seconds: i64,
    pub ttl_failed_seconds: i64,
    pub processing_timeout_seconds: i64,
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self {
            ttl_completed_seconds: crate::idempotency::DEFAULT_TTL_COMPLETED_SECONDS,
            ttl_failed_seconds: crate::idempotency::DEFAULT_TTL_FAILED_SECONDS,
            processing_timeout_seconds: crate::idempotency::DEFAULT_PROCESSING_TIMEOUT_SECONDS,
        }
    }
}

/// Every tunable the draw-execution pipeline and orchestrator read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub rng_seed: [u8; 32],
    pub budget_tiers: BudgetTierThresholds,
    pub fairness: FairnessConfig,
    pub guarantee: GuaranteeConfig,
    pub idempotency: IdempotencyConfig,
    pub debt_clear_order: DebtClearOrder,
    pub allowed_draw_counts: Vec<u32>,
}

impl EngineConfig {
    pub fn new(rng_seed: [u8; 32]) -> Self {
        Self {
            rng_seed,
            budget_tiers: BudgetTierThresholds::default(),
            fairness: FairnessConfig::default(),
            guarantee: GuaranteeConfig::default(),
            idempotency: IdempotencyConfig::default(),
            debt_clear_order: DebtClearOrder::default(),
            allowed_draw_counts: vec![1, 3, 5, 10],
        }
    }

    pub fn is_allowed_draw_count(&self, draw_count: u32) -> bool {
        self.allowed_draw_counts.contains(&draw_count)
    }
}
