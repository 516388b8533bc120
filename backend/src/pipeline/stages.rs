//! The four decision stages, evaluated in strict order by `pipeline::decide`.
//! Each stage either commits a decision or defers to the next one; stages
//! never write anything beyond what they themselves decide — all other
//! inventory/fairness mutation happens in the orchestrator, after a stage
//! has committed.

use crate::config::EngineConfig;
use crate::fairness;
use crate::models::{Adjustments, BudgetTier, DecisionSource, ForceTarget, Tier};
use crate::store::Store;

/// A staged decision, before prize/tier is resolved into a `DrawDecision`.
pub struct StagedChoice {
    pub source: DecisionSource,
    /// Set when the stage already picked an exact prize (preset, or an
    /// override that forces a prize).
    pub forced_prize_id: Option<u64>,
    /// Set when the stage only fixes a tier floor/ceiling, leaving prize
    /// selection to weighted sampling within it.
    pub tier_floor: Option<Tier>,
    pub adjustments: Adjustments,
}

/// Stage 1: preset queue.
pub fn try_preset(store: &mut dyn Store, campaign_id: u64, now: i64) -> Option<StagedChoice> {
    let entry = store.claim_preset_entry(campaign_id, now)?;
    Some(StagedChoice {
        source: DecisionSource::Preset,
        forced_prize_id: Some(entry.chosen_prize_id()),
        tier_floor: None,
        adjustments: Adjustments::none(),
    })
}

/// Stage 2: admin override directive.
pub fn try_override(store: &mut dyn Store, user_id: u64, campaign_id: u64, now: i64) -> Option<StagedChoice> {
    let directives = store.claim_active_directives(user_id, campaign_id, now);
    // Deterministic tie-break when more than one directive matches: the
    // directive with the lowest id wins.
    let chosen = directives.into_iter().min_by_key(|d| d.directive_id())?;
    store.put_override_directive(chosen.clone());

    let (forced_prize_id, tier_floor) = match chosen.force() {
        ForceTarget::Prize(prize_id) => (Some(prize_id), None),
        ForceTarget::Tier(tier) => (None, Some(tier)),
    };
    Some(StagedChoice {
        source: DecisionSource::Override,
        forced_prize_id,
        tier_floor,
        adjustments: Adjustments::none(),
    })
}

/// Stage 3: guarantee rules.
pub fn try_guarantee(store: &mut dyn Store, config: &EngineConfig, user_id: u64, campaign_id: u64) -> Option<StagedChoice> {
    let counters = store.get_fairness_counters(user_id, campaign_id);

    if config.guarantee.guarantee_first_draw && counters.draws_total() == 0 {
        return Some(StagedChoice {
            source: DecisionSource::Guarantee,
            forced_prize_id: None,
            tier_floor: Some(Tier::Low),
            adjustments: Adjustments::none(),
        });
    }

    if let Some(every_nth) = config.guarantee.every_nth_draw {
        if every_nth > 0 && (counters.draws_total() + 1) % every_nth == 0 {
            return Some(StagedChoice {
                source: DecisionSource::Guarantee,
                forced_prize_id: None,
                tier_floor: Some(Tier::Mid),
                adjustments: Adjustments::none(),
            });
        }
    }

    None
}

/// Classify a campaign's remaining budget into B0..B3. `None` when
/// the campaign does not track a budget pool at all.
pub fn classify_budget_tier(config: &EngineConfig, effective_budget: i64) -> BudgetTier {
    let t = &config.budget_tiers;
    if effective_budget >= t.high {
        BudgetTier::B3
    } else if effective_budget >= t.mid {
        BudgetTier::B2
    } else if effective_budget >= t.low {
        BudgetTier::B1
    } else {
        BudgetTier::B0
    }
}

/// Which tiers `budget_tier` permits, lowest tier first.
pub fn permitted_tiers(budget_tier: BudgetTier) -> &'static [Tier] {
    match budget_tier {
        BudgetTier::B0 => &[Tier::Empty, Tier::Fallback],
        BudgetTier::B1 => &[Tier::Empty, Tier::Fallback, Tier::Low],
        BudgetTier::B2 => &[Tier::Empty, Tier::Fallback, Tier::Low, Tier::Mid],
        BudgetTier::B3 => &[Tier::Empty, Tier::Fallback, Tier::Low, Tier::Mid, Tier::High],
    }
}

/// Stage 4 fairness adjustment bundle, computed ahead of weighted sampling.
pub struct NormalAdjustments {
    pub luck_debt_multiplier: f64,
    pub force_non_empty: bool,
    pub cap_high: bool,
}

pub fn compute_normal_adjustments(store: &mut dyn Store, config: &EngineConfig, user_id: u64, campaign_id: u64) -> NormalAdjustments {
    let luck_debt_multiplier = fairness::luck_debt_multiplier(
        store,
        campaign_id,
        config.fairness.expected_empty_rate,
        config.fairness.luck_debt_min_sample,
    );
    let force_non_empty = fairness::should_force_non_empty(store, user_id, campaign_id, config.fairness.force_threshold);
    let cap_high = fairness::should_cap_high(store, user_id, campaign_id, config.fairness.high_streak_threshold);
    NormalAdjustments { luck_debt_multiplier, force_non_empty, cap_high }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_tier_boundaries_match_thresholds() {
        let config = EngineConfig::new([0u8; 32]);
        assert_eq!(classify_budget_tier(&config, 0), BudgetTier::B0);
        assert_eq!(classify_budget_tier(&config, 100), BudgetTier::B1);
        assert_eq!(classify_budget_tier(&config, 500), BudgetTier::B2);
        assert_eq!(classify_budget_tier(&config, 1000), BudgetTier::B3);
    }

    #[test]
    fn b0_permits_only_empty_and_fallback() {
        let tiers = permitted_tiers(BudgetTier::B0);
        assert_eq!(tiers, &[Tier::Empty, Tier::Fallback]);
    }
}
