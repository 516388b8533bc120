//! Decision pipeline: given a user/campaign, produce one `DrawDecision`.
//!
//! Stages are tried in strict order (preset -> override -> guarantee ->
//! normal); the first to commit wins. The pipeline only ever reads
//! fairness/inventory state and consumes its own preset/override rows — it
//! never mutates inventory, budget, or fairness counters itself. Those
//! mutations, and what to do when a forced tier can't be backed by stock or
//! budget, are the orchestrator's responsibility, since only
//! the orchestrator knows whether the whole draw should roll back.

pub mod rng;
pub mod sampling;
pub mod stages;

use thiserror::Error;

use crate::config::EngineConfig;
use crate::models::{Adjustments, DecisionSource, Tier};
use crate::pipeline::rng::RngManager;
use crate::pipeline::sampling::TierWeight;
use crate::store::Store;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("no awardable prize for campaign {0}")]
    NoAwardablePrize(u64),
}

/// A chosen tier/prize pair plus everything a `DrawDecision` needs to record
/// it, and whether the orchestrator should treat an inventory/budget
/// shortfall as debt (forced award) rather than a retry.
pub struct PipelineDecision {
    pub source: DecisionSource,
    pub tier: Tier,
    pub prize_id: Option<u64>,
    pub adjustments: Adjustments,
    pub forced: bool,
}

#[allow(clippy::too_many_arguments)]
pub fn decide(
    store: &mut dyn Store,
    config: &EngineConfig,
    rng: &mut RngManager,
    user_id: u64,
    campaign_id: u64,
    effective_budget: i64,
    now: i64,
) -> Result<PipelineDecision, PipelineError> {
    let all_prizes = store.prizes_for_campaign(campaign_id);

    if let Some(choice) = stages::try_preset(store, campaign_id, now) {
        let prize_id = choice.forced_prize_id.expect("preset always forces a prize");
        let tier = all_prizes.iter().find(|p| p.prize_id() == prize_id).map(|p| p.tier()).unwrap_or(Tier::Fallback);
        return Ok(PipelineDecision {
            source: choice.source,
            tier,
            prize_id: Some(prize_id),
            adjustments: choice.adjustments,
            forced: true,
        });
    }

    if let Some(choice) = stages::try_override(store, user_id, campaign_id, now) {
        if let Some(prize_id) = choice.forced_prize_id {
            let tier = all_prizes.iter().find(|p| p.prize_id() == prize_id).map(|p| p.tier()).unwrap_or(Tier::Fallback);
            return Ok(PipelineDecision {
                source: choice.source,
                tier,
                prize_id: Some(prize_id),
                adjustments: choice.adjustments,
                forced: true,
            });
        }
        let tier = choice.tier_floor.expect("override sets a prize or a tier floor");
        let prize = sampling::sample_prize(rng, &all_prizes, tier);
        return Ok(PipelineDecision {
            source: choice.source,
            tier,
            prize_id: prize.map(|p| p.prize_id()),
            adjustments: choice.adjustments,
            forced: true,
        });
    }

    if let Some(choice) = stages::try_guarantee(store, config, user_id, campaign_id) {
        let floor = choice.tier_floor.expect("guarantee always sets a tier floor");
        let budget_tier = stages::classify_budget_tier(config, effective_budget);
        let permitted: Vec<Tier> = stages::permitted_tiers(budget_tier).iter().copied().filter(|t| *t >= floor).collect();
        let weights = tier_weights_for(&all_prizes, &permitted, Adjustments::none());
        let tier = sampling::sample_tier(rng, &weights).unwrap_or(floor);
        let prize = sampling::sample_prize(rng, &all_prizes, tier);
        return Ok(PipelineDecision {
            source: choice.source,
            tier,
            prize_id: prize.map(|p| p.prize_id()),
            adjustments: choice.adjustments,
            forced: true,
        });
    }

    normal_draw(store, config, rng, user_id, campaign_id, effective_budget, &all_prizes)
}

fn tier_weights_for(
    prizes: &[crate::models::LotteryPrize],
    permitted: &[Tier],
    adjustments: Adjustments,
) -> Vec<TierWeight> {
    permitted
        .iter()
        .map(|&tier| {
            let mut weight: f64 = prizes.iter().filter(|p| p.tier() == tier && p.is_in_stock()).map(|p| p.weight() as f64).sum();
            if tier != Tier::Empty && tier != Tier::Fallback {
                weight *= adjustments.luck_debt_multiplier;
            }
            TierWeight { tier, weight }
        })
        .collect()
}

fn normal_draw(
    store: &mut dyn Store,
    config: &EngineConfig,
    rng: &mut RngManager,
    user_id: u64,
    campaign_id: u64,
    effective_budget: i64,
    all_prizes: &[crate::models::LotteryPrize],
) -> Result<PipelineDecision, PipelineError> {
    let budget_tier = stages::classify_budget_tier(config, effective_budget);
    let permitted = stages::permitted_tiers(budget_tier);

    let normal_adjustments = stages::compute_normal_adjustments(store, config, user_id, campaign_id);
    let mut adjustments = Adjustments {
        budget_tier: Some(budget_tier),
        luck_debt_multiplier: normal_adjustments.luck_debt_multiplier,
        anti_empty_forced: false,
        anti_high_capped: false,
    };

    let weights = tier_weights_for(all_prizes, permitted, adjustments);
    let mut tier = sampling::sample_tier(rng, &weights).ok_or(PipelineError::NoAwardablePrize(campaign_id))?;
    let mut forced = false;

    if normal_adjustments.force_non_empty && tier == Tier::Empty {
        let lowest_non_empty = [Tier::Fallback, Tier::Low, Tier::Mid, Tier::High]
            .into_iter()
            .find(|t| permitted.contains(t) && all_prizes.iter().any(|p| p.tier() == *t && p.is_in_stock()))
            .unwrap_or(Tier::Fallback);
        tier = lowest_non_empty;
        adjustments.anti_empty_forced = true;
        forced = true;
    }

    if normal_adjustments.cap_high && tier == Tier::High {
        tier = Tier::Mid;
        adjustments.anti_high_capped = true;
        crate::fairness::start_high_cooldown(store, user_id, campaign_id, config.fairness.cooldown_draws);
    }

    let prize = sampling::sample_prize(rng, all_prizes, tier);
    if prize.is_none() && !forced {
        return Err(PipelineError::NoAwardablePrize(campaign_id));
    }

    Ok(PipelineDecision {
        source: DecisionSource::Normal,
        tier,
        prize_id: prize.map(|p| p.prize_id()),
        adjustments,
        forced,
    })
}
