//! Weighted sampling helpers used by the normal-draw stage.

use crate::models::{LotteryPrize, Tier};
use crate::pipeline::rng::RngManager;

/// A tier candidate with its computed (post-adjustment) weight.
#[derive(Debug, Clone, Copy)]
pub struct TierWeight {
    pub tier: Tier,
    pub weight: f64,
}

/// Draw one tier from `weights` by weighted random selection. Weights with
/// zero or negative value are never selected. Returns `None` if every
/// weight is non-positive.
pub fn sample_tier(rng: &mut RngManager, weights: &[TierWeight]) -> Option<Tier> {
    let total: f64 = weights.iter().map(|w| w.weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut pick = rng.next_unit() * total;
    for w in weights {
        let positive = w.weight.max(0.0);
        if pick < positive {
            return Some(w.tier);
        }
        pick -= positive;
    }
    weights.last().map(|w| w.tier)
}

/// Pick a prize within `tier` weighted by `weight × (in_stock ? 1 : 0)`,
/// ties broken by lowest `prize_id`. Returns `None` if no prize in the tier
/// is currently awardable.
pub fn sample_prize<'a>(rng: &mut RngManager, prizes: &'a [LotteryPrize], tier: Tier) -> Option<&'a LotteryPrize> {
    let mut candidates: Vec<&LotteryPrize> =
        prizes.iter().filter(|p| p.tier() == tier && p.is_in_stock()).collect();
    candidates.sort_by_key(|p| p.prize_id());

    let total: u32 = candidates.iter().map(|p| p.weight()).sum();
    if total == 0 {
        return None;
    }
    let mut pick = rng.next_below(total as u64) as u32;
    for prize in &candidates {
        if pick < prize.weight() {
            return Some(prize);
        }
        pick -= prize.weight();
    }
    candidates.first().copied()
}
