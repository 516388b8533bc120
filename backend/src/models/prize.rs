//! Lottery prize model
//!
//! Each prize belongs to exactly one tier within a campaign and carries two
//! distinct point values: `prize_value_points` (what the user sees credited)
//! and `budget_value_points` (what it costs against the campaign's budget
//! pool) — these differ when a material/item prize is valued differently
//! for accounting than for display.

use serde::{Deserialize, Serialize};

/// Coarse prize class used by fairness adjustments and guarantee rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Empty,
    Fallback,
    Low,
    Mid,
    High,
}

/// What a prize pays out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payout {
    Points,
    Asset { asset_code: String },
    Item { item_template_id: u64 },
    Empty,
}

/// A single prize row within a campaign.
///
/// # Example
/// ```
/// use lottery_engine_core::models::prize::{Payout, Tier, LotteryPrize};
///
/// let mut prize = LotteryPrize::new(1, 10, Tier::Mid, Payout::Points, 100, 100, 5, Some(3));
/// assert!(prize.reserve(1));
/// assert_eq!(prize.stock_remaining(), Some(2));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryPrize {
    prize_id: u64,
    campaign_id: u64,
    tier: Tier,
    payout: Payout,
    prize_value_points: i64,
    budget_value_points: i64,
    weight: u32,
    /// `None` means unlimited stock (e.g. a points-only prize).
    stock_remaining: Option<i64>,
}

impl LotteryPrize {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        prize_id: u64,
        campaign_id: u64,
        tier: Tier,
        payout: Payout,
        prize_value_points: i64,
        budget_value_points: i64,
        weight: u32,
        stock_remaining: Option<i64>,
    ) -> Self {
        assert!(prize_value_points >= 0, "prize_value_points cannot be negative");
        assert!(budget_value_points >= 0, "budget_value_points cannot be negative");
        if let Some(stock) = stock_remaining {
            assert!(stock >= 0, "stock_remaining cannot start negative");
        }
        Self {
            prize_id,
            campaign_id,
            tier,
            payout,
            prize_value_points,
            budget_value_points,
            weight,
            stock_remaining,
        }
    }

    pub fn prize_id(&self) -> u64 {
        self.prize_id
    }

    pub fn campaign_id(&self) -> u64 {
        self.campaign_id
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn payout(&self) -> &Payout {
        &self.payout
    }

    pub fn prize_value_points(&self) -> i64 {
        self.prize_value_points
    }

    pub fn budget_value_points(&self) -> i64 {
        self.budget_value_points
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn stock_remaining(&self) -> Option<i64> {
        self.stock_remaining
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_remaining.map(|s| s > 0).unwrap_or(true)
    }

    /// Attempt to decrement stock by `qty`. Returns `false` (no mutation)
    /// when stock is finite and insufficient.
    pub fn reserve(&mut self, qty: i64) -> bool {
        match self.stock_remaining {
            None => true,
            Some(stock) if stock >= qty => {
                self.stock_remaining = Some(stock - qty);
                true
            }
            Some(_) => false,
        }
    }

    pub fn restock(&mut self, qty: i64) {
        assert!(qty >= 0, "restock qty must be non-negative");
        if let Some(stock) = self.stock_remaining {
            self.stock_remaining = Some(stock + qty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_fails_on_insufficient_finite_stock() {
        let mut prize = LotteryPrize::new(1, 1, Tier::High, Payout::Points, 1000, 1000, 1, Some(0));
        assert!(!prize.reserve(1));
        assert_eq!(prize.stock_remaining(), Some(0));
    }

    #[test]
    fn unlimited_stock_always_reserves() {
        let mut prize = LotteryPrize::new(1, 1, Tier::Low, Payout::Points, 10, 10, 1, None);
        assert!(prize.reserve(1_000_000));
        assert_eq!(prize.stock_remaining(), None);
    }

    #[test]
    fn tier_ordering_is_low_to_high() {
        assert!(Tier::Empty < Tier::Fallback);
        assert!(Tier::Fallback < Tier::Low);
        assert!(Tier::Low < Tier::Mid);
        assert!(Tier::Mid < Tier::High);
    }
}
