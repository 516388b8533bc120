//! Lottery campaign model
//!
//! A campaign bundles a prize pool, a pricing table, a validity window, and
//! the eligibility conditions a user must satisfy to draw from it.

use serde::{Deserialize, Serialize};

use crate::core::clock::TimeWindow;

/// Campaign lifecycle. Draws are only accepted while `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Ended,
}

/// How the campaign's budget pool is governed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetMode {
    /// No budget tracking; stock is the only cap.
    None,
    /// A fixed points pool that is never replenished.
    Fixed,
    /// A pool that can be topped up by admin action between draws.
    Dynamic,
}

/// Allowed batch sizes and their unit economics.
///
/// # Example
/// ```
/// use lottery_engine_core::models::campaign::PricingConfig;
///
/// let pricing = PricingConfig::new(100, 0.9);
/// assert_eq!(pricing.total_cost(10), 900);
/// assert_eq!(pricing.total_cost(1), 100);
/// assert_eq!(pricing.saved_points(10), 100);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricingConfig {
    unit_cost_points: i64,
    ten_draw_discount: f64,
}

impl PricingConfig {
    pub fn new(unit_cost_points: i64, ten_draw_discount: f64) -> Self {
        assert!(unit_cost_points > 0, "unit_cost_points must be positive");
        assert!(
            (0.0..=1.0).contains(&ten_draw_discount),
            "ten_draw_discount must be a fraction of the original cost"
        );
        Self {
            unit_cost_points,
            ten_draw_discount,
        }
    }

    pub fn unit_cost_points(&self) -> i64 {
        self.unit_cost_points
    }

    /// `draw_count` must be one of {1, 3, 5, 10}; validated by the orchestrator.
    pub fn original_cost(&self, draw_count: u32) -> i64 {
        self.unit_cost_points * draw_count as i64
    }

    pub fn total_cost(&self, draw_count: u32) -> i64 {
        let original = self.original_cost(draw_count);
        if draw_count == 10 {
            (original as f64 * self.ten_draw_discount).round() as i64
        } else {
            original
        }
    }

    pub fn saved_points(&self, draw_count: u32) -> i64 {
        self.original_cost(draw_count) - self.total_cost(draw_count)
    }
}

/// Closed eligibility check: role allow-list plus an optional per-day draw cap.
/// Deliberately minimal — a full auth/quota service is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipationConditions {
    allowed_roles: Vec<String>,
    daily_draw_quota: Option<u32>,
}

impl ParticipationConditions {
    pub fn new(allowed_roles: Vec<String>, daily_draw_quota: Option<u32>) -> Self {
        Self {
            allowed_roles,
            daily_draw_quota,
        }
    }

    pub fn unrestricted() -> Self {
        Self {
            allowed_roles: Vec::new(),
            daily_draw_quota: None,
        }
    }

    pub fn role_allowed(&self, role: &str) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.iter().any(|r| r == role)
    }

    pub fn daily_draw_quota(&self) -> Option<u32> {
        self.daily_draw_quota
    }
}

/// A lottery campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryCampaign {
    campaign_id: u64,
    code: String,
    status: CampaignStatus,
    budget_mode: BudgetMode,
    pricing_config: PricingConfig,
    window: TimeWindow,
    participation_conditions: ParticipationConditions,
    budget_pool_remaining: i64,
}

impl LotteryCampaign {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        campaign_id: u64,
        code: String,
        status: CampaignStatus,
        budget_mode: BudgetMode,
        pricing_config: PricingConfig,
        window: TimeWindow,
        participation_conditions: ParticipationConditions,
        budget_pool_remaining: i64,
    ) -> Self {
        assert!(
            budget_pool_remaining >= 0,
            "budget_pool_remaining cannot start negative"
        );
        Self {
            campaign_id,
            code,
            status,
            budget_mode,
            pricing_config,
            window,
            participation_conditions,
            budget_pool_remaining,
        }
    }

    pub fn campaign_id(&self) -> u64 {
        self.campaign_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    pub fn set_status(&mut self, status: CampaignStatus) {
        self.status = status;
    }

    pub fn budget_mode(&self) -> BudgetMode {
        self.budget_mode
    }

    pub fn pricing_config(&self) -> &PricingConfig {
        &self.pricing_config
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn participation_conditions(&self) -> &ParticipationConditions {
        &self.participation_conditions
    }

    pub fn is_open_at(&self, now: i64) -> bool {
        self.status == CampaignStatus::Active && self.window.contains(now)
    }

    pub fn budget_pool_remaining(&self) -> i64 {
        self.budget_pool_remaining
    }

    /// Returns `true` and decrements the pool if enough budget remains.
    pub fn try_reserve_budget(&mut self, amount: i64) -> bool {
        if self.budget_mode == BudgetMode::None {
            return true;
        }
        if self.budget_pool_remaining >= amount {
            self.budget_pool_remaining -= amount;
            true
        } else {
            false
        }
    }

    pub fn top_up_budget(&mut self, amount: i64) {
        assert!(amount >= 0, "top up amount must be non-negative");
        self.budget_pool_remaining += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_draw_discount_rounds() {
        let pricing = PricingConfig::new(33, 0.9);
        assert_eq!(pricing.original_cost(10), 330);
        assert_eq!(pricing.total_cost(10), 297);
        assert_eq!(pricing.saved_points(10), 33);
    }

    #[test]
    fn budget_reservation_respects_pool() {
        let mut campaign = LotteryCampaign::new(
            1,
            "C1".to_string(),
            CampaignStatus::Active,
            BudgetMode::Fixed,
            PricingConfig::new(100, 0.9),
            TimeWindow::new(0, 100),
            ParticipationConditions::unrestricted(),
            50,
        );
        assert!(!campaign.try_reserve_budget(100));
        assert!(campaign.try_reserve_budget(50));
        assert_eq!(campaign.budget_pool_remaining(), 0);
    }

    #[test]
    fn unrestricted_participation_allows_any_role() {
        let conditions = ParticipationConditions::unrestricted();
        assert!(conditions.role_allowed("anything"));
    }
}
