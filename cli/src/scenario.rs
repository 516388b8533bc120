//! Scenario file format: a campaign, its prize table, starting user
//! balances, and an ordered list of draws to submit. Exists to let the
//! engine be driven end-to-end from the command line without standing up
//! the full external API surface.

use std::path::Path;

use lottery_engine_core::core::clock::TimeWindow;
use lottery_engine_core::models::{BudgetMode, CampaignStatus, LotteryCampaign, LotteryPrize, ParticipationConditions, Payout, PricingConfig, Tier};
use serde::Deserialize;

/// Every scenario describes exactly one campaign, `campaign_id` 1. Running
/// several campaigns at once would need several scenario files and fresh
/// stores, which this runner deliberately doesn't try to orchestrate.
const CAMPAIGN_ID: u64 = 1;

#[derive(Debug, Deserialize)]
pub struct ScenarioCampaign {
    pub code: String,
    pub status: CampaignStatus,
    pub budget_mode: BudgetMode,
    pub unit_cost_points: i64,
    pub ten_draw_discount: f64,
    pub window: TimeWindow,
    #[serde(default)]
    pub allowed_roles: Vec<String>,
    #[serde(default)]
    pub daily_draw_quota: Option<u32>,
    pub budget_pool_remaining: i64,
}

impl ScenarioCampaign {
    pub fn into_model(self) -> LotteryCampaign {
        LotteryCampaign::new(
            CAMPAIGN_ID,
            self.code,
            self.status,
            self.budget_mode,
            PricingConfig::new(self.unit_cost_points, self.ten_draw_discount),
            self.window,
            ParticipationConditions::new(self.allowed_roles, self.daily_draw_quota),
            self.budget_pool_remaining,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ScenarioPrize {
    pub prize_id: u64,
    pub tier: Tier,
    pub payout: Payout,
    pub prize_value_points: i64,
    pub budget_value_points: i64,
    pub weight: u32,
    pub stock: Option<i64>,
}

impl ScenarioPrize {
    pub fn into_model(self) -> LotteryPrize {
        LotteryPrize::new(
            self.prize_id,
            CAMPAIGN_ID,
            self.tier,
            self.payout,
            self.prize_value_points,
            self.budget_value_points,
            self.weight,
            self.stock,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ScenarioUser {
    pub user_id: u64,
    pub role: String,
    pub starting_points: i64,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioDraw {
    pub user_id: u64,
    pub draw_count: u32,
    pub idempotency_key: String,
    #[serde(default)]
    pub at: i64,
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Expanded into the engine's 32-byte seed by repeating the 8 le bytes
    /// of this value; good enough for a reproducible demo run, not a
    /// substitute for a real key-management story.
    pub rng_seed: u64,
    pub campaign: ScenarioCampaign,
    pub prizes: Vec<ScenarioPrize>,
    #[serde(default)]
    pub users: Vec<ScenarioUser>,
    pub draws: Vec<ScenarioDraw>,
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn rng_seed_bytes(&self) -> [u8; 32] {
        let mut seed = [0u8; 32];
        seed[..8].copy_from_slice(&self.rng_seed.to_le_bytes());
        seed
    }
}

/// A minimal scenario any user can run with `lottery-engine run` as a
/// starting point, printed by `lottery-engine scaffold`.
pub const SCAFFOLD: &str = r#"{
  "rng_seed": 42,
  "campaign": {
    "code": "SUMMER",
    "status": "active",
    "budget_mode": "fixed",
    "unit_cost_points": 100,
    "ten_draw_discount": 0.9,
    "window": { "start": 0, "end": 4102444800 },
    "allowed_roles": [],
    "daily_draw_quota": null,
    "budget_pool_remaining": 100000
  },
  "prizes": [
    { "prize_id": 1, "tier": "empty", "payout": "empty", "prize_value_points": 0, "budget_value_points": 0, "weight": 50, "stock": null },
    { "prize_id": 2, "tier": "fallback", "payout": "points", "prize_value_points": 10, "budget_value_points": 10, "weight": 30, "stock": null },
    { "prize_id": 3, "tier": "low", "payout": "points", "prize_value_points": 50, "budget_value_points": 50, "weight": 15, "stock": null },
    { "prize_id": 4, "tier": "mid", "payout": "points", "prize_value_points": 500, "budget_value_points": 500, "weight": 4, "stock": 200 },
    { "prize_id": 5, "tier": "high", "payout": { "asset": { "asset_code": "GOLD" } }, "prize_value_points": 5000, "budget_value_points": 5000, "weight": 1, "stock": 5 }
  ],
  "users": [
    { "user_id": 1, "role": "player", "starting_points": 10000 }
  ],
  "draws": [
    { "user_id": 1, "draw_count": 1, "idempotency_key": "draw-1" },
    { "user_id": 1, "draw_count": 10, "idempotency_key": "draw-2" }
  ]
}
"#;
