//! Orchestrator integration tests: the transactional envelope around a
//! whole draw batch, end to end against an in-process store.

use lottery_engine_core::core::clock::TimeWindow;
use lottery_engine_core::models::{
    AccountType, BudgetMode, CampaignStatus, DirectiveScope, ForceTarget, LotteryCampaign, LotteryPrize, OverrideDirective,
    ParticipationConditions, Payout, PricingConfig, Tier,
};
use lottery_engine_core::store::{InProcessStore, Store};
use lottery_engine_core::{execute_draw, ledger, DrawRequest, EngineConfig, RngManager};

fn seed_campaign(store: &mut InProcessStore, allowed_roles: Vec<String>) {
    store.seed_campaign(LotteryCampaign::new(
        1,
        "SUMMER".to_string(),
        CampaignStatus::Active,
        BudgetMode::None,
        PricingConfig::new(100, 0.9),
        TimeWindow::new(0, 10_000),
        ParticipationConditions::new(allowed_roles, None),
        0,
    ));
    store.seed_prize(LotteryPrize::new(1, 1, Tier::Empty, Payout::Empty, 0, 0, 1, None));
    store.seed_prize(LotteryPrize::new(2, 1, Tier::Low, Payout::Points, 50, 50, 1, Some(1000)));
}

fn fund_user(store: &mut InProcessStore, user_id: u64, amount: i64) {
    let account = store.get_or_create_account(Some(user_id), AccountType::User);
    ledger::credit(store, account.id(), "POINTS", amount, lottery_engine_core::models::BusinessType::AdminAdjustment, "seed", None, 0);
}

#[test]
fn single_draw_debits_exactly_the_unit_cost_and_replays_byte_identical() {
    let mut store = InProcessStore::new();
    seed_campaign(&mut store, vec![]);
    fund_user(&mut store, 1, 500);
    let config = EngineConfig::new([11u8; 32]);
    let mut rng = RngManager::new(config.rng_seed);

    let request = DrawRequest { user_id: 1, campaign_code: "SUMMER".to_string(), draw_count: 1, user_role: "player".to_string() };
    let first = execute_draw(&mut store, &config, &mut rng, &request, "order-1", 0);
    assert!(first.success);
    assert_eq!(ledger::get_balance(&mut store, store.get_or_create_account(Some(1), AccountType::User).id(), "POINTS"), 400);

    let replay = execute_draw(&mut store, &config, &mut rng, &request, "order-1", 99);
    assert_eq!(first.data, replay.data, "a replayed key must return the exact frozen response");
}

#[test]
fn invalid_draw_count_is_rejected_before_any_debit() {
    let mut store = InProcessStore::new();
    seed_campaign(&mut store, vec![]);
    fund_user(&mut store, 1, 500);
    let config = EngineConfig::new([12u8; 32]);
    let mut rng = RngManager::new(config.rng_seed);

    let request = DrawRequest { user_id: 1, campaign_code: "SUMMER".to_string(), draw_count: 2, user_role: "player".to_string() };
    let envelope = execute_draw(&mut store, &config, &mut rng, &request, "order-2", 0);
    assert!(!envelope.success);
    assert_eq!(envelope.code, "INVALID_DRAW_COUNT");
    assert_eq!(ledger::get_balance(&mut store, store.get_or_create_account(Some(1), AccountType::User).id(), "POINTS"), 500);
}

#[test]
fn role_outside_the_allow_list_is_not_eligible() {
    let mut store = InProcessStore::new();
    seed_campaign(&mut store, vec!["vip".to_string()]);
    fund_user(&mut store, 1, 500);
    let config = EngineConfig::new([13u8; 32]);
    let mut rng = RngManager::new(config.rng_seed);

    let request = DrawRequest { user_id: 1, campaign_code: "SUMMER".to_string(), draw_count: 1, user_role: "player".to_string() };
    let envelope = execute_draw(&mut store, &config, &mut rng, &request, "order-3", 0);
    assert!(!envelope.success);
    assert_eq!(envelope.code, "NOT_ELIGIBLE");
}

#[test]
fn campaign_outside_its_validity_window_is_not_active() {
    let mut store = InProcessStore::new();
    store.seed_campaign(LotteryCampaign::new(
        1,
        "SUMMER".to_string(),
        CampaignStatus::Active,
        BudgetMode::None,
        PricingConfig::new(100, 0.9),
        TimeWindow::new(0, 100),
        ParticipationConditions::unrestricted(),
        0,
    ));
    fund_user(&mut store, 1, 500);
    let config = EngineConfig::new([14u8; 32]);
    let mut rng = RngManager::new(config.rng_seed);

    let request = DrawRequest { user_id: 1, campaign_code: "SUMMER".to_string(), draw_count: 1, user_role: "player".to_string() };
    let envelope = execute_draw(&mut store, &config, &mut rng, &request, "order-4", 500);
    assert!(!envelope.success);
    assert_eq!(envelope.code, "CAMPAIGN_NOT_ACTIVE");
}

#[test]
fn ten_draw_batch_is_charged_the_discounted_total_in_one_posting() {
    let mut store = InProcessStore::new();
    seed_campaign(&mut store, vec![]);
    fund_user(&mut store, 2, 2000);
    let config = EngineConfig::new([15u8; 32]);
    let mut rng = RngManager::new(config.rng_seed);

    let request = DrawRequest { user_id: 2, campaign_code: "SUMMER".to_string(), draw_count: 10, user_role: "player".to_string() };
    let envelope = execute_draw(&mut store, &config, &mut rng, &request, "order-5", 0);
    assert!(envelope.success);
    let data = envelope.data.unwrap();
    assert_eq!(data["draw_count"], 10);
    assert_eq!(data["total_points_cost"], 900);
    assert_eq!(data["original_cost"], 1000);
    assert_eq!(data["saved_points"], 100);
    assert_eq!(data["prizes"].as_array().unwrap().len(), 10);
}

#[test]
fn a_draw_commit_is_reflected_in_the_event_log() {
    let mut store = InProcessStore::new();
    seed_campaign(&mut store, vec![]);
    fund_user(&mut store, 1, 500);
    let config = EngineConfig::new([16u8; 32]);
    let mut rng = RngManager::new(config.rng_seed);

    let request = DrawRequest { user_id: 1, campaign_code: "SUMMER".to_string(), draw_count: 1, user_role: "player".to_string() };
    execute_draw(&mut store, &config, &mut rng, &request, "order-6", 0);

    assert_eq!(store.event_log().events_of_type("DrawCommitted").len(), 1);
    assert_eq!(store.event_log().events_of_type("DrawDecided").len(), 1);
}

#[test]
fn a_forced_award_that_outruns_a_fixed_budget_pool_incurs_budget_debt() {
    let mut store = InProcessStore::new();
    store.seed_campaign(LotteryCampaign::new(
        1,
        "SUMMER".to_string(),
        CampaignStatus::Active,
        BudgetMode::Fixed,
        PricingConfig::new(100, 0.9),
        TimeWindow::new(0, 10_000),
        ParticipationConditions::unrestricted(),
        10,
    ));
    store.seed_prize(LotteryPrize::new(1, 1, Tier::Empty, Payout::Empty, 0, 0, 1, None));
    store.seed_prize(LotteryPrize::new(2, 1, Tier::High, Payout::Points, 500, 500, 1, Some(1000)));
    store.seed_override_directive(OverrideDirective::new(1, DirectiveScope::User(1), ForceTarget::Prize(2), 0, 1000, true));
    fund_user(&mut store, 1, 500);
    let config = EngineConfig::new([17u8; 32]);
    let mut rng = RngManager::new(config.rng_seed);

    let request = DrawRequest { user_id: 1, campaign_code: "SUMMER".to_string(), draw_count: 1, user_role: "player".to_string() };
    let envelope = execute_draw(&mut store, &config, &mut rng, &request, "order-7", 0);
    assert!(envelope.success, "a forced award must still succeed even when the budget pool can't back it");

    let campaign = store.get_campaign(1).unwrap();
    assert_eq!(campaign.budget_pool_remaining(), 10, "an unreserved amount must not decrement the pool");
    assert_eq!(store.get_budget_debt(1).outstanding(), 500, "the shortfall must be recorded as budget debt instead");
}
