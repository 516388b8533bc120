//! Concurrency integration tests. The reference `Store` isn't internally
//! synchronized (see `store::InProcessStore`'s doc comment); a `Mutex`
//! around the whole store is this backend's literal stand-in for per-row
//! database locks, so every test here wraps one in a `Mutex` and drives it
//! from multiple threads via `std::thread::scope`.

use std::sync::Mutex;

use lottery_engine_core::core::clock::TimeWindow;
use lottery_engine_core::models::{AccountType, BudgetMode, BusinessType, CampaignStatus, LotteryCampaign, LotteryPrize, ParticipationConditions, Payout, PricingConfig, Tier};
use lottery_engine_core::store::InProcessStore;
use lottery_engine_core::{execute_draw, ledger, DrawRequest, EngineConfig, RngManager, Store};

fn seed_campaign_with_scarce_prize(store: &mut InProcessStore, stock: i64) {
    store.seed_campaign(LotteryCampaign::new(
        1,
        "SUMMER".to_string(),
        CampaignStatus::Active,
        BudgetMode::None,
        PricingConfig::new(10, 0.9),
        TimeWindow::new(0, 10_000),
        ParticipationConditions::unrestricted(),
        0,
    ));
    // Weight everything onto the scarce High prize so contention is certain;
    // Empty exists only so sampling never runs out of tiers to fall back to.
    store.seed_prize(LotteryPrize::new(1, 1, Tier::Empty, Payout::Empty, 0, 0, 1, None));
    store.seed_prize(LotteryPrize::new(2, 1, Tier::High, Payout::Points, 1000, 1000, 100, Some(stock)));
}

#[test]
fn concurrent_draws_never_oversell_a_scarce_prize() {
    let mut store = InProcessStore::new();
    seed_campaign_with_scarce_prize(&mut store, 5);
    for user_id in 1..=20u64 {
        let account = store.get_or_create_account(Some(user_id), AccountType::User);
        ledger::credit(&mut store, account.id(), "POINTS", 1000, BusinessType::AdminAdjustment, "seed", None, 0);
    }
    let config = EngineConfig::new([21u8; 32]);

    let store = Mutex::new(store);
    let config = &config;

    std::thread::scope(|scope| {
        for user_id in 1..=20u64 {
            let store = &store;
            scope.spawn(move || {
                let mut rng = RngManager::new(config.rng_seed);
                let key = format!("user-{user_id}");
                let request = DrawRequest { user_id, campaign_code: "SUMMER".to_string(), draw_count: 1, user_role: "player".to_string() };
                let mut guard = store.lock().expect("store mutex must not be poisoned");
                let _ = execute_draw(&mut *guard, config, &mut rng, &request, &key, 0);
            });
        }
    });

    let store = store.into_inner().expect("store mutex must not be poisoned");
    let prize = store.get_prize(2).unwrap();
    assert!(
        prize.stock_remaining().unwrap() >= 0,
        "stock must never go negative even under concurrent contention"
    );
}

#[test]
fn concurrent_draws_with_the_same_idempotency_key_settle_on_one_effect() {
    let mut store = InProcessStore::new();
    seed_campaign_with_scarce_prize(&mut store, 1000);
    let account = store.get_or_create_account(Some(1), AccountType::User);
    ledger::credit(&mut store, account.id(), "POINTS", 10_000, BusinessType::AdminAdjustment, "seed", None, 0);
    let config = EngineConfig::new([22u8; 32]);

    let store = Mutex::new(store);
    let config = &config;

    let responses: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = &store;
                scope.spawn(move || {
                    let mut rng = RngManager::new(config.rng_seed);
                    let request = DrawRequest { user_id: 1, campaign_code: "SUMMER".to_string(), draw_count: 1, user_role: "player".to_string() };
                    let mut guard = store.lock().expect("store mutex must not be poisoned");
                    execute_draw(&mut *guard, config, &mut rng, &request, "shared-key", 0)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = &responses[0];
    for response in &responses[1..] {
        assert_eq!(response.data, first.data, "every caller racing the same idempotency key must see the same frozen response");
    }

    let mut store = store.into_inner().expect("store mutex must not be poisoned");
    assert_eq!(
        ledger::get_balance(&mut store, account.id(), "POINTS"),
        10_000 - 10,
        "the draw must have been charged exactly once regardless of how many callers raced it"
    );
}
