//! Decision pipeline integration tests: stage ordering (preset beats
//! override beats guarantee beats normal sampling) and the budget-tier
//! ceiling on what normal sampling is even allowed to pick.

use lottery_engine_core::config::EngineConfig;
use lottery_engine_core::models::{DecisionSource, DirectiveScope, ForceTarget, LotteryPrize, OverrideDirective, Payout, PresetQueueEntry, Tier};
use lottery_engine_core::pipeline::{self, rng::RngManager};
use lottery_engine_core::store::{InProcessStore, Store};

fn seed_prizes(store: &mut InProcessStore) {
    store.seed_prize(LotteryPrize::new(1, 1, Tier::Empty, Payout::Empty, 0, 0, 5, None));
    store.seed_prize(LotteryPrize::new(2, 1, Tier::Low, Payout::Points, 50, 50, 3, Some(1000)));
    store.seed_prize(LotteryPrize::new(3, 1, Tier::Mid, Payout::Points, 200, 200, 2, Some(1000)));
    store.seed_prize(LotteryPrize::new(4, 1, Tier::High, Payout::Points, 500, 500, 1, Some(1000)));
}

fn engine(seed: u8) -> (EngineConfig, RngManager) {
    let config = EngineConfig::new([seed; 32]);
    let rng = RngManager::new(config.rng_seed);
    (config, rng)
}

#[test]
fn preset_queue_outranks_every_other_stage() {
    let mut store = InProcessStore::new();
    seed_prizes(&mut store);
    store.seed_preset_entry(PresetQueueEntry::new(Some(1), 0, 4));
    store.seed_override_directive(OverrideDirective::new(1, DirectiveScope::User(1), ForceTarget::Tier(Tier::Low), 0, 1000, false));
    let (config, mut rng) = engine(1);

    let decision = pipeline::decide(&mut store, &config, &mut rng, 1, 1, 10_000, 0).unwrap();
    assert_eq!(decision.source, DecisionSource::Preset);
    assert_eq!(decision.prize_id, Some(4));
    assert!(decision.forced);
}

#[test]
fn override_directive_outranks_guarantee_and_normal_sampling() {
    let mut store = InProcessStore::new();
    seed_prizes(&mut store);
    store.seed_override_directive(OverrideDirective::new(1, DirectiveScope::User(1), ForceTarget::Prize(4), 0, 1000, true));
    let (config, mut rng) = engine(2);

    let decision = pipeline::decide(&mut store, &config, &mut rng, 1, 1, 10_000, 0).unwrap();
    assert_eq!(decision.source, DecisionSource::Override);
    assert_eq!(decision.prize_id, Some(4));
}

#[test]
fn single_use_override_directive_does_not_fire_twice() {
    let mut store = InProcessStore::new();
    seed_prizes(&mut store);
    store.seed_override_directive(OverrideDirective::new(1, DirectiveScope::User(1), ForceTarget::Prize(4), 0, 1000, true));
    let (config, mut rng) = engine(3);

    let first = pipeline::decide(&mut store, &config, &mut rng, 1, 1, 10_000, 0).unwrap();
    assert_eq!(first.source, DecisionSource::Override);

    let second = pipeline::decide(&mut store, &config, &mut rng, 1, 1, 10_000, 1).unwrap();
    assert_ne!(second.source, DecisionSource::Override);
}

#[test]
fn first_draw_guarantee_floors_at_low_with_no_preset_or_override() {
    let mut store = InProcessStore::new();
    seed_prizes(&mut store);
    let (config, mut rng) = engine(4);

    let decision = pipeline::decide(&mut store, &config, &mut rng, 99, 1, 10_000, 0).unwrap();
    assert_eq!(decision.source, DecisionSource::Guarantee);
    assert!(decision.tier >= Tier::Low);
}

#[test]
fn b0_budget_tier_only_ever_samples_empty_or_fallback() {
    let mut store = InProcessStore::new();
    seed_prizes(&mut store);
    // Burn the first-draw guarantee so stage 4 (normal sampling) is reached.
    let mut counters = store.get_fairness_counters(7, 1);
    counters.record_award(Tier::Low, 0);
    store.put_fairness_counters(counters);
    let (config, mut rng) = engine(5);

    for i in 0..20 {
        let decision = pipeline::decide(&mut store, &config, &mut rng, 7, 1, 0, i).unwrap();
        assert!(
            decision.tier == Tier::Empty || decision.tier == Tier::Fallback,
            "B0 budget tier must never pick Low/Mid/High, got {:?}",
            decision.tier
        );
    }
}
