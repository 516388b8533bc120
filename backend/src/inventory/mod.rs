//! Inventory & debt ledger: stock/budget caps per campaign, with shortfall
//! bookkeeping for forced awards that stock or budget could not back.

use thiserror::Error;

use crate::store::Store;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("prize {0} not found")]
    PrizeNotFound(u64),
    #[error("campaign {0} not found")]
    CampaignNotFound(u64),
}

/// Outcome of attempting to reserve stock for a prize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    Reserved,
    Insufficient,
}

/// Row-locks the prize (via the store's own serialization) and, if
/// `stock_remaining >= qty`, decrements it. Never silently falls back —
/// the caller decides whether to try a different prize, incur debt, or fail.
pub fn reserve_prize(store: &mut dyn Store, prize_id: u64, qty: i64) -> Result<ReserveOutcome, InventoryError> {
    let mut prize = store.get_prize(prize_id).ok_or(InventoryError::PrizeNotFound(prize_id))?;
    let outcome = if prize.reserve(qty) {
        ReserveOutcome::Reserved
    } else {
        ReserveOutcome::Insufficient
    };
    store.put_prize(prize);
    Ok(outcome)
}

/// Record that a forced award could not be backed by stock.
pub fn incur_inventory_debt(store: &mut dyn Store, campaign_id: u64, prize_id: u64, qty: i64, now: i64) {
    let mut debt = store.get_inventory_debt(campaign_id, prize_id);
    debt.incur(qty);
    store.put_inventory_debt(debt);
    store.log_event(crate::events::Event::InventoryDebtIncurred { at: now, campaign_id, prize_id, qty });
}

/// Clear up to `qty` of outstanding inventory debt for (campaign, prize).
/// Returns how much was actually cleared (`cleared_qty` never exceeds
/// `debt_qty`).
pub fn clear_inventory_debt(store: &mut dyn Store, campaign_id: u64, prize_id: u64, qty: i64, now: i64) -> i64 {
    let mut debt = store.get_inventory_debt(campaign_id, prize_id);
    let applied = debt.clear(qty);
    store.put_inventory_debt(debt);
    if applied > 0 {
        store.log_event(crate::events::Event::DebtCleared { at: now, campaign_id, amount: applied });
    }
    applied
}

/// Attempt to reserve `amount` against the campaign's budget pool.
pub fn reserve_budget(store: &mut dyn Store, campaign_id: u64, amount: i64) -> Result<bool, InventoryError> {
    let mut campaign = store.get_campaign(campaign_id).ok_or(InventoryError::CampaignNotFound(campaign_id))?;
    let reserved = campaign.try_reserve_budget(amount);
    store.put_campaign(campaign);
    Ok(reserved)
}

pub fn incur_budget_debt(store: &mut dyn Store, campaign_id: u64, points: i64, now: i64) {
    let mut debt = store.get_budget_debt(campaign_id);
    debt.incur(points);
    store.put_budget_debt(debt);
    store.log_event(crate::events::Event::BudgetDebtIncurred { at: now, campaign_id, points });
}

pub fn clear_budget_debt(store: &mut dyn Store, campaign_id: u64, points: i64, now: i64) -> i64 {
    let mut debt = store.get_budget_debt(campaign_id);
    let applied = debt.clear(points);
    store.put_budget_debt(debt);
    if applied > 0 {
        store.log_event(crate::events::Event::DebtCleared { at: now, campaign_id, amount: applied });
    }
    applied
}
