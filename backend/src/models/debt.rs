//! Debt ledger models
//!
//! Records shortfalls incurred when the pipeline forces a tier but stock or
//! budget cannot back it. Debt is cleared opportunistically by later draws
//! that would otherwise award the same prize/campaign normally.

use serde::{Deserialize, Serialize};

/// Inventory shortfall for one (campaign, prize) pair.
///
/// # Example
/// ```
/// use lottery_engine_core::models::debt::InventoryDebt;
///
/// let mut debt = InventoryDebt::new(1, 10);
/// debt.incur(2);
/// assert_eq!(debt.outstanding(), 2);
/// debt.clear(1);
/// assert_eq!(debt.outstanding(), 1);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InventoryDebt {
    campaign_id: u64,
    prize_id: u64,
    debt_qty: i64,
    cleared_qty: i64,
}

impl InventoryDebt {
    pub fn new(campaign_id: u64, prize_id: u64) -> Self {
        Self {
            campaign_id,
            prize_id,
            debt_qty: 0,
            cleared_qty: 0,
        }
    }

    pub fn campaign_id(&self) -> u64 {
        self.campaign_id
    }

    pub fn prize_id(&self) -> u64 {
        self.prize_id
    }

    pub fn debt_qty(&self) -> i64 {
        self.debt_qty
    }

    pub fn cleared_qty(&self) -> i64 {
        self.cleared_qty
    }

    pub fn outstanding(&self) -> i64 {
        self.debt_qty - self.cleared_qty
    }

    pub fn incur(&mut self, qty: i64) {
        assert!(qty > 0, "incurred debt qty must be positive");
        self.debt_qty += qty;
    }

    /// Clears up to `qty`, never exceeding `debt_qty` (the `cleared_qty <=
    /// debt_qty` invariant). Returns how much was actually cleared.
    pub fn clear(&mut self, qty: i64) -> i64 {
        assert!(qty > 0, "cleared qty must be positive");
        let applied = qty.min(self.outstanding());
        self.cleared_qty += applied;
        applied
    }
}

/// Budget shortfall for one campaign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetDebt {
    campaign_id: u64,
    debt_points: i64,
    cleared_points: i64,
}

impl BudgetDebt {
    pub fn new(campaign_id: u64) -> Self {
        Self {
            campaign_id,
            debt_points: 0,
            cleared_points: 0,
        }
    }

    pub fn campaign_id(&self) -> u64 {
        self.campaign_id
    }

    pub fn debt_points(&self) -> i64 {
        self.debt_points
    }

    pub fn cleared_points(&self) -> i64 {
        self.cleared_points
    }

    pub fn outstanding(&self) -> i64 {
        self.debt_points - self.cleared_points
    }

    pub fn incur(&mut self, points: i64) {
        assert!(points > 0, "incurred debt points must be positive");
        self.debt_points += points;
    }

    pub fn clear(&mut self, points: i64) -> i64 {
        assert!(points > 0, "cleared points must be positive");
        let applied = points.min(self.outstanding());
        self.cleared_points += applied;
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_never_exceeds_debt() {
        let mut debt = InventoryDebt::new(1, 1);
        debt.incur(3);
        assert_eq!(debt.clear(10), 3);
        assert_eq!(debt.outstanding(), 0);
    }

    #[test]
    fn budget_debt_tracks_independently_per_campaign() {
        let mut a = BudgetDebt::new(1);
        let b = BudgetDebt::new(2);
        a.incur(100);
        assert_eq!(a.outstanding(), 100);
        assert_eq!(b.outstanding(), 0);
    }
}
