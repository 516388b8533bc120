//! Fairness counters model
//!
//! Per-(user, campaign) streak/cooldown state read-modify-written inside the
//! draw transaction, plus campaign-wide global counters used by the
//! luck-debt calculation. A small struct with a handful of `add`/update
//! methods, no interior state beyond plain fields.

use serde::{Deserialize, Serialize};

/// Trailing window size for `recent_high_count`: the count only reflects
/// high-tier awards among the last `HIGH_STREAK_WINDOW` draws, not a
/// lifetime total.
pub const HIGH_STREAK_WINDOW: usize = 20;

/// Per-user, per-campaign streak/cooldown counters.
///
/// # Example
/// ```
/// use lottery_engine_core::models::fairness::FairnessCounters;
/// use lottery_engine_core::models::prize::Tier;
///
/// let mut counters = FairnessCounters::new(7, 1);
/// counters.record_award(Tier::Empty, 0);
/// counters.record_award(Tier::Empty, 1);
/// assert_eq!(counters.empty_streak(), 2);
/// counters.record_award(Tier::Mid, 2);
/// assert_eq!(counters.empty_streak(), 0);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FairnessCounters {
    user_id: u64,
    campaign_id: u64,
    empty_streak: u32,
    recent_high_count: u32,
    anti_high_cooldown: u32,
    last_high_at: Option<i64>,
    draws_total: u64,
    /// Ring buffer of the last `HIGH_STREAK_WINDOW` draws' high/not-high
    /// outcome, used to roll `recent_high_count` off as draws age out.
    high_window: [bool; HIGH_STREAK_WINDOW],
    high_window_len: usize,
    high_window_cursor: usize,
}

impl FairnessCounters {
    pub fn new(user_id: u64, campaign_id: u64) -> Self {
        Self {
            user_id,
            campaign_id,
            empty_streak: 0,
            recent_high_count: 0,
            anti_high_cooldown: 0,
            last_high_at: None,
            draws_total: 0,
            high_window: [false; HIGH_STREAK_WINDOW],
            high_window_len: 0,
            high_window_cursor: 0,
        }
    }

    /// Total draws recorded for this (user, campaign) pair, including empty
    /// outcomes. Backs guarantee rules like "every Nth draw" and "first draw
    /// of a new user".
    pub fn draws_total(&self) -> u64 {
        self.draws_total
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn campaign_id(&self) -> u64 {
        self.campaign_id
    }

    pub fn empty_streak(&self) -> u32 {
        self.empty_streak
    }

    pub fn recent_high_count(&self) -> u32 {
        self.recent_high_count
    }

    pub fn anti_high_cooldown(&self) -> u32 {
        self.anti_high_cooldown
    }

    pub fn last_high_at(&self) -> Option<i64> {
        self.last_high_at
    }

    /// Update streak counters for an awarded tier. Does not manage the
    /// `anti_high_cooldown` decrement; that happens once per draw via
    /// [`Self::tick_cooldown`] regardless of the award outcome.
    ///
    /// `recent_high_count` is windowed: every draw pushes its high/not-high
    /// outcome into a ring buffer of the last `HIGH_STREAK_WINDOW` draws, and
    /// the count is decremented as old high awards age out of that window.
    pub fn record_award(&mut self, tier: crate::models::prize::Tier, at: i64) {
        use crate::models::prize::Tier;
        self.draws_total += 1;
        if tier == Tier::Empty {
            self.empty_streak += 1;
        } else {
            self.empty_streak = 0;
        }
        let was_high = tier == Tier::High;
        if was_high {
            self.last_high_at = Some(at);
        }

        if self.high_window_len == HIGH_STREAK_WINDOW {
            if self.high_window[self.high_window_cursor] {
                self.recent_high_count = self.recent_high_count.saturating_sub(1);
            }
        } else {
            self.high_window_len += 1;
        }
        self.high_window[self.high_window_cursor] = was_high;
        if was_high {
            self.recent_high_count += 1;
        }
        self.high_window_cursor = (self.high_window_cursor + 1) % HIGH_STREAK_WINDOW;
    }

    pub fn set_anti_high_cooldown(&mut self, draws: u32) {
        self.anti_high_cooldown = draws;
    }

    pub fn tick_cooldown(&mut self) {
        self.anti_high_cooldown = self.anti_high_cooldown.saturating_sub(1);
    }
}

/// Campaign-wide counters feeding the luck-debt calculation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GlobalFairnessCounters {
    campaign_id: u64,
    global_draw_count: u64,
    global_empty_count: u64,
}

impl GlobalFairnessCounters {
    pub fn new(campaign_id: u64) -> Self {
        Self {
            campaign_id,
            ..Default::default()
        }
    }

    pub fn campaign_id(&self) -> u64 {
        self.campaign_id
    }

    pub fn global_draw_count(&self) -> u64 {
        self.global_draw_count
    }

    pub fn global_empty_count(&self) -> u64 {
        self.global_empty_count
    }

    pub fn record_draw(&mut self, was_empty: bool) {
        self.global_draw_count += 1;
        if was_empty {
            self.global_empty_count += 1;
        }
    }

    pub fn observed_empty_rate(&self) -> f64 {
        if self.global_draw_count == 0 {
            0.0
        } else {
            self.global_empty_count as f64 / self.global_draw_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prize::Tier;

    #[test]
    fn high_award_resets_empty_streak_and_bumps_recent_high() {
        let mut counters = FairnessCounters::new(1, 1);
        counters.record_award(Tier::Empty, 0);
        counters.record_award(Tier::High, 1);
        assert_eq!(counters.empty_streak(), 0);
        assert_eq!(counters.recent_high_count(), 1);
        assert_eq!(counters.last_high_at(), Some(1));
    }

    #[test]
    fn cooldown_never_goes_negative() {
        let mut counters = FairnessCounters::new(1, 1);
        counters.tick_cooldown();
        assert_eq!(counters.anti_high_cooldown(), 0);
    }

    #[test]
    fn recent_high_count_rolls_off_once_the_window_is_exceeded() {
        let mut counters = FairnessCounters::new(1, 1);
        for i in 0..HIGH_STREAK_WINDOW {
            counters.record_award(Tier::High, i as i64);
        }
        assert_eq!(counters.recent_high_count() as usize, HIGH_STREAK_WINDOW);

        // One more high award pushes the oldest (also high) award out of the window.
        counters.record_award(Tier::High, HIGH_STREAK_WINDOW as i64);
        assert_eq!(counters.recent_high_count() as usize, HIGH_STREAK_WINDOW);

        // Filling the rest of a fresh window with non-high draws brings the count to zero.
        for i in 0..HIGH_STREAK_WINDOW {
            counters.record_award(Tier::Low, (HIGH_STREAK_WINDOW + 1 + i) as i64);
        }
        assert_eq!(counters.recent_high_count(), 0);
    }

    #[test]
    fn observed_empty_rate_with_no_draws_is_zero() {
        let counters = GlobalFairnessCounters::new(1);
        assert_eq!(counters.observed_empty_rate(), 0.0);
    }
}
