//! Preset queue model
//!
//! A pre-scheduled sequence of prizes consumed before any random sampling.
//! `campaign_id = None` marks a global fallback entry, honored only when no
//! campaign-specific entry remains (see `pipeline::stages`).

use serde::{Deserialize, Serialize};

/// One preset slot. Entries are consumed at most once, in ascending `seq`
/// order, under a row lock so concurrent draws cannot double-claim a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetQueueEntry {
    campaign_id: Option<u64>,
    seq: u64,
    chosen_prize_id: u64,
    consumed_at: Option<i64>,
}

impl PresetQueueEntry {
    pub fn new(campaign_id: Option<u64>, seq: u64, chosen_prize_id: u64) -> Self {
        Self {
            campaign_id,
            seq,
            chosen_prize_id,
            consumed_at: None,
        }
    }

    pub fn campaign_id(&self) -> Option<u64> {
        self.campaign_id
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn chosen_prize_id(&self) -> u64 {
        self.chosen_prize_id
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    pub fn consume(&mut self, at: i64) {
        assert!(!self.is_consumed(), "preset entry already consumed");
        self.consumed_at = Some(at);
    }
}
