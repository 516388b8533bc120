//! Event logging for audit and structured tracing.
//!
//! This module defines the Event enum capturing every significant state
//! change the engine makes. The log doubles as:
//! - the audit trail required alongside `asset_transactions`/`draw_decisions`
//! - a structured tracing sink downstream readers can subscribe to by
//!   monotonic sequence number, standing in for a dedicated logging crate
//!   since every event the engine emits is already a domain fact worth
//!   keeping, not a transient diagnostic.

use serde::{Deserialize, Serialize};

use crate::models::prize::Tier;

/// A single structured log/audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An idempotency key was reserved for a new request.
    IdempotencyReserved { at: i64, key: String, canonical_op: String },

    /// A previously-completed/failed key was replayed verbatim.
    IdempotencyReplayed { at: i64, key: String },

    /// A ledger posting was appended.
    LedgerPosted {
        at: i64,
        account_id: u64,
        asset_code: String,
        delta: i64,
        balance_after: i64,
    },

    /// A draw decision was produced by the pipeline.
    DrawDecided {
        at: i64,
        draw_id: u64,
        user_id: u64,
        campaign_id: u64,
        tier: Tier,
    },

    /// A forced tier could not be backed by stock; inventory debt incurred.
    InventoryDebtIncurred { at: i64, campaign_id: u64, prize_id: u64, qty: i64 },

    /// A forced tier could not be backed by budget; budget debt incurred.
    BudgetDebtIncurred { at: i64, campaign_id: u64, points: i64 },

    /// A standing debt was partially or fully repaid by a later award.
    DebtCleared { at: i64, campaign_id: u64, amount: i64 },

    /// The draw request as a whole committed successfully.
    DrawCommitted { at: i64, user_id: u64, campaign_id: u64, draw_count: u32 },

    /// The draw request rolled back; no persistent effect survives it.
    DrawRolledBack { at: i64, user_id: u64, campaign_id: u64, reason: String },
}

impl Event {
    pub fn at(&self) -> i64 {
        match self {
            Event::IdempotencyReserved { at, .. } => *at,
            Event::IdempotencyReplayed { at, .. } => *at,
            Event::LedgerPosted { at, .. } => *at,
            Event::DrawDecided { at, .. } => *at,
            Event::InventoryDebtIncurred { at, .. } => *at,
            Event::BudgetDebtIncurred { at, .. } => *at,
            Event::DebtCleared { at, .. } => *at,
            Event::DrawCommitted { at, .. } => *at,
            Event::DrawRolledBack { at, .. } => *at,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::IdempotencyReserved { .. } => "IdempotencyReserved",
            Event::IdempotencyReplayed { .. } => "IdempotencyReplayed",
            Event::LedgerPosted { .. } => "LedgerPosted",
            Event::DrawDecided { .. } => "DrawDecided",
            Event::InventoryDebtIncurred { .. } => "InventoryDebtIncurred",
            Event::BudgetDebtIncurred { .. } => "BudgetDebtIncurred",
            Event::DebtCleared { .. } => "DebtCleared",
            Event::DrawCommitted { .. } => "DrawCommitted",
            Event::DrawRolledBack { .. } => "DrawRolledBack",
        }
    }
}

/// An event paired with its monotonic sequence number, the handle
/// downstream readers poll/subscribe by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub seq: u64,
    pub event: Event,
}

/// Append-only log for storing and querying engine events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) -> u64 {
        let seq = self.events.len() as u64;
        self.events.push(LoggedEvent { seq, event });
        seq
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Events with `seq > after`, for a subscriber resuming from a known point.
    pub fn events_since(&self, after: u64) -> &[LoggedEvent] {
        let start = self.events.partition_point(|e| e.seq <= after);
        &self.events[start..]
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&LoggedEvent> {
        self.events
            .iter()
            .filter(|e| e.event.event_type() == event_type)
            .collect()
    }
}
