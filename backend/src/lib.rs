//! Lottery Engine Core
//!
//! Deterministic, transactional decision engine for a points-funded lottery
//! draw system: weighted tier/prize sampling, double-entry ledger and
//! inventory bookkeeping, idempotent request handling, and anti-streak
//! fairness, all driven through one orchestrator entry point.
//!
//! # Architecture
//!
//! - **store**: persistence seam every other module talks to
//! - **models**: domain types (accounts, campaigns, prizes, decisions, debts)
//! - **ledger**: double-entry point/asset postings
//! - **inventory**: prize stock and budget-pool reservation, with debt
//!   tracking for forced awards that outrun stock
//! - **idempotency**: request-hash fingerprinted replay of mutating calls
//! - **fairness**: anti-empty-streak, anti-high-streak, luck-debt state
//! - **pipeline**: the staged decision (preset -> override -> guarantee ->
//!   normal) that picks one tier/prize per draw
//! - **orchestrator**: the transactional envelope around a whole draw batch
//! - **response**: the envelope DTOs returned across the API boundary
//! - **events**: append-only audit/tracing log
//! - **config**: every tunable the pipeline and orchestrator read
//! - **error**: the engine-wide error taxonomy and its HTTP/code mapping
//!
//! # Critical Invariants
//!
//! 1. All point/asset values are i64; no floating-point balance ever exists.
//! 2. All randomness is deterministic (ChaCha20, seeded, snapshot/replayable).
//! 3. Every mutating entry point is idempotent under a caller-supplied key.

pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod fairness;
pub mod idempotency;
pub mod inventory;
pub mod ledger;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod response;
pub mod store;

pub use config::EngineConfig;
pub use error::EngineError;
pub use events::{Event, EventLog, LoggedEvent};
pub use orchestrator::{execute_draw, DrawRequest};
pub use pipeline::rng::RngManager;
pub use response::ResponseEnvelope;
pub use store::{InProcessStore, Store};
