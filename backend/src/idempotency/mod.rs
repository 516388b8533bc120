//! Idempotency store: at-most-one effect, at-least-one response.
//!
//! `canonical_op` pins a key to one endpoint so a key cannot be replayed
//! across endpoints; `request_hash` (see `models::idempotency::request_hash`)
//! pins it to one set of parameters so a replayed key with different
//! parameters is rejected rather than silently reusing a stale response.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::clock::Timestamp;
use crate::models::idempotency::request_hash;
use crate::models::{IdempotencyRecord, IdempotencyStatus};
use crate::store::Store;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdempotencyError {
    #[error("idempotency key {0} already used with different parameters")]
    Conflict(String),
}

/// Outcome of reserving a key: either a fresh processing slot to fill in,
/// or a previously-settled response to return verbatim.
pub enum Reservation {
    Fresh,
    Replayed(Value),
}

/// Default TTLs (seconds).
pub const DEFAULT_TTL_COMPLETED_SECONDS: i64 = 24 * 60 * 60;
pub const DEFAULT_TTL_FAILED_SECONDS: i64 = 60 * 60;
pub const DEFAULT_PROCESSING_TIMEOUT_SECONDS: i64 = 60;

/// Reserve `key` for `canonical_op`. On a fresh key, inserts a `processing`
/// row and returns `Fresh`. On a replayed key with a matching request hash,
/// returns the frozen response. On a mismatched request hash, fails with
/// `Conflict` without mutating anything.
pub fn reserve<T: Serialize>(
    store: &mut dyn Store,
    key: &str,
    canonical_op: &str,
    request: &T,
    now: Timestamp,
) -> Result<Reservation, IdempotencyError> {
    let hash = request_hash(request).expect("request must be serializable");

    if let Some(existing) = store.get_idempotency(key) {
        if existing.canonical_op() != canonical_op || existing.request_hash() != hash {
            return Err(IdempotencyError::Conflict(key.to_string()));
        }
        return match existing.status() {
            IdempotencyStatus::Processing => Ok(Reservation::Fresh),
            IdempotencyStatus::Completed | IdempotencyStatus::Failed => {
                store.log_event(crate::events::Event::IdempotencyReplayed { at: now, key: key.to_string() });
                Ok(Reservation::Replayed(existing.response_blob().cloned().unwrap_or(Value::Null)))
            }
        };
    }

    let record = IdempotencyRecord::reserve(
        key.to_string(),
        canonical_op.to_string(),
        hash,
        now,
        DEFAULT_PROCESSING_TIMEOUT_SECONDS,
    );
    store.put_idempotency(record);
    store.log_event(crate::events::Event::IdempotencyReserved {
        at: now,
        key: key.to_string(),
        canonical_op: canonical_op.to_string(),
    });
    Ok(Reservation::Fresh)
}

/// Transition `key` from `processing` to a terminal status, freezing the
/// response for its post-settlement TTL.
pub fn commit(store: &mut dyn Store, key: &str, status: IdempotencyStatus, response: Value, now: Timestamp) {
    let mut record = store.get_idempotency(key).expect("commit called without a prior reserve");
    let ttl = match status {
        IdempotencyStatus::Completed => DEFAULT_TTL_COMPLETED_SECONDS,
        IdempotencyStatus::Failed => DEFAULT_TTL_FAILED_SECONDS,
        IdempotencyStatus::Processing => panic!("commit must settle to a terminal status"),
    };
    record.commit(status, response, now, ttl);
    store.put_idempotency(record);
}

/// Sweep every `processing` row older than the processing timeout to
/// `failed`, and delete any terminal row whose TTL has elapsed. Exposed as
/// a plain callable rather than a spawned background task — this engine has
/// no async runtime; the embedding process invokes it on its own schedule.
/// Returns the keys it touched (promoted or deleted), for logging/metrics.
pub fn sweep(store: &mut dyn Store, now: Timestamp) -> Vec<String> {
    let mut touched = Vec::new();
    for mut record in store.all_idempotency() {
        let key = record.key().to_string();
        match record.status() {
            IdempotencyStatus::Processing if record.is_expired(now) => {
                record.expire_processing(now);
                store.put_idempotency(record);
                touched.push(key);
            }
            IdempotencyStatus::Completed | IdempotencyStatus::Failed if record.is_expired(now) => {
                store.delete_idempotency(&key);
                touched.push(key);
            }
            _ => {}
        }
    }
    touched
}
