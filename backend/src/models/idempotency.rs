//! Idempotency record model
//!
//! One row per client-supplied idempotency key, paired with the canonical
//! operation name so the same key cannot be replayed against a different
//! endpoint, and a request fingerprint so a replayed key with different
//! parameters is rejected instead of silently reusing the stored response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::core::clock::Timestamp;

/// Where a reservation sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdempotencyStatus {
    Processing,
    Completed,
    Failed,
}

/// Canonicalize `request` to a sorted-keys JSON string and SHA-256 it, so
/// two structurally-equal requests always hash identically regardless of
/// field order.
pub fn request_hash<T: Serialize>(request: &T) -> Result<String, serde_json::Error> {
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let value = serde_json::to_value(request)?;
    let canonical = canonicalize(value);
    let json = serde_json::to_string(&canonical)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// A reserved idempotency key and, once settled, its frozen response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    key: String,
    canonical_op: String,
    request_hash: String,
    status: IdempotencyStatus,
    response_blob: Option<Value>,
    expires_at: Timestamp,
    created_at: Timestamp,
}

impl IdempotencyRecord {
    pub fn reserve(key: String, canonical_op: String, request_hash: String, created_at: Timestamp, ttl_seconds: i64) -> Self {
        Self {
            key,
            canonical_op,
            request_hash,
            status: IdempotencyStatus::Processing,
            response_blob: None,
            expires_at: created_at + ttl_seconds,
            created_at,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn canonical_op(&self) -> &str {
        &self.canonical_op
    }

    pub fn request_hash(&self) -> &str {
        &self.request_hash
    }

    pub fn status(&self) -> IdempotencyStatus {
        self.status
    }

    pub fn response_blob(&self) -> Option<&Value> {
        self.response_blob.as_ref()
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Transition `processing -> completed|failed`, freezing the response
    /// and re-pointing `expires_at` at the post-settlement TTL.
    pub fn commit(&mut self, status: IdempotencyStatus, response_blob: Value, now: Timestamp, ttl_seconds: i64) {
        assert_ne!(status, IdempotencyStatus::Processing, "commit must settle to a terminal status");
        assert_eq!(self.status, IdempotencyStatus::Processing, "record already settled");
        self.status = status;
        self.response_blob = Some(response_blob);
        self.expires_at = now + ttl_seconds;
    }

    /// Sweeper transition for a `processing` row that outlived the
    /// processing timeout without a `commit`.
    pub fn expire_processing(&mut self, now: Timestamp) {
        assert_eq!(self.status, IdempotencyStatus::Processing);
        self.status = IdempotencyStatus::Failed;
        self.response_blob = Some(Value::Null);
        self.expires_at = now;
    }
}
