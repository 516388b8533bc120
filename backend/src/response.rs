//! Response envelope DTOs.
//!
//! These shapes are deliberately independent of the internal models: the
//! orchestrator builds one from a completed draw batch, never serializes a
//! `DrawDecision`/`AssetTransaction` directly across the boundary. Keeping
//! the two separate means a column rename in storage never breaks a client
//! contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;
use crate::models::Tier;

/// One awarded (or empty) prize as it is reported to a caller.
#[derive(Debug, Clone, Serialize)]
pub struct PrizeView {
    pub prize_id: Option<u64>,
    pub tier: Tier,
    pub display_name: String,
    pub payout: PayoutView,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayoutView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_instance_id: Option<u64>,
}

/// Success payload for a completed draw batch.
#[derive(Debug, Clone, Serialize)]
pub struct DrawResultData {
    pub draw_count: u32,
    pub prizes: Vec<PrizeView>,
    pub total_points_cost: i64,
    pub original_cost: i64,
    pub discount: f64,
    pub saved_points: i64,
    pub draw_type: String,
    pub balance_after: i64,
}

/// The envelope every mutating endpoint returns, success or failure. `data`
/// is a `Value` rather than a type parameter so the same struct can be
/// frozen verbatim into an `IdempotencyRecord`'s `response_blob` and handed
/// back byte-equal on replay, regardless of which endpoint produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub data: Option<Value>,
    pub timestamp: i64,
    pub version: String,
    pub request_id: String,
}

impl ResponseEnvelope {
    pub fn success(data: &DrawResultData, now: i64, request_id: String) -> Self {
        Self {
            success: true,
            code: "OK".to_string(),
            message: "ok".to_string(),
            data: Some(serde_json::to_value(data).expect("DrawResultData is always serializable")),
            timestamp: now,
            version: env!("CARGO_PKG_VERSION").to_string(),
            request_id,
        }
    }

    pub fn failure(err: &EngineError, now: i64, request_id: String) -> Self {
        Self {
            success: false,
            code: err.code().to_string(),
            message: err.to_string(),
            data: None,
            timestamp: now,
            version: env!("CARGO_PKG_VERSION").to_string(),
            request_id,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("ResponseEnvelope is always serializable")
    }
}
