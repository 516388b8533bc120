//! Item instance model
//!
//! Only the lifecycle the draw pipeline must respect is modeled here: an
//! instance the pipeline mints must not be treated as spendable inventory by
//! anything else, and an instance a prior listing has locked must not be
//! re-minted or re-awarded. Listing/escrow flows themselves are out of scope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an item instance sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Available,
    Locked,
    Listed,
    Consumed,
    Expired,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemInstanceError {
    #[error("item instance {0} is not available (status {1:?})")]
    NotAvailable(u64, ItemStatus),
    #[error("item instance {0} is not locked by order {1}")]
    NotLockedByOrder(u64, u64),
}

/// A minted, individually-tracked item.
///
/// # Example
/// ```
/// use lottery_engine_core::models::item_instance::{ItemInstance, ItemStatus};
///
/// let instance = ItemInstance::mint(1, 100, 7);
/// assert_eq!(instance.status(), ItemStatus::Available);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInstance {
    instance_id: u64,
    template_id: u64,
    holder_user_id: u64,
    status: ItemStatus,
    locked_by_order_id: Option<u64>,
}

impl ItemInstance {
    /// Mint a freshly awarded instance, immediately spendable by its holder.
    pub fn mint(instance_id: u64, template_id: u64, holder_user_id: u64) -> Self {
        Self {
            instance_id,
            template_id,
            holder_user_id,
            status: ItemStatus::Available,
            locked_by_order_id: None,
        }
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    pub fn template_id(&self) -> u64 {
        self.template_id
    }

    pub fn holder_user_id(&self) -> u64 {
        self.holder_user_id
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn locked_by_order_id(&self) -> Option<u64> {
        self.locked_by_order_id
    }

    pub fn is_spendable(&self) -> bool {
        self.status == ItemStatus::Available
    }

    /// Lock the instance against an outstanding marketplace order.
    pub fn lock(&mut self, order_id: u64) -> Result<(), ItemInstanceError> {
        if self.status != ItemStatus::Available {
            return Err(ItemInstanceError::NotAvailable(self.instance_id, self.status));
        }
        self.status = ItemStatus::Locked;
        self.locked_by_order_id = Some(order_id);
        Ok(())
    }

    pub fn release_lock(&mut self, order_id: u64) -> Result<(), ItemInstanceError> {
        if self.locked_by_order_id != Some(order_id) {
            return Err(ItemInstanceError::NotLockedByOrder(self.instance_id, order_id));
        }
        self.status = ItemStatus::Available;
        self.locked_by_order_id = None;
        Ok(())
    }

    pub fn consume(&mut self) {
        self.status = ItemStatus::Consumed;
    }
}
