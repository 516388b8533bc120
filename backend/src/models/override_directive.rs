//! Override directive model
//!
//! Admin instruction forcing a tier or a specific prize for a user (or a
//! wider scope) within a validity window. Evaluated at pipeline stage 2,
//! strictly before guarantee rules and normal sampling.

use serde::{Deserialize, Serialize};

use crate::core::clock::Timestamp;
use crate::models::prize::Tier;

/// Who a directive applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectiveScope {
    User(u64),
    Campaign(u64),
}

/// What the directive forces once matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceTarget {
    Prize(u64),
    Tier(Tier),
}

/// A single override directive row.
///
/// # Example
/// ```
/// use lottery_engine_core::models::override_directive::{DirectiveScope, ForceTarget, OverrideDirective};
/// use lottery_engine_core::models::prize::Tier;
///
/// let directive = OverrideDirective::new(
///     1, DirectiveScope::User(7), ForceTarget::Tier(Tier::High), 0, 100, false,
/// );
/// assert!(directive.is_active_at(50));
/// assert!(!directive.is_active_at(100));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideDirective {
    directive_id: u64,
    scope: DirectiveScope,
    force: ForceTarget,
    valid_from: Timestamp,
    expires_at: Timestamp,
    single_use: bool,
    consumed: bool,
}

impl OverrideDirective {
    pub fn new(
        directive_id: u64,
        scope: DirectiveScope,
        force: ForceTarget,
        valid_from: Timestamp,
        expires_at: Timestamp,
        single_use: bool,
    ) -> Self {
        assert!(expires_at > valid_from, "expires_at must be after valid_from");
        Self {
            directive_id,
            scope,
            force,
            valid_from,
            expires_at,
            single_use,
            consumed: false,
        }
    }

    pub fn directive_id(&self) -> u64 {
        self.directive_id
    }

    pub fn scope(&self) -> &DirectiveScope {
        &self.scope
    }

    pub fn force(&self) -> ForceTarget {
        self.force
    }

    /// Honored only while `valid_from <= now < expires_at` and not yet
    /// consumed by a prior single-use draw.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        !self.consumed && now >= self.valid_from && now < self.expires_at
    }

    pub fn applies_to(&self, user_id: u64, campaign_id: u64) -> bool {
        match &self.scope {
            DirectiveScope::User(id) => *id == user_id,
            DirectiveScope::Campaign(id) => *id == campaign_id,
        }
    }

    /// Marks a single-use directive consumed; no-op for reusable directives.
    pub fn consume_if_single_use(&mut self) {
        if self.single_use {
            self.consumed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_directive_is_never_active() {
        let directive =
            OverrideDirective::new(1, DirectiveScope::User(1), ForceTarget::Tier(Tier::High), 0, 10, false);
        assert!(!directive.is_active_at(10));
        assert!(directive.is_active_at(9));
    }

    #[test]
    fn single_use_consume_deactivates() {
        let mut directive =
            OverrideDirective::new(1, DirectiveScope::User(1), ForceTarget::Tier(Tier::High), 0, 100, true);
        directive.consume_if_single_use();
        assert!(!directive.is_active_at(5));
    }
}
