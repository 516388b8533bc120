//! Wall-clock access for TTLs, campaign windows, and directive validity.
//!
//! CRITICAL: nothing in this crate calls `SystemTime::now()` directly outside this
//! module. Every TTL/expiry/eligibility check takes a timestamp through `Clock` so
//! tests can move time forward deterministically instead of racing the wall clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Unix timestamp, seconds since epoch.
pub type Timestamp = i64;

/// Source of "now" for the engine.
///
/// # Example
/// ```
/// use lottery_engine_core::core::clock::{Clock, FixedClock, SystemClock};
///
/// let clock = SystemClock;
/// assert!(clock.now() > 0);
///
/// let fixed = FixedClock::new(1_700_000_000);
/// assert_eq!(fixed.now(), 1_700_000_000);
/// ```
pub trait Clock: Send + Sync {
    /// Current time as a unix timestamp (seconds).
    fn now(&self) -> Timestamp;
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_secs() as i64
    }
}

/// Deterministic clock for tests and replay: advances only when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: std::sync::Arc<std::sync::atomic::AtomicI64>,
}

impl FixedClock {
    /// Create a clock fixed at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: std::sync::Arc::new(std::sync::atomic::AtomicI64::new(now)),
        }
    }

    /// Move the clock forward by `seconds` (can be negative to rewind in tests).
    pub fn advance(&self, seconds: i64) {
        self.now
            .fetch_add(seconds, std::sync::atomic::Ordering::SeqCst);
    }

    /// Pin the clock to an exact value.
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, std::sync::atomic::Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// A half-open validity window `[start, end)`.
///
/// # Example
/// ```
/// use lottery_engine_core::core::clock::TimeWindow;
///
/// let window = TimeWindow::new(10, 20);
/// assert!(!window.contains(9));
/// assert!(window.contains(10));
/// assert!(window.contains(19));
/// assert!(!window.contains(20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        assert!(end > start, "window end must be after start");
        Self { start, end }
    }

    pub fn contains(&self, at: Timestamp) -> bool {
        at >= self.start && at < self.end
    }
}
