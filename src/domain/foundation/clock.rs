//! Clock abstraction for time-dependent domain logic.
//!
//! Expiry, cancellation cutoffs and scheduling lead times all compare
//! against "now". Injecting the clock keeps those rules deterministic
//! under test instead of reading the wall clock directly.

use std::sync::RwLock;

use super::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current moment.
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Test clock pinned to an explicit instant, advanceable by hand.
pub struct FixedClock {
    now: RwLock<Timestamp>,
}

impl FixedClock {
    /// Creates a clock frozen at the given instant.
    pub fn at(now: Timestamp) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Moves the clock forward (or backward with a negative value).
    pub fn advance_minutes(&self, minutes: i64) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = guard.plus_minutes(minutes);
    }

    /// Repins the clock to an explicit instant.
    pub fn set(&self, now: Timestamp) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}
