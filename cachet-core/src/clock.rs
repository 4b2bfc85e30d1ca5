//! Injectable time source.
//!
//! Expiry arithmetic is relative to "now", so the store takes its notion of
//! time through this trait. Production code uses [`SystemClock`]; tests
//! freeze time with [`FixedClock`] to make expiration assertions exact.

use std::sync::RwLock;

use chrono::{Duration, Utc};

use crate::Timestamp;

/// Trait for injectable time sources.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock frozen at a settable instant, for deterministic tests.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<Timestamp>,
}

impl FixedClock {
    /// Create a clock frozen at the given instant.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: Timestamp) {
        if let Ok(mut guard) = self.now.write() {
            *guard = now;
        }
    }

    /// Advance the clock by a number of seconds.
    pub fn advance_seconds(&self, seconds: i64) {
        if let Ok(mut guard) = self.now.write() {
            *guard = *guard + Duration::seconds(seconds);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now.read().map(|guard| *guard).unwrap_or_else(|_| Utc::now())
    }
}
