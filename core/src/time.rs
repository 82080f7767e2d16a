//! Trusted time source and the canonical deadline rule.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Elapsed-time threshold in milliseconds.
pub type DurationMs = u64;

/// Injected trusted clock. Every operation reads it exactly once, at the
/// moment of its deadline check; readings are never cached across calls.
pub trait Clock {
    fn now_ms(&self) -> Timestamp;
}

/// Wall-clock time from the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        // A host clock before the epoch is a misconfiguration; saturate to 0.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn at(now: Timestamp) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: DurationMs) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        self.now.get()
    }
}

/// The single deadline rule: `now >= expiry` means expired,
/// `now < expiry` means still live. Applied everywhere; no variant
/// re-implements the comparison.
pub fn is_expired(now: Timestamp, expiry: Timestamp) -> bool {
    now >= expiry
}
