//! Time source abstraction.
//!
//! All `…_utc` fields in the ledger are produced by a single injected clock
//! so that tests can observe deterministic, monotonic-enough timestamps.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// A source of UTC timestamps.
///
/// Implementations must be monotonic-enough that two calls in sequence
/// produce non-decreasing timestamps; ties are legal.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current UTC instant.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually-advanceable clock for deterministic tests.
///
/// Stores microseconds since the epoch so it can be shared across threads
/// without locking.
#[derive(Debug, Clone)]
pub struct ManualClock {
    micros: Arc<AtomicI64>,
}

impl ManualClock {
    /// Creates a clock fixed at the given instant.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            micros: Arc::new(AtomicI64::new(start.timestamp_micros())),
        }
    }

    /// Advances the clock by the given number of microseconds and returns
    /// the new instant.
    pub fn advance_micros(&self, micros: i64) -> DateTime<Utc> {
        let new_micros = self.micros.fetch_add(micros, Ordering::SeqCst) + micros;
        DateTime::from_timestamp_micros(new_micros).expect("valid timestamp")
    }

    /// Sets the clock to an explicit instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.micros.store(instant.timestamp_micros(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        let micros = self.micros.fetch_add(1, Ordering::SeqCst) + 1;
        DateTime::from_timestamp_micros(micros).expect("valid timestamp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_monotonic() {
        let clock = ManualClock::new(Utc::now());
        let a = clock.now_utc();
        let b = clock.now_utc();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_advance() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        let advanced = clock.advance_micros(5_000_000);
        assert_eq!(advanced, start + chrono::Duration::seconds(5));
    }
}
