//! Sweep Clock Module
//!
//! Bookkeeping for the amortized TTL sweep.
//!
//! There is no background task: writes check this clock and run a full
//! expired-entry scan at most once per interval. A cache that receives
//! no writes is cleaned up only by lazy expiration on reads.

use std::time::Duration;

use crate::cache::entry::current_timestamp_ms;

// == Sweep Clock ==
/// Gates the periodic full scan for expired entries.
#[derive(Debug, Clone)]
pub struct SweepClock {
    /// Minimum time between sweeps
    interval: Duration,
    /// When the last sweep ran (Unix milliseconds)
    last_swept_at: u64,
}

impl SweepClock {
    // == Constructor ==
    /// Creates a clock whose first sweep becomes due one full interval
    /// after creation.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_swept_at: current_timestamp_ms(),
        }
    }

    // == Is Due ==
    /// True when more than one interval has passed since the last sweep.
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_swept_at) > self.interval.as_millis() as u64
    }

    // == Mark Swept ==
    /// Records that a sweep ran at `now_ms`.
    pub fn mark_swept(&mut self, now_ms: u64) {
        self.last_swept_at = now_ms;
    }

    // == Reset ==
    /// Restarts the clock, as if the cache had just been created.
    pub fn reset(&mut self) {
        self.last_swept_at = current_timestamp_ms();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_immediately() {
        let clock = SweepClock::new(Duration::from_secs(60));
        assert!(!clock.is_due(current_timestamp_ms()));
    }

    #[test]
    fn test_due_after_interval() {
        let clock = SweepClock::new(Duration::from_millis(100));
        let later = current_timestamp_ms() + 101;
        assert!(clock.is_due(later));
    }

    #[test]
    fn test_not_due_at_exact_interval() {
        let mut clock = SweepClock::new(Duration::from_millis(100));
        let now = current_timestamp_ms();
        clock.mark_swept(now);
        assert!(!clock.is_due(now + 100));
        assert!(clock.is_due(now + 101));
    }

    #[test]
    fn test_mark_swept_restarts_interval() {
        let mut clock = SweepClock::new(Duration::from_millis(100));
        let now = current_timestamp_ms();

        clock.mark_swept(now + 500);
        assert!(!clock.is_due(now + 550));
        assert!(clock.is_due(now + 700));
    }

    #[test]
    fn test_reset() {
        let mut clock = SweepClock::new(Duration::from_millis(100));
        clock.mark_swept(0);
        clock.reset();
        assert!(!clock.is_due(current_timestamp_ms()));
    }
}
