//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// The TTL is sliding: `last_touched_at` is refreshed on every read hit
/// and on every overwrite, and expiry is measured against it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Last access timestamp (Unix milliseconds), also the eviction rank
    pub last_touched_at: u64,
    /// Time-to-live measured from `last_touched_at`
    pub ttl: Duration,
    /// Approximate in-memory footprint of the payload
    pub size_estimate_bytes: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with the given TTL.
    pub fn new(value: Value, ttl: Duration) -> Self {
        let now = current_timestamp_ms();
        let size_estimate_bytes = estimate_size(&value);

        Self {
            value,
            created_at: now,
            last_touched_at: now,
            ttl,
            size_estimate_bytes,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at the given instant.
    ///
    /// Boundary condition: an entry is expired only once strictly more
    /// than its TTL has elapsed since it was last touched. A read at
    /// exactly `last_touched_at + ttl` still returns the value.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_touched_at) > self.ttl.as_millis() as u64
    }

    /// Checks if the entry has expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Touch ==
    /// Refreshes `last_touched_at`, extending the entry's life and
    /// raising its eviction rank.
    pub fn touch(&mut self) {
        self.last_touched_at = current_timestamp_ms();
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds.
    ///
    /// Returns 0 once the entry has expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let deadline = self.last_touched_at + self.ttl.as_millis() as u64;
        deadline.saturating_sub(current_timestamp_ms())
    }
}

// == Size Estimation ==
/// Approximates the in-memory footprint of a JSON value in bytes.
///
/// Walks the value structurally instead of serializing it, so the cost
/// is one traversal with no allocation. The numbers are rough (fixed
/// costs per scalar, string lengths, per-key overhead for objects) and
/// only need to be comparable between entries, not exact.
pub fn estimate_size(value: &Value) -> usize {
    match value {
        Value::Null => 4,
        Value::Bool(_) => 5,
        Value::Number(_) => 8,
        Value::String(s) => s.len() + 2,
        Value::Array(items) => 2 + items.iter().map(estimate_size).sum::<usize>(),
        Value::Object(map) => {
            2 + map
                .iter()
                .map(|(k, v)| k.len() + 3 + estimate_size(v))
                .sum::<usize>()
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
