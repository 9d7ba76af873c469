//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with batched
//! least-recently-touched eviction and TTL expiration.
//!
//! All operations are total: given well-formed inputs they cannot fail,
//! so none of them return a `Result`. A present entry is not guaranteed
//! fresh; it may be logically expired until the next read or sweep
//! discovers it.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, EvictionPolicy, SweepClock};
use crate::config::CacheConfig;

// == Cache Store ==
/// Bounded key/value store for API responses.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Capacity bound and victim selection
    eviction: EvictionPolicy,
    /// Amortized TTL sweep bookkeeping
    sweep: SweepClock,
    /// Performance counters
    stats: CacheStats,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `default_ttl` - TTL for entries stored without an explicit TTL
    /// * `cleanup_interval` - Minimum time between expired-entry sweeps
    pub fn new(max_entries: usize, default_ttl: Duration, cleanup_interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            eviction: EvictionPolicy::new(max_entries),
            sweep: SweepClock::new(cleanup_interval),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    /// Creates a new CacheStore from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            config.max_entries,
            config.default_ttl,
            config.cleanup_interval,
        )
    }

    // == Peek ==
    /// Looks up an entry without mutating anything.
    ///
    /// Returns the value together with a flag telling whether the entry
    /// is already past its TTL. No counters move and `last_touched_at`
    /// stays as it was, so the call is safe for diagnostics and for
    /// composing `get`.
    pub fn peek(&self, key: &str) -> Option<(&Value, bool)> {
        let now = current_timestamp_ms();
        self.entries
            .get(key)
            .map(|entry| (&entry.value, entry.is_expired_at(now)))
    }

    // == Evict If Expired ==
    /// Removes the entry iff it is expired. Returns true if it was removed.
    pub fn evict_if_expired(&mut self, key: &str) -> bool {
        let expired = matches!(self.entries.get(key), Some(entry) if entry.is_expired());
        if expired {
            self.entries.remove(key);
        }
        expired
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` if the key is missing or expired. An expired entry
    /// is removed on the way out (lazy expiration). On a hit,
    /// `last_touched_at` is refreshed, sliding the entry's TTL forward
    /// and raising its eviction rank.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if self.evict_if_expired(key) {
            self.stats.record_miss();
            return None;
        }

        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch();
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// Overwrites any existing entry under the key, resetting its
    /// timestamps and recomputing its size estimate. Before the insert,
    /// the sweep clock is checked and, if the store is at capacity, an
    /// eviction batch runs. The entry being inserted is therefore never
    /// a victim of its own insert.
    pub fn set(&mut self, key: String, value: Value, ttl: Option<Duration>) {
        let now = current_timestamp_ms();

        if self.sweep.is_due(now) {
            self.sweep_expired(now);
        }

        if self.eviction.should_evict(self.entries.len()) {
            self.evict_batch();
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    // == Delete ==
    /// Removes an entry by key. Returns true if something was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Invalidate ==
    /// Exact-match removal, the spelling used by mutation handlers.
    pub fn invalidate(&mut self, key: &str) {
        self.delete(key);
    }

    // == Invalidate By Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Mutation handlers call this after a successful create, update or
    /// delete against the backing API so that subsequent reads
    /// repopulate from source. Returns the number of entries removed.
    pub fn invalidate_by_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();

        debug!("invalidated {} entries with prefix '{}'", removed, prefix);
        removed
    }

    // == Clear ==
    /// Removes everything and resets sweep bookkeeping and counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sweep.reset();
        self.stats = CacheStats::new();
    }

    // == Stats ==
    /// Returns a snapshot of counters and current occupancy.
    ///
    /// `expired_count` counts entries that are past their TTL but have
    /// not yet been discovered by a read or sweep; they still occupy
    /// space and are included in `item_count` and the size total.
    pub fn stats(&self) -> CacheStats {
        let now = current_timestamp_ms();
        let mut stats = self.stats.clone();

        stats.item_count = self.entries.len();
        stats.max_entries = self.eviction.max_entries();
        stats.total_size_estimate_bytes = self
            .entries
            .values()
            .map(|entry| entry.size_estimate_bytes)
            .sum();
        stats.expired_count = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .count();

        stats
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Sweep Expired ==
    /// Full scan removing every expired entry, then restarts the sweep
    /// clock. Runs at most once per cleanup interval, from `set`.
    fn sweep_expired(&mut self, now: u64) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();

        self.sweep.mark_swept(now);

        if removed > 0 {
            info!("ttl sweep removed {} expired entries", removed);
        } else {
            debug!("ttl sweep found no expired entries");
        }
    }

    // == Evict Batch ==
    /// Removes the least-recently-touched batch of entries.
    fn evict_batch(&mut self) {
        let victims = self.eviction.select_victims(&self.entries);
        debug!("evicting {} entries to stay under capacity", victims.len());

        for key in victims {
            self.entries.remove(&key);
            self.stats.record_eviction();
        }
    }
}
