//! Eviction Policy Module
//!
//! Caps the store's entry count with batched least-recently-touched
//! removal.
//!
//! Instead of evicting one entry per write once the cache is full, a
//! full cache sheds a whole batch (20% of capacity) at once. Ranking
//! entries costs one sort, and that cost is then amortized over the
//! next few hundred inserts.

use std::collections::HashMap;

use crate::cache::{CacheEntry, EVICTION_BATCH_FRACTION};

// == Eviction Policy ==
/// Selects which entries to drop when the store reaches capacity.
#[derive(Debug, Clone)]
pub struct EvictionPolicy {
    /// Maximum number of entries the store may hold
    max_entries: usize,
}

impl EvictionPolicy {
    // == Constructor ==
    /// Creates a policy for the given capacity.
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }

    /// Returns the configured capacity.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    // == Should Evict ==
    /// True when an insert into a store of `len` entries must be
    /// preceded by an eviction batch.
    pub fn should_evict(&self, len: usize) -> bool {
        len >= self.max_entries
    }

    // == Batch Size ==
    /// Number of entries removed per eviction batch:
    /// `ceil(max_entries * 0.2)`.
    pub fn batch_size(&self) -> usize {
        (self.max_entries as f64 * EVICTION_BATCH_FRACTION).ceil() as usize
    }

    // == Select Victims ==
    /// Returns the keys of the `batch_size()` entries with the smallest
    /// `last_touched_at`.
    ///
    /// Entries untouched since insertion rank lowest, which approximates
    /// LRU without maintaining a separate access list.
    pub fn select_victims(&self, entries: &HashMap<String, CacheEntry>) -> Vec<String> {
        let mut ranked: Vec<(&String, u64)> = entries
            .iter()
            .map(|(key, entry)| (key, entry.last_touched_at))
            .collect();

        ranked.sort_by_key(|(_, last_touched_at)| *last_touched_at);

        ranked
            .into_iter()
            .take(self.batch_size())
            .map(|(key, _)| key.clone())
            .collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn entry_touched_at(ms: u64) -> CacheEntry {
        let mut entry = CacheEntry::new(json!("v"), Duration::from_secs(300));
        entry.last_touched_at = ms;
        entry
    }

    #[test]
    fn test_should_evict_at_capacity() {
        let policy = EvictionPolicy::new(3);
        assert!(!policy.should_evict(2));
        assert!(policy.should_evict(3));
        assert!(policy.should_evict(4));
    }

    #[test]
    fn test_batch_size_rounds_up() {
        assert_eq!(EvictionPolicy::new(1000).batch_size(), 200);
        assert_eq!(EvictionPolicy::new(10).batch_size(), 2);
        // 20% of 3 is 0.6, which must still evict a whole entry
        assert_eq!(EvictionPolicy::new(3).batch_size(), 1);
        assert_eq!(EvictionPolicy::new(1).batch_size(), 1);
    }

    #[test]
    fn test_select_victims_picks_least_recently_touched() {
        let policy = EvictionPolicy::new(10);

        let mut entries = HashMap::new();
        entries.insert("old".to_string(), entry_touched_at(1_000));
        entries.insert("older".to_string(), entry_touched_at(500));
        entries.insert("fresh".to_string(), entry_touched_at(9_000));

        let victims = policy.select_victims(&entries);
        assert_eq!(victims, vec!["older".to_string(), "old".to_string()]);
    }

    #[test]
    fn test_select_victims_on_empty_store() {
        let policy = EvictionPolicy::new(10);
        let entries = HashMap::new();
        assert!(policy.select_victims(&entries).is_empty());
    }

    #[test]
    fn test_select_victims_caps_at_batch_size() {
        let policy = EvictionPolicy::new(5);

        let mut entries = HashMap::new();
        for i in 0..5u64 {
            entries.insert(format!("key{}", i), entry_touched_at(i * 100));
        }

        let victims = policy.select_victims(&entries);
        assert_eq!(victims.len(), policy.batch_size());
        assert_eq!(victims, vec!["key0".to_string()]);
    }
}
