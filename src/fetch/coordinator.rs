//! Fetch Coordinator Module
//!
//! Read-through wrapper composing key derivation, the cache store, and
//! an injected network-fetch capability.
//!
//! Concurrent `resolve` calls for the same key are coalesced: a per-key
//! guard lets one caller perform the fetch while the others wait, then
//! re-read the freshly populated cache. If the leading fetch fails, each
//! waiter retries in turn; a failure is never cached.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{derive_key, CacheStore};
use crate::error::Result;

// == Remote Fetch Capability ==
/// The network side of the read-through cache.
///
/// Supplied by the surrounding application's HTTP layer. The cache
/// assumes nothing beyond "returns a JSON value or fails".
#[async_trait]
pub trait RemoteFetch: Send + Sync {
    /// Fetches the payload for an endpoint from the backing API.
    async fn fetch(&self, endpoint: &str) -> Result<Value>;
}

// == Resolve Options ==
/// Per-call knobs for `resolve`.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Skip the cache lookup and always hit the network
    pub force_refresh: bool,
    /// TTL for the stored response; the store default applies when None
    pub ttl: Option<Duration>,
}

// == Fetch Coordinator ==
/// Read-through front of the cache.
///
/// Holds a shared handle to the store rather than a singleton, so tests
/// and tenants can run isolated caches side by side.
pub struct FetchCoordinator<F> {
    /// Shared cache store
    cache: Arc<RwLock<CacheStore>>,
    /// Injected network capability
    fetcher: F,
    /// Per-key guards coalescing concurrent fetches
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<F: RemoteFetch> FetchCoordinator<F> {
    // == Constructor ==
    /// Creates a coordinator over a shared store and a fetch capability.
    pub fn new(cache: Arc<RwLock<CacheStore>>, fetcher: F) -> Self {
        Self {
            cache,
            fetcher,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the shared store handle, for mutation handlers that need
    /// to invalidate after a write to the backing API.
    pub fn cache(&self) -> &Arc<RwLock<CacheStore>> {
        &self.cache
    }

    // == Resolve ==
    /// Returns the response for `(endpoint, params)`, from cache when
    /// fresh, from the network otherwise.
    ///
    /// A network success populates the cache before returning; a network
    /// failure propagates and leaves the cache untouched. If two
    /// completions for one key finish out of order, the stored value is
    /// whichever `set` ran last.
    pub async fn resolve(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
        options: ResolveOptions,
    ) -> Result<Value> {
        let key = derive_key(endpoint, params);

        if !options.force_refresh {
            if let Some(value) = self.cache.write().await.get(&key) {
                return Ok(value);
            }
        }

        let guard = self.in_flight_guard(&key).await;
        let held = guard.lock().await;

        // A concurrent resolve may have populated the key while this
        // caller waited on the guard.
        if !options.force_refresh {
            if let Some(value) = self.cache.write().await.get(&key) {
                drop(held);
                self.prune_in_flight(&key, guard).await;
                return Ok(value);
            }
        }

        debug!("cache miss for '{}', fetching '{}'", key, endpoint);
        let fetched = self.fetcher.fetch(endpoint).await;

        if let Ok(value) = &fetched {
            self.cache
                .write()
                .await
                .set(key.clone(), value.clone(), options.ttl);
        }

        drop(held);
        self.prune_in_flight(&key, guard).await;
        fetched
    }

    // == In-Flight Guard ==
    /// Returns the guard for a key, creating it on first use.
    async fn in_flight_guard(&self, key: &str) -> Arc<Mutex<()>> {
        let mut map = self.in_flight.lock().await;
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops this caller's guard handle and removes the map slot once no
    /// other resolve holds it.
    async fn prune_in_flight(&self, key: &str, guard: Arc<Mutex<()>>) {
        drop(guard);
        let mut map = self.in_flight.lock().await;
        if let Some(slot) = map.get(key) {
            if Arc::strong_count(slot) == 1 {
                map.remove(key);
            }
        }
    }
}
