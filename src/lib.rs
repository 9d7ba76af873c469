//! api_cache - A client-side response cache
//!
//! Sits between data-loading call sites and a remote JSON API,
//! eliminating redundant round-trips. Entries carry a sliding TTL and
//! are expired lazily on read plus an amortized sweep on writes; a
//! batched least-recently-touched policy bounds the entry count; and
//! mutation handlers keep the cache coherent with explicit prefix
//! invalidation.
//!
//! The cache is a performance optimization, not a correctness boundary:
//! a `set` racing an invalidation can briefly resurrect an entry, and
//! out-of-order fetch completions resolve last-writer-wins.
//!
//! # Example
//!
//! ```ignore
//! let config = CacheConfig::from_env();
//! let store = Arc::new(RwLock::new(CacheStore::from_config(&config)));
//! let api = FetchCoordinator::new(store.clone(), HttpFetcher::from_config(&config));
//!
//! // Read path: served from cache within the TTL
//! let models = api.resolve("models", &params, ResolveOptions::default()).await?;
//!
//! // Mutation path: drop every cached "models" response
//! store.write().await.invalidate_by_prefix("models");
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;

pub use cache::{derive_key, CacheEntry, CacheStats, CacheStore};
pub use config::CacheConfig;
pub use error::{FetchError, Result};
pub use fetch::{FetchCoordinator, HttpFetcher, RemoteFetch, ResolveOptions};
