//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_MAX_ENTRIES;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL for entries without an explicit TTL
    pub default_ttl: Duration,
    /// Minimum interval between expired-entry sweeps
    pub cleanup_interval: Duration,
    /// Base URL of the backing API, used by the HTTP fetcher
    pub api_base_url: String,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CLEANUP_INTERVAL_MS` - Minimum sweep interval in milliseconds (default: 60000)
    /// - `API_BASE_URL` - Base URL of the backing API (default: http://localhost:8000/api)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            default_ttl: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.default_ttl),
            cleanup_interval: env::var("CLEANUP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.cleanup_interval),
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: Duration::from_secs(300),
            cleanup_interval: Duration::from_secs(60),
            api_base_url: "http://localhost:8000/api".to_string(),
        }
    }
}
