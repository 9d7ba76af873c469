//! HTTP Fetcher Module
//!
//! `RemoteFetch` implementation over a real HTTP client. Requests are
//! plain GETs against `{base_url}/{endpoint}` returning JSON.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::error::{FetchError, Result};
use crate::fetch::RemoteFetch;

// == HTTP Fetcher ==
/// Fetches endpoint payloads from the backing API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Shared HTTP client with connection pooling
    client: reqwest::Client,
    /// Base URL of the backing API, without trailing slash
    base_url: String,
}

impl HttpFetcher {
    // == Constructor ==
    /// Creates a fetcher for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a fetcher from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }
}

#[async_trait]
impl RemoteFetch for HttpFetcher {
    /// Performs `GET {base_url}/{endpoint}` and decodes the JSON body.
    ///
    /// Transport failures map to `FetchError::Network`, non-2xx
    /// responses to `FetchError::HttpStatus` with the body preserved,
    /// and undecodable bodies to `FetchError::Serialization`.
    async fn fetch(&self, endpoint: &str) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(FetchError::Serialization)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let fetcher = HttpFetcher::new("http://localhost:8000/api/");
        assert_eq!(fetcher.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_from_config_uses_configured_url() {
        let config = CacheConfig::default();
        let fetcher = HttpFetcher::from_config(&config);
        assert_eq!(fetcher.base_url, config.api_base_url);
    }
}
