//! Error types for the response cache
//!
//! Provides unified error handling using thiserror.
//!
//! Cache store operations are total and have no error path of their own;
//! only the fetch side of the read-through wrapper can fail.

use thiserror::Error;

// == Fetch Error Enum ==
/// Errors surfaced by the read-through fetch path.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, broken body stream)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("unexpected status {status} from upstream")]
    HttpStatus {
        /// HTTP status code returned by the upstream API
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Response body was not valid JSON
    #[error("failed to decode response body: {0}")]
    Serialization(#[source] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let err = FetchError::HttpStatus {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status 503 from upstream");
    }

    #[test]
    fn test_serialization_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = FetchError::Serialization(json_err);
        assert!(err.to_string().starts_with("failed to decode response body"));
    }
}
