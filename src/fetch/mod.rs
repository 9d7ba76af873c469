//! Fetch Module
//!
//! The read-through side of the cache: a coordinator that consults the
//! store before the network, the injectable fetch capability it is
//! generic over, and the HTTP implementation of that capability.

mod coordinator;
mod http;

pub use coordinator::{FetchCoordinator, RemoteFetch, ResolveOptions};
pub use http::HttpFetcher;
