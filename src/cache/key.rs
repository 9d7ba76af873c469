//! Cache Key Module
//!
//! Derives a stable string key from an (endpoint, params) pair.
//!
//! Parameter-free endpoints keep their name verbatim so the common case
//! stays human-readable and prefix invalidation can target an endpoint
//! directly. Parameterized requests append a 64-bit FNV-1a hash of the
//! canonical (key-sorted) parameter list.

use std::collections::BTreeMap;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

// == Derive Key ==
/// Builds the cache key for a request.
///
/// Identical `(endpoint, params)` inputs always produce the same key,
/// across processes as well as within one: FNV-1a is fixed-constant and
/// `BTreeMap` iteration gives a canonical parameter order. Keys for the
/// same endpoint share the `"endpoint:"` prefix used by invalidation.
pub fn derive_key(endpoint: &str, params: &BTreeMap<String, String>) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }

    let mut hash = FNV_OFFSET_BASIS;
    hash = fnv1a(hash, endpoint.as_bytes());
    for (name, value) in params {
        hash = fnv1a(hash, b"&");
        hash = fnv1a(hash, name.as_bytes());
        hash = fnv1a(hash, b"=");
        hash = fnv1a(hash, value.as_bytes());
    }

    format!("{}:{:016x}", endpoint, hash)
}

/// Folds bytes into a running FNV-1a hash.
fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
