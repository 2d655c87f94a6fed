//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a requested URL.
///
/// The input is hashed exactly as given: `example.com/a` and
/// `https://example.com/a` are different keys.
pub fn compute_cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
