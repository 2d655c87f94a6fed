//! Storage substrate abstraction for cached pages.

use std::time::Duration;

use async_trait::async_trait;

use crate::Error;

/// A page record as it sits in storage, with compressed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub title: String,
    pub content: Vec<u8>,
    /// Write time in epoch milliseconds.
    pub timestamp: i64,
}

impl StoredPage {
    /// Epoch millisecond after which the record is no longer retrievable.
    pub fn expires_at(&self, ttl: Duration) -> i64 {
        self.timestamp.saturating_add(ttl.as_millis() as i64)
    }
}

/// Key-value storage with per-write expiry.
///
/// Implementations own expiry: once `timestamp + ttl` has passed, `get`
/// must return `Ok(None)` for that key. `set` replaces any existing value.
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StoredPage>, Error>;

    async fn set(&self, key: &str, page: StoredPage, ttl: Duration) -> Result<(), Error>;
}
