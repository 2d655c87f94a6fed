//! The content cache used by the extraction pipeline.
//!
//! Wraps a [`PageStore`] with the payload codec and a clock. Reads never
//! fail: anything other than a live, decodable entry comes back as a
//! non-hit [`CacheLookup`] variant that callers treat as a miss.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::codec;
use super::store::{PageStore, StoredPage};
use crate::Error;
use crate::clock::Clock;

/// Lifetime of a cached page (12 hours).
pub const PAGE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// A cached article with decompressed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub content: String,
    /// Write time in epoch milliseconds.
    pub timestamp: i64,
}

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A live entry.
    Hit(Page),
    /// Never written, or expired.
    Miss,
    /// Present but undecodable.
    Corrupt(String),
    /// The store could not be read.
    Unavailable(String),
}

/// Read-through page cache keyed by hashed URL.
#[derive(Clone)]
pub struct ContentCache {
    store: Arc<dyn PageStore>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentCache").finish_non_exhaustive()
    }
}

impl ContentCache {
    pub fn new(store: Arc<dyn PageStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Look up a page by key.
    pub async fn get(&self, key: &str) -> CacheLookup {
        let stored = match self.store.get(key).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed");
                return CacheLookup::Unavailable(e.to_string());
            }
        };

        match codec::decompress(&stored.content) {
            Ok(content) => CacheLookup::Hit(Page { title: stored.title, content, timestamp: stored.timestamp }),
            Err(e) => {
                tracing::warn!(key, error = %e, "corrupt cache entry");
                CacheLookup::Corrupt(e.to_string())
            }
        }
    }

    /// Store a page under `key`, stamped with the current time.
    ///
    /// Always applies [`PAGE_TTL`] and replaces any existing entry.
    ///
    /// # Errors
    ///
    /// Returns `Error::CacheWriteFailed` if compression or the store write
    /// fails. Callers serving a fresh page should log and carry on.
    pub async fn set(&self, key: &str, title: &str, content: &str) -> Result<(), Error> {
        let compressed = codec::compress(content)?;
        let page = StoredPage { title: title.to_string(), content: compressed, timestamp: self.clock.now_millis() };

        self.store
            .set(key, page, PAGE_TTL)
            .await
            .map_err(|e| match e {
                Error::CacheWriteFailed(msg) => Error::CacheWriteFailed(msg),
                other => Error::CacheWriteFailed(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::connection::CacheDb;
    use crate::cache::hash::compute_cache_key;
    use crate::cache::memory::MemoryStore;
    use crate::clock::ManualClock;
    use async_trait::async_trait;

    const START: i64 = 1_700_000_000_000;

    fn memory_cache() -> (ContentCache, MemoryStore, ManualClock) {
        let clock = ManualClock::new(START);
        let store = MemoryStore::new(Arc::new(clock.clone()));
        let cache = ContentCache::new(Arc::new(store.clone()), Arc::new(clock.clone()));
        (cache, store, clock)
    }

    fn hit(lookup: CacheLookup) -> Page {
        match lookup {
            CacheLookup::Hit(page) => page,
            other => panic!("expected a hit, got {other:?}"),
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl PageStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<StoredPage>, Error> {
            Err(Error::MigrationFailed("store offline".into()))
        }

        async fn set(&self, _key: &str, _page: StoredPage, _ttl: Duration) -> Result<(), Error> {
            Err(Error::MigrationFailed("store offline".into()))
        }
    }

    #[tokio::test]
    async fn test_read_your_write() {
        let (cache, _, _) = memory_cache();
        let key = compute_cache_key("example.com/article");

        cache.set(&key, "Title", "<p>Body</p>").await.unwrap();

        let page = hit(cache.get(&key).await);
        assert_eq!(page.title, "Title");
        assert_eq!(page.content, "<p>Body</p>");
        assert_eq!(page.timestamp, START);
    }

    #[tokio::test]
    async fn test_content_is_stored_compressed() {
        let (cache, store, _) = memory_cache();
        let body = "<p>repeat</p>".repeat(100);
        cache.set("k", "T", &body).await.unwrap();

        let stored = store.get("k").await.unwrap().unwrap();
        assert_ne!(stored.content, body.as_bytes());
        assert_eq!(codec::decompress(&stored.content).unwrap(), body);
    }

    #[tokio::test]
    async fn test_never_written_is_miss() {
        let (cache, _, _) = memory_cache();
        assert_eq!(cache.get("missing").await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let (cache, _, clock) = memory_cache();
        cache.set("k", "T", "C").await.unwrap();

        clock.advance(PAGE_TTL - Duration::from_secs(1));
        assert!(matches!(cache.get("k").await, CacheLookup::Hit(_)));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("k").await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_ttl_expiry_sqlite() {
        let clock = ManualClock::new(START);
        let db = CacheDb::open_in_memory()
            .await
            .unwrap()
            .with_clock(Arc::new(clock.clone()));
        let cache = ContentCache::new(Arc::new(db), Arc::new(clock.clone()));

        cache.set("k", "T", "C").await.unwrap();
        assert!(matches!(cache.get("k").await, CacheLookup::Hit(_)));

        clock.advance(PAGE_TTL);
        assert_eq!(cache.get("k").await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_overwrite_restamps() {
        let (cache, _, clock) = memory_cache();
        cache.set("k", "Old", "old body").await.unwrap();

        clock.advance(Duration::from_secs(60));
        cache.set("k", "New", "new body").await.unwrap();

        let page = hit(cache.get("k").await);
        assert_eq!(page.title, "New");
        assert_eq!(page.content, "new body");
        assert_eq!(page.timestamp, START + 60_000);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_distinguishable_miss() {
        let (cache, store, _) = memory_cache();
        cache.set("k", "T", "C").await.unwrap();
        store.overwrite_content("k", b"garbage".to_vec()).await;

        let lookup = cache.get("k").await;
        assert!(matches!(lookup, CacheLookup::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_store_read_failure_is_unavailable() {
        let cache = ContentCache::new(Arc::new(BrokenStore), Arc::new(ManualClock::new(0)));
        let lookup = cache.get("k").await;
        assert!(matches!(lookup, CacheLookup::Unavailable(msg) if msg.contains("store offline")));
    }

    #[tokio::test]
    async fn test_store_write_failure_is_reported() {
        let cache = ContentCache::new(Arc::new(BrokenStore), Arc::new(ManualClock::new(0)));
        let result = cache.set("k", "T", "C").await;
        assert!(matches!(result, Err(Error::CacheWriteFailed(msg)) if msg.contains("store offline")));
    }
}
