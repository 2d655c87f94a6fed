//! In-process page store.
//!
//! Backed by a HashMap behind a tokio RwLock. Used by tests; contents are
//! lost on restart. Expired entries are swept on every write, so the map
//! holds at most the live entries plus those expired since the last `set`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{PageStore, StoredPage};
use crate::Error;
use crate::clock::{Clock, SystemClock};

struct Entry {
    page: StoredPage,
    expires_at: i64,
}

/// In-memory [`PageStore`] with clock-driven expiry.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { entries: Arc::new(RwLock::new(HashMap::new())), clock }
    }

    /// Number of entries held, including any that expired since the last write.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Replace a stored entry's content bytes, keeping its expiry.
    ///
    /// Returns false if the key is not present.
    pub async fn overwrite_content(&self, key: &str, content: Vec<u8>) -> bool {
        match self.entries.write().await.get_mut(key) {
            Some(entry) => {
                entry.page.content = content;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoredPage>, Error> {
        let now = self.clock.now_millis();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.page.clone()))
    }

    async fn set(&self, key: &str, page: StoredPage, ttl: Duration) -> Result<(), Error> {
        let now = self.clock.now_millis();
        let expires_at = page.expires_at(ttl);

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(key.to_string(), Entry { page, expires_at });
        Ok(())
    }
}
