//! Page storage on the SQLite backend.

use std::time::Duration;

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::store::{PageStore, StoredPage};
use crate::Error;

impl CacheDb {
    /// Insert or replace a page with an explicit expiry horizon.
    pub async fn upsert_page(&self, hash: &str, page: &StoredPage, expires_at: i64) -> Result<(), Error> {
        let hash = hash.to_string();
        let page = page.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO pages (hash, title, content, timestamp, expires_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(hash) DO UPDATE SET
                        title = excluded.title,
                        content = excluded.content,
                        timestamp = excluded.timestamp,
                        expires_at = excluded.expires_at",
                    params![hash, page.title, page.content, page.timestamp, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a live page by hash.
    ///
    /// Rows whose expiry horizon is at or before the clock's current time
    /// are treated as absent.
    pub async fn get_page(&self, hash: &str) -> Result<Option<StoredPage>, Error> {
        let hash = hash.to_string();
        let now = self.clock.now_millis();
        self.conn
            .call(move |conn| -> Result<Option<StoredPage>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT title, content, timestamp FROM pages
                     WHERE hash = ?1 AND expires_at > ?2",
                )?;

                let result = stmt.query_row(params![hash, now], |row| {
                    Ok(StoredPage { title: row.get(0)?, content: row.get(1)?, timestamp: row.get(2)? })
                });

                match result {
                    Ok(page) => Ok(Some(page)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Delete pages whose expiry horizon has passed.
    ///
    /// Returns the number of deleted rows.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = self.clock.now_millis();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM pages WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Total number of stored rows, live or not yet purged.
    pub async fn count_pages(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl PageStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<StoredPage>, Error> {
        self.get_page(key).await
    }

    async fn set(&self, key: &str, page: StoredPage, ttl: Duration) -> Result<(), Error> {
        let expires_at = page.expires_at(ttl);
        self.upsert_page(key, &page, expires_at).await
    }
}
