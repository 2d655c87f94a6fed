//! Read-through page cache and its storage substrates.
//!
//! Pages are addressed by a SHA-256 digest of the requested URL, stored with
//! zlib-compressed content, and expire a fixed [`PAGE_TTL`] after they were
//! written. Expiry is enforced by the store: once the horizon passes, a
//! `get` behaves as if the key was never written.
//!
//! - [`CacheDb`]: SQLite backend (tokio-rusqlite, WAL mode, migrations)
//! - [`MemoryStore`]: in-process backend
//! - [`ContentCache`]: codec + clock + store, the interface the pipeline uses

pub mod codec;
pub mod connection;
pub mod content;
pub mod hash;
pub mod memory;
pub mod migrations;
pub mod pages;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use hash::compute_cache_key;
pub use content::{CacheLookup, ContentCache, PAGE_TTL, Page};
pub use memory::MemoryStore;
pub use store::{PageStore, StoredPage};
