//! Core types and shared functionality for lucid.
//!
//! This crate provides:
//! - The content cache and its storage substrates (SQLite, in-memory)
//! - Cache key hashing and payload compression
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;

pub use cache::{
    CacheDb, CacheLookup, ContentCache, MemoryStore, PAGE_TTL, Page, PageStore, StoredPage, compute_cache_key,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
