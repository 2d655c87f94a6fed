//! lucid server entry point.
//!
//! Boots the reader-mode proxy: loads layered configuration, opens the SQLite
//! page cache, and serves every path through the extraction pipeline.
//! Logs are JSON on stdout, filtered by `RUST_LOG` (default `info`).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use lucid_client::{FetchClient, FetchConfig, HtmlParser, ReadabilityExtractor};
use lucid_core::{AppConfig, CacheDb, ContentCache, SystemClock};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod pipeline;
#[cfg(test)]
mod test_support;

use handler::AppState;
use pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = AppConfig::load()?;

    let db = CacheDb::open(&config.db_path).await?;
    tracing::info!(path = %config.db_path.display(), "opened page cache");

    if let Some(every) = config.purge_interval() {
        tokio::spawn(purge_expired(db.clone(), every));
    }

    let cache = ContentCache::new(Arc::new(db), Arc::new(SystemClock));
    let fetcher = FetchClient::new(FetchConfig::from(&config))?;
    let pipeline = Pipeline::new(
        Arc::new(fetcher),
        Arc::new(HtmlParser),
        Arc::new(ReadabilityExtractor::default()),
        cache,
        config.ignore_paths.clone(),
    );

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "lucid listening");

    axum::serve(listener, handler::router(AppState::new(pipeline)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("lucid stopped");
    Ok(())
}

/// Periodically drop expired rows. Reads already skip them; this only
/// reclaims space.
async fn purge_expired(db: CacheDb, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match db.purge_expired().await {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "purged expired pages"),
            Err(e) => tracing::warn!(error = %e, "purge of expired pages failed"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
