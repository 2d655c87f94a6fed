//! Request pipeline: cache lookup, then fetch, extract, store and render.
//!
//! A cached page is served as is with a "Cached on" notice. On a miss (or an
//! unreadable entry) the document is fetched, run through the parser and
//! extractor, written back, and rendered fresh. A failed write-back never
//! fails the request.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use lucid_client::{Article, DocumentParser, Extractor, Fetcher, NormalizedUrl, normalize, render_page};
use lucid_core::{CacheLookup, ContentCache, Error, compute_cache_key};
use url::Url;

use crate::error::PipelineError;

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Nothing to proxy: the path was empty or ignored.
    Placeholder,
    Page(RenderedPage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    pub content: String,
    /// Write time of the cache entry the page was served from.
    pub cached_at: Option<i64>,
    pub html: String,
}

impl RenderedPage {
    fn new(source: &Url, title: String, content: String, cached_at: Option<i64>) -> Self {
        let html = render_page(source.as_str(), &title, &content, cached_at);
        Self { title, content, cached_at, html }
    }
}

pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn DocumentParser>,
    extractor: Arc<dyn Extractor>,
    cache: ContentCache,
    ignore_paths: Vec<String>,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>, parser: Arc<dyn DocumentParser>, extractor: Arc<dyn Extractor>,
        cache: ContentCache, ignore_paths: Vec<String>,
    ) -> Self {
        Self { fetcher, parser, extractor, cache, ignore_paths }
    }

    /// Resolve a decoded request path (leading `/` removed) to a page.
    ///
    /// The cache key is the digest of `raw_path` exactly as received, so
    /// `example.com/a` and `https://example.com/a` are cached separately.
    pub async fn resolve(&self, raw_path: &str) -> Result<Resolved, PipelineError> {
        if raw_path.is_empty() || self.ignore_paths.iter().any(|p| p == raw_path) {
            return Ok(Resolved::Placeholder);
        }

        let target = normalize(raw_path).map_err(|e| {
            tracing::warn!(path = raw_path, error = %e, "rejected request path");
            PipelineError::Internal(e.to_string())
        })?;

        let key = compute_cache_key(raw_path);

        match self.cache.get(&key).await {
            CacheLookup::Hit(page) => {
                tracing::debug!(url = %target.url, key, "cache hit");
                return Ok(Resolved::Page(RenderedPage::new(
                    &target.url,
                    page.title,
                    page.content,
                    Some(page.timestamp),
                )));
            }
            CacheLookup::Miss => tracing::debug!(url = %target.url, key, "cache miss"),
            CacheLookup::Corrupt(_) | CacheLookup::Unavailable(_) => {
                tracing::debug!(url = %target.url, key, "cache entry unusable, refetching")
            }
        }

        match AssertUnwindSafe(self.populate(&key, &target)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(url = %target.url, panic = %message, "pipeline panicked");
                Err(PipelineError::Internal(message))
            }
        }
    }

    async fn populate(&self, key: &str, target: &NormalizedUrl) -> Result<Resolved, PipelineError> {
        let text = self.fetcher.fetch_text(&target.url).await.map_err(|e| {
            tracing::warn!(url = %target.url, error = %e, "fetch failed");
            PipelineError::FetchFailed(e.to_string())
        })?;

        let article = self.extract(&text, &target.fallback_uri).map_err(|e| {
            tracing::warn!(url = %target.url, error = %e, "extraction failed");
            PipelineError::ParseFailed(e.to_string())
        })?;

        if let Err(e) = self.cache.set(key, &article.title, &article.content).await {
            tracing::warn!(url = %target.url, key, error = %e, "cache write failed, serving uncached");
        }

        Ok(Resolved::Page(RenderedPage::new(&target.url, article.title, article.content, None)))
    }

    fn extract(&self, text: &str, base_url: &Url) -> Result<Article, Error> {
        let doc = self.parser.parse(text)?;
        self.extractor.extract(doc, base_url)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
