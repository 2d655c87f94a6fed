//! Stub capabilities shared by the server tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lucid_client::{Article, DocumentParser, Extractor, Fetcher, ParsedDocument};
use lucid_core::{ContentCache, Error, ManualClock, MemoryStore, PageStore, StoredPage};
use url::Url;

use crate::pipeline::Pipeline;

pub const START: i64 = 1_709_647_620_000;

pub const ARTICLE_BODY: &str = "<html><head><title>Stub Title</title></head><body><p>Readable words.</p></body></html>";

/// Serves a fixed body for every URL, or fails every fetch when `body` is `None`.
pub struct StubFetcher {
    body: Option<String>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn serving(body: &str) -> Arc<Self> {
        Arc::new(Self { body: Some(body.to_string()), calls: AtomicUsize::new(0), requested: Mutex::new(Vec::new()) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { body: None, calls: AtomicUsize::new(0), requested: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());
        self.body.clone().ok_or_else(|| Error::HttpError("status 404".into()))
    }
}

pub struct PanickingFetcher;

#[async_trait]
impl Fetcher for PanickingFetcher {
    async fn fetch_text(&self, _url: &Url) -> Result<String, Error> {
        panic!("fetcher exploded");
    }
}

/// Accepts anything that looks like markup. Stricter than `HtmlParser`, which
/// lets plain text through to extraction.
pub struct StubParser;

impl DocumentParser for StubParser {
    fn parse(&self, text: &str) -> Result<ParsedDocument, Error> {
        if text.trim_start().starts_with('<') {
            Ok(ParsedDocument::from_html(text))
        } else {
            Err(Error::ParseFailed("not markup".into()))
        }
    }
}

/// Uses the whole body as the article and records the base URL it was given.
#[derive(Default)]
pub struct StubExtractor {
    bases: Mutex<Vec<String>>,
}

impl StubExtractor {
    pub fn bases(&self) -> Vec<String> {
        self.bases.lock().unwrap().clone()
    }
}

impl Extractor for StubExtractor {
    fn extract(&self, doc: ParsedDocument, base_url: &Url) -> Result<Article, Error> {
        self.bases.lock().unwrap().push(base_url.to_string());
        let content = doc.dom().select("body").inner_html().to_string();
        Ok(Article { title: doc.title().unwrap_or("Untitled").to_string(), content })
    }
}

/// Reads miss and writes fail.
pub struct FailingStore;

#[async_trait]
impl PageStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<StoredPage>, Error> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _page: StoredPage, _ttl: std::time::Duration) -> Result<(), Error> {
        Err(Error::CacheWriteFailed("disk full".into()))
    }
}

pub struct Harness {
    pub pipeline: Pipeline,
    pub store: MemoryStore,
    pub clock: ManualClock,
    pub extractor: Arc<StubExtractor>,
}

/// A pipeline over a memory store, with the stub parser and extractor.
pub fn harness(fetcher: Arc<dyn Fetcher>) -> Harness {
    let clock = ManualClock::new(START);
    let store = MemoryStore::new(Arc::new(clock.clone()));
    let cache = ContentCache::new(Arc::new(store.clone()), Arc::new(clock.clone()));
    let extractor = Arc::new(StubExtractor::default());
    let pipeline = Pipeline::new(fetcher, Arc::new(StubParser), extractor.clone(), cache, vec!["favicon.ico".into()]);
    Harness { pipeline, store, clock, extractor }
}
