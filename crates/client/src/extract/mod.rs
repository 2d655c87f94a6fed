//! HTML parsing and readable content extraction.
//!
//! Two stable seams, so the engines can be swapped without touching the
//! pipeline:
//!
//! - [`DocumentParser`]: raw text to a [`ParsedDocument`] (dom_query)
//! - [`Extractor`]: parsed document to an [`Article`] (dom_smoothie, a
//!   Readability.js port)
//!
//! The DOM built by the parser is the one the extractor consumes; the text
//! is parsed once. Both steps are synchronous and the document is not
//! `Send`, so callers in async code should run them back to back without an
//! await in between.

use std::fmt;

use dom_query::Document;
use dom_smoothie::{Config as ReadabilityConfig, Readability};
use lucid_core::Error;
use url::Url;

/// Title used when neither extraction nor the `<title>` element yields one.
pub const UNTITLED: &str = "Untitled";

/// Configuration for content extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Minimum character count for content (default: 500)
    pub char_threshold: Option<usize>,

    /// Refuse documents with more elements than this (default: no limit)
    pub max_elements_to_parse: Option<usize>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { char_threshold: Some(500), max_elements_to_parse: None }
    }
}

impl ExtractConfig {
    fn to_readability_config(&self) -> ReadabilityConfig {
        let mut cfg = ReadabilityConfig::default();
        if let Some(threshold) = self.char_threshold {
            cfg.char_threshold = threshold;
        }
        if let Some(max) = self.max_elements_to_parse {
            cfg.max_elements_to_parse = max;
        }
        cfg
    }
}

/// A fetched document that parsed as HTML.
pub struct ParsedDocument {
    dom: Document,
    title: Option<String>,
}

impl fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedDocument").field("title", &self.title).finish_non_exhaustive()
    }
}

impl ParsedDocument {
    /// Wrap a parsed DOM, reading its `<title>`.
    pub fn new(dom: Document) -> Self {
        let title = dom
            .try_select("title")
            .map(|t| t.first().text().trim().to_string())
            .filter(|t| !t.is_empty());
        Self { dom, title }
    }

    /// Parse `text` without any acceptance checks.
    pub fn from_html(text: &str) -> Self {
        Self::new(Document::from(text))
    }

    /// The parsed DOM.
    pub fn dom(&self) -> &Document {
        &self.dom
    }

    /// Trimmed contents of the `<title>` element, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Readable article pulled out of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    /// Article body as HTML.
    pub content: String,
}

/// Parses fetched text into a document.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ParsedDocument, Error>;
}

/// Extracts the readable article from a parsed document.
pub trait Extractor: Send + Sync {
    /// Consumes `doc`. `base_url` resolves relative links inside the article.
    fn extract(&self, doc: ParsedDocument, base_url: &Url) -> Result<Article, Error>;
}

/// [`DocumentParser`] backed by dom_query's html5ever tree builder.
///
/// html5ever recovers from any input, so a document is rejected only when
/// it is blank or its body carries neither elements nor text. Anything else,
/// plain text included, is handed to the extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl DocumentParser for HtmlParser {
    fn parse(&self, text: &str) -> Result<ParsedDocument, Error> {
        if text.trim().is_empty() {
            return Err(Error::ParseFailed("empty document".into()));
        }

        let doc = ParsedDocument::from_html(text);

        let has_body = doc
            .dom()
            .try_select("body")
            .is_some_and(|body| body.children().exists() || !body.text().trim().is_empty());
        if !has_body {
            return Err(Error::ParseFailed("document has no body content".into()));
        }

        Ok(doc)
    }
}

/// [`Extractor`] backed by dom_smoothie.
#[derive(Debug, Clone, Default)]
pub struct ReadabilityExtractor {
    config: ExtractConfig,
}

impl ReadabilityExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }
}

impl Extractor for ReadabilityExtractor {
    fn extract(&self, doc: ParsedDocument, base_url: &Url) -> Result<Article, Error> {
        let ParsedDocument { dom, title: doc_title } = doc;

        let mut readability =
            Readability::with_document(dom, Some(base_url.as_str()), Some(self.config.to_readability_config()))
                .map_err(|e| Error::ExtractFailed(format!("failed to load document: {e}")))?;

        let article = readability
            .parse()
            .map_err(|e| Error::ExtractFailed(format!("extraction failed: {e}")))?;

        let content = article.content.to_string();
        if content.trim().is_empty() {
            return Err(Error::ExtractFailed("no readable content".into()));
        }

        let title = Some(article.title.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or(doc_title)
            .unwrap_or_else(|| UNTITLED.to_string());

        Ok(Article { title, content })
    }
}
