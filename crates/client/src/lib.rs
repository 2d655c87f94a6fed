//! Client code for lucid.
//!
//! This crate provides the outbound HTTP fetch, HTML parsing and readable
//! content extraction, and the reader-view renderer used by the server.

pub mod extract;
pub mod fetch;
pub mod render;

pub use extract::{
    Article, DocumentParser, ExtractConfig, Extractor, HtmlParser, ParsedDocument, ReadabilityExtractor,
};
pub use fetch::{FetchClient, FetchConfig, Fetcher, NormalizedUrl, UrlError, normalize};
pub use render::render_page;
