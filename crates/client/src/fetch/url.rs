//! Target URL normalization.

use url::Url;

/// Error type for URL normalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// A request path turned into a fetchable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// The URL to fetch.
    pub url: Url,
    /// Origin plus path, without query or fragment. Used as the base for
    /// resolving relative links during extraction.
    pub fallback_uri: Url,
}

/// Normalize a proxied path into a URL.
///
/// Prefixes `https://` unless the input already starts with `http://` or
/// `https://`, then parses it. The input is otherwise left as is.
pub fn normalize(input: &str) -> Result<NormalizedUrl, UrlError> {
    if input.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if has_http_scheme(input) { input.to_string() } else { format!("https://{input}") };

    let url = Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::InvalidUrl(format!("missing host: {input}")));
    }

    let mut fallback_uri = url.clone();
    fallback_uri.set_query(None);
    fallback_uri.set_fragment(None);

    Ok(NormalizedUrl { url, fallback_uri })
}

fn has_http_scheme(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
