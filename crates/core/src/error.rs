//! Unified error types for lucid.
//!
//! Each variant renders with a stable code prefix so log lines can be
//! grepped by failure class.

use tokio_rusqlite::rusqlite;

/// Unified error types for the lucid libraries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP error response or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// The fetched text could not be parsed into a document.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// Content extraction failed or produced nothing usable.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// A stored entry could not be decoded.
    #[error("CACHE_CORRUPT: {0}")]
    CorruptCacheEntry(String),

    /// Writing an entry to the store failed.
    #[error("CACHE_WRITE_FAILED: {0}")]
    CacheWriteFailed(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// Whether this error belongs to the fetch side of the pipeline.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Error::HttpError(_) | Error::FetchTimeout(_) | Error::FetchTooLarge(_)
        )
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
