//! Pipeline outcome errors and their HTTP mapping.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

pub const FETCH_FAILED_BODY: &str = "Unable to fetch page";
pub const PARSE_FAILED_BODY: &str = "Unable to parse page";
pub const INTERNAL_BODY: &str = "Something went wrong";

/// Failure of a pipeline run. Every variant is served as a 500.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Network error or non-success status while retrieving the document.
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// The document did not parse or yielded no article.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// Bad input URL or an unexpected failure.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Body text shown to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            PipelineError::FetchFailed(_) => FETCH_FAILED_BODY,
            PipelineError::ParseFailed(_) => PARSE_FAILED_BODY,
            PipelineError::Internal(_) => INTERNAL_BODY,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, [(header::CONTENT_TYPE, "text/html")], self.public_message())
            .into_response()
    }
}
