//! HTTP dispatcher.
//!
//! Every method and path lands on one fallback handler. The path (percent
//! decoded, leading `/` removed) is the target to proxy; query strings on
//! the proxy request itself are ignored.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::Uri,
    response::{Html, IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use tower_http::trace::TraceLayer;

use crate::error::PipelineError;
use crate::pipeline::{Pipeline, Resolved};

pub const PLACEHOLDER_BODY: &str = "Append a URL in the address bar to begin.";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dispatch(State(state): State<AppState>, uri: Uri) -> Response {
    let target = match request_target(uri.path()) {
        Ok(target) => target,
        Err(e) => {
            tracing::warn!(path = uri.path(), error = %e, "undecodable request path");
            return PipelineError::Internal(e.to_string()).into_response();
        }
    };

    match state.pipeline.resolve(&target).await {
        Ok(Resolved::Placeholder) => Html(PLACEHOLDER_BODY).into_response(),
        Ok(Resolved::Page(page)) => Html(page.html).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Decode the request path into the target the pipeline resolves.
fn request_target(path: &str) -> Result<String, std::str::Utf8Error> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    percent_decode_str(trimmed).decode_utf8().map(|s| s.into_owned())
}
