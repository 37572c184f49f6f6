//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! IncomingRequest (materialized)
//!     → target.rs (base URL + path?query → absolute URI)
//!     → client.rs (translated headers, one exchange, optional timeout)
//!     → body normalization (stream → buffer, Content-Length fixed)
//!     → UpstreamResponse | UpstreamError
//! ```
//!
//! # Design Decisions
//! - Responses are always fully buffered; comparison needs the whole body
//! - Elapsed time travels with the response as `X-Response-Time`

pub mod client;
pub mod target;

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Response, StatusCode};
use axum::response::IntoResponse;
use thiserror::Error;

pub use client::UpstreamClient;
pub use target::{Role, TargetError, UpstreamTarget};

/// Response header carrying the upstream exchange time in seconds.
pub const X_RESPONSE_TIME: &str = "x-response-time";

/// A fully materialized upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> axum::response::Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Errors from a single upstream exchange.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[from] axum::Error),
}

impl UpstreamError {
    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Request(_) => "request",
            UpstreamError::Body(_) => "body",
        }
    }
}
