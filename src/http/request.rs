//! Incoming request capture.
//!
//! # Responsibilities
//! - Materialize the request body exactly once, before fan-out
//! - Capture method, path, query string and transport-form headers
//! - Hand an immutable snapshot to both upstream calls
//!
//! # Design Decisions
//! - The body stream cannot be read twice, so it is buffered eagerly
//! - Body size bounded by `limits.max_body_size`

use axum::body::{Body, Bytes};
use axum::http::{Method, Request};

use crate::http::headers::{transport_headers, TransportHeaders};

/// Immutable snapshot of one inbound request.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub path: String,
    pub query_string: String,
    pub headers: TransportHeaders,
    pub body: Bytes,
}

/// Request metadata carried into the comparison log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub method: String,
    pub path: String,
    pub query_string: String,
}

impl IncomingRequest {
    /// Read the full body and capture the request.
    pub async fn materialize(request: Request<Body>, max_body_size: usize) -> Result<Self, axum::Error> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, max_body_size).await?;

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query_string: parts.uri.query().unwrap_or_default().to_string(),
            headers: transport_headers(&parts.headers),
            body,
        })
    }

    /// `path?query`, or just `path` when the query string is empty.
    pub fn path_and_query(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }

    pub fn meta(&self) -> RequestMeta {
        RequestMeta {
            method: self.method.to_string(),
            path: self.path.clone(),
            query_string: self.query_string.clone(),
        }
    }
}
