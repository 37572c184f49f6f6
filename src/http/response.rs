//! Responses the proxy produces itself.
//!
//! # Responsibilities
//! - Map the few client-visible failures to status codes
//! - Serve the liveness/readiness endpoints
//!
//! # Design Decisions
//! - Only a primary failure or an unreadable request body reaches the client
//! - Primary failures return 502 Bad Gateway, never retried

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::mirror::MirrorError;

/// Errors surfaced to the HTTP caller.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to read request body: {0}")]
    RequestBody(#[from] axum::Error),

    #[error(transparent)]
    Upstream(#[from] MirrorError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::RequestBody(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = match self {
            ProxyError::RequestBody(_) => "Request body unreadable or too large",
            ProxyError::Upstream(_) => "Upstream request failed",
        };
        (self.status(), message).into_response()
    }
}

/// `GET /healthcheck/live` and `GET /healthcheck/ready`.
pub async fn healthcheck() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], "OK")
}
