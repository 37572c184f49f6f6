//! HTTP client for a single upstream exchange.
//!
//! # Responsibilities
//! - Build the outbound request from the materialized incoming request
//! - Enforce the optional per-call timeout over send and body read
//! - Stamp elapsed time as `X-Response-Time`
//! - Materialize streamed bodies and reconcile Content-Length/Transfer-Encoding

use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, Request};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::headers::translate_headers;
use crate::http::request::IncomingRequest;
use crate::observability::metrics;
use crate::resilience::timeouts::with_optional_timeout;
use crate::upstream::{UpstreamError, UpstreamResponse, UpstreamTarget, X_RESPONSE_TIME};

/// Pooled client shared by both sides of the mirror.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamClient {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new())
            .http1_title_case_headers(true)
            .build(HttpConnector::new());
        Self { client }
    }

    /// Send `request` to `target` and buffer the response.
    pub async fn forward(
        &self,
        target: &UpstreamTarget,
        request: &IncomingRequest,
        timeout: Option<Duration>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let outbound = self.build_request(target, request)?;
        let start = Instant::now();

        let exchange = async {
            let response = self.client.request(outbound).await?;
            let (parts, body) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(body), usize::MAX).await?;
            Ok::<_, UpstreamError>((parts, body))
        };

        let (parts, body) = with_optional_timeout(timeout, exchange)
            .await
            .map_err(|_| UpstreamError::Timeout(timeout.unwrap_or_default()))??;

        let elapsed = start.elapsed();
        metrics::record_upstream(target.role().as_str(), elapsed);

        let mut headers = parts.headers;
        let body = normalize_body(&mut headers, body);
        headers.insert(
            X_RESPONSE_TIME,
            HeaderValue::from_str(&elapsed.as_secs_f64().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("0")),
        );

        tracing::debug!(
            upstream = %target,
            role = %target.role(),
            status = %parts.status,
            elapsed_ms = elapsed.as_millis() as u64,
            body_size = body.len(),
            "Upstream responded"
        );

        Ok(UpstreamResponse {
            status: parts.status,
            headers,
            body,
        })
    }

    fn build_request(
        &self,
        target: &UpstreamTarget,
        request: &IncomingRequest,
    ) -> Result<Request<Body>, UpstreamError> {
        let uri = target.uri_for(&request.path_and_query())?;

        let mut outbound = Request::builder()
            .method(request.method.clone())
            .uri(uri)
            .body(Body::from(request.body.clone()))?;

        let headers = outbound.headers_mut();
        headers.extend(translate_headers(
            request.headers.iter().map(|(k, v)| (k.as_str(), v)),
        ));
        // The payload is already buffered; it is never sent chunked.
        headers.remove(header::TRANSFER_ENCODING);

        Ok(outbound)
    }
}

/// Reconcile a buffered body with its headers.
///
/// A body the upstream streamed (chunked) gets a trailing newline. Afterwards
/// `Content-Length` is filled in when missing and `Transfer-Encoding` removed;
/// the two never coexist.
pub fn normalize_body(headers: &mut HeaderMap, body: Bytes) -> Bytes {
    let body = if headers.contains_key(header::TRANSFER_ENCODING) {
        let mut buffered = Vec::with_capacity(body.len() + 1);
        buffered.extend_from_slice(&body);
        buffered.push(b'\n');
        Bytes::from(buffered)
    } else {
        body
    };

    headers.remove(header::TRANSFER_ENCODING);
    if !headers.contains_key(header::CONTENT_LENGTH) {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    }

    body
}
