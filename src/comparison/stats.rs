//! Quick per-response statistics.

use axum::http::header;

use crate::comparison::record::ResponseStats;
use crate::upstream::{UpstreamResponse, X_RESPONSE_TIME};

/// Status, size, timing and redirect target of a response.
///
/// Timing is read back from `X-Response-Time`; a missing or unparseable value
/// counts as zero.
pub fn response_stats(response: &UpstreamResponse) -> ResponseStats {
    let elapsed_seconds = response
        .headers
        .get(X_RESPONSE_TIME)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0);

    let location = if response.status.is_redirection() {
        response
            .headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    } else {
        None
    };

    ResponseStats {
        status: response.status.as_u16(),
        body_size: response.body.len(),
        elapsed_seconds,
        location,
    }
}
