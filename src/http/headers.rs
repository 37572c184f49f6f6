//! Header translation between the server's parsed headers and the outbound
//! upstream request.
//!
//! Incoming headers are first captured in transport form, the CGI-style
//! environment keys (`HTTP_X_FOO_BAR`, `CONTENT_TYPE`). Outbound headers are
//! rebuilt from that environment:
//! - `HTTP_*` keys are forwarded, except `HTTP_HOST` (the client derives
//!   `Host` from the upstream URL; upstreams reject a foreign one)
//! - `CONTENT_TYPE` is forwarded although it carries no prefix
//! - everything else (`CONTENT_LENGTH`, ...) is dropped

use axum::http::{HeaderMap, HeaderName, HeaderValue};

const PREFIX: &str = "HTTP_";
const HOST_KEY: &str = "HTTP_HOST";
const CONTENT_TYPE_KEY: &str = "CONTENT_TYPE";
const CONTENT_LENGTH_KEY: &str = "CONTENT_LENGTH";

/// Transport-form header environment, in first-seen order.
pub type TransportHeaders = Vec<(String, HeaderValue)>;

/// Capture parsed request headers in transport form.
///
/// Repeated headers are folded into one entry joined with `", "`.
pub fn transport_headers(headers: &HeaderMap) -> TransportHeaders {
    headers
        .keys()
        .filter_map(|name| {
            let value = fold_values(headers, name)?;
            Some((transport_key(name), value))
        })
        .collect()
}

fn transport_key(name: &HeaderName) -> String {
    match name.as_str() {
        "content-type" => CONTENT_TYPE_KEY.to_string(),
        "content-length" => CONTENT_LENGTH_KEY.to_string(),
        other => format!("{}{}", PREFIX, other.to_ascii_uppercase().replace('-', "_")),
    }
}

fn fold_values(headers: &HeaderMap, name: &HeaderName) -> Option<HeaderValue> {
    let mut values = headers.get_all(name).iter();
    let first = values.next()?;
    let mut folded = first.as_bytes().to_vec();
    for value in values {
        folded.extend_from_slice(b", ");
        folded.extend_from_slice(value.as_bytes());
    }
    HeaderValue::from_bytes(&folded).ok()
}

/// Translate a transport-form environment into outbound headers.
pub fn translate_headers<'a, I>(env: I) -> HeaderMap
where
    I: IntoIterator<Item = (&'a str, &'a HeaderValue)>,
{
    let mut out = HeaderMap::new();
    for (key, value) in env {
        if !is_forwardable(key) {
            continue;
        }
        let canonical = canonical_name(key);
        match HeaderName::from_bytes(canonical.as_bytes()) {
            Ok(name) => {
                out.insert(name, value.clone());
            }
            Err(_) => {
                tracing::debug!(key = %key, "Skipping untranslatable header");
            }
        }
    }
    out
}

fn is_forwardable(key: &str) -> bool {
    (key.starts_with(PREFIX) && key != HOST_KEY) || key == CONTENT_TYPE_KEY
}

/// `HTTP_X_FOO_BAR` → `X-Foo-Bar`, `CONTENT_TYPE` → `Content-Type`.
pub fn canonical_name(key: &str) -> String {
    key.strip_prefix(PREFIX)
        .unwrap_or(key)
        .split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize(segment: &str) -> String {
    let lower = segment.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
