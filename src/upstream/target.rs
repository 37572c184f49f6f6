//! Upstream target definitions.

use std::fmt;
use std::time::Duration;

use axum::http::uri::{Authority, InvalidUri, Scheme};
use axum::http::Uri;
use thiserror::Error;

/// Why a base URL cannot be used as an upstream target.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid upstream URL: {0}")]
    Invalid(#[from] InvalidUri),

    #[error("upstream URL '{0}' must be absolute (scheme and host)")]
    NotAbsolute(String),
}

/// Which side of the mirror a target sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Primary,
    Secondary,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A base URL plus an optional per-call timeout.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    role: Role,
    scheme: Scheme,
    authority: Authority,
    timeout: Option<Duration>,
}

impl UpstreamTarget {
    /// The authoritative upstream. Never carries a timeout.
    pub fn primary(base_url: &str) -> Result<Self, TargetError> {
        Self::new(Role::Primary, base_url, None)
    }

    pub fn secondary(base_url: &str, timeout: Option<Duration>) -> Result<Self, TargetError> {
        Self::new(Role::Secondary, base_url, timeout)
    }

    fn new(role: Role, base_url: &str, timeout: Option<Duration>) -> Result<Self, TargetError> {
        let parts = base_url.parse::<Uri>()?.into_parts();
        let (Some(scheme), Some(authority)) = (parts.scheme, parts.authority) else {
            return Err(TargetError::NotAbsolute(base_url.to_string()));
        };

        Ok(Self {
            role,
            scheme,
            authority,
            timeout,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Absolute URI for `path_and_query` on this upstream.
    ///
    /// Any path on the base URL is replaced, the way an absolute request
    /// path resolves against a base.
    pub fn uri_for(&self, path_and_query: &str) -> Result<Uri, axum::http::Error> {
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
