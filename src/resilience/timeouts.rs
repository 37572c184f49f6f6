//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with an optional deadline
//! - Cancel the wrapped future cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - `None` means wait forever; the primary is never bounded
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

use tokio::time::error::Elapsed;

/// Run `fut` under `limit`, or unbounded when `limit` is `None`.
pub async fn with_optional_timeout<F, T>(limit: Option<Duration>, fut: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await,
        None => Ok(fut.await),
    }
}
