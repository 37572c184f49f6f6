//! Concurrent fan-out to the primary and secondary upstreams.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinError;

use crate::http::request::IncomingRequest;
use crate::observability::metrics;
use crate::upstream::{UpstreamClient, UpstreamError, UpstreamResponse, UpstreamTarget};

/// Failures that abort a mirrored request. Only the primary can fail it.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("primary upstream failed: {0}")]
    Primary(#[from] UpstreamError),

    #[error("primary upstream task failed: {0}")]
    PrimaryTask(#[from] JoinError),
}

/// Outcome of one mirrored request.
pub type MirrorOutcome = (UpstreamResponse, Option<UpstreamResponse>);

/// Forward `request` to both upstreams concurrently and wait for both.
///
/// The primary call is unbounded and its failure is returned to the caller.
/// The secondary call is bounded by the secondary target's timeout; any
/// failure there is logged and becomes `None`.
pub async fn mirror(
    client: &UpstreamClient,
    primary: &Arc<UpstreamTarget>,
    secondary: &Arc<UpstreamTarget>,
    request: Arc<IncomingRequest>,
) -> Result<MirrorOutcome, MirrorError> {
    let primary_task = {
        let client = client.clone();
        let target = primary.clone();
        let request = request.clone();
        tokio::spawn(async move { client.forward(&target, &request, None).await })
    };

    let secondary_task = {
        let client = client.clone();
        let target = secondary.clone();
        let request = request.clone();
        tokio::spawn(async move { client.forward(&target, &request, target.timeout()).await })
    };

    let (primary_joined, secondary_joined) = tokio::join!(primary_task, secondary_task);

    let secondary_response = match secondary_joined {
        Ok(Ok(response)) => Some(response),
        Ok(Err(e)) => {
            tracing::warn!(
                upstream = %secondary,
                method = %request.method,
                path = %request.path,
                reason = e.reason(),
                error = %e,
                "Secondary upstream failed, comparing without it"
            );
            metrics::record_secondary_failure(e.reason());
            None
        }
        Err(e) => {
            tracing::error!(upstream = %secondary, error = %e, "Secondary upstream task failed");
            metrics::record_secondary_failure("task");
            None
        }
    };

    let primary_response = primary_joined??;

    Ok((primary_response, secondary_response))
}
