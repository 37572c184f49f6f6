//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create Axum Router with the health endpoints and the mirror handler
//! - Wire up middleware (tracing)
//! - Bind server to listener with graceful shutdown
//! - Per request: materialize, mirror, compare, log, return the primary

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::comparison::{compare, RandomSampler, Sampler};
use crate::config::validation::ValidationError;
use crate::config::{ComparisonConfig, ConfigError, MirrorConfig};
use crate::http::request::IncomingRequest;
use crate::http::response::{healthcheck, ProxyError};
use crate::mirror::mirror;
use crate::observability::metrics;
use crate::observability::{render, LogSink, StdoutSink};
use crate::upstream::{UpstreamClient, UpstreamResponse, UpstreamTarget};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: UpstreamClient,
    pub primary: Arc<UpstreamTarget>,
    pub secondary: Arc<UpstreamTarget>,
    pub comparison: Arc<ComparisonConfig>,
    pub sampler: Arc<dyn Sampler>,
    pub sink: Arc<dyn LogSink>,
    pub max_body_size: usize,
}

/// HTTP server for the mirror proxy.
pub struct HttpServer {
    router: Router,
    config: MirrorConfig,
}

impl HttpServer {
    /// Create a server that samples randomly and logs to stdout.
    pub fn new(config: MirrorConfig) -> Result<Self, ConfigError> {
        Self::with_components(config, Arc::new(RandomSampler), Arc::new(StdoutSink))
    }

    /// Create a server with an explicit sampler and log sink.
    pub fn with_components(
        config: MirrorConfig,
        sampler: Arc<dyn Sampler>,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, ConfigError> {
        let target_error = |role: &'static str, url: &str, reason: String| {
            ConfigError::Validation(vec![ValidationError::InvalidUpstream {
                role,
                url: url.to_string(),
                reason,
            }])
        };

        let primary = UpstreamTarget::primary(&config.upstreams.primary)
            .map_err(|e| target_error("primary", &config.upstreams.primary, e.to_string()))?;
        let secondary = UpstreamTarget::secondary(
            &config.upstreams.secondary,
            config.upstreams.secondary_timeout(),
        )
        .map_err(|e| target_error("secondary", &config.upstreams.secondary, e.to_string()))?;

        let state = AppState {
            client: UpstreamClient::new(),
            primary: Arc::new(primary),
            secondary: Arc::new(secondary),
            comparison: Arc::new(config.comparison.clone()),
            sampler,
            sink,
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// No request timeout layer: the primary is always awaited.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/healthcheck/live", health_route())
            .route("/healthcheck/ready", health_route())
            .fallback(mirror_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The configured router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            primary = %self.config.upstreams.primary,
            secondary = %self.config.upstreams.secondary,
            sample_percent = self.config.comparison.sample_percent,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Only GET is answered locally; `get` alone would also answer HEAD.
fn health_route() -> MethodRouter<AppState> {
    get(healthcheck).head(mirror_handler).fallback(mirror_handler)
}

/// Mirror handler.
/// Forwards to both upstreams, logs the comparison, returns the primary.
async fn mirror_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, ProxyError> {
    let start_time = Instant::now();
    let method = request.method().to_string();

    let incoming = Arc::new(IncomingRequest::materialize(request, state.max_body_size).await?);

    tracing::debug!(
        method = %incoming.method,
        path = %incoming.path,
        body_size = incoming.body.len(),
        "Mirroring request"
    );

    let (primary, secondary) = match mirror(&state.client, &state.primary, &state.secondary, incoming.clone()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(
                method = %incoming.method,
                path = %incoming.path,
                error = %e,
                "Primary upstream failed"
            );
            metrics::record_request(&method, 502, start_time);
            return Err(e.into());
        }
    };

    log_comparison(&state, &incoming, &primary, secondary).await;

    metrics::record_request(&method, primary.status.as_u16(), start_time);
    Ok(primary.into_response())
}

/// Compare and emit the log line on the blocking pool.
///
/// Any failure here, including a panic in the comparator, is logged and
/// swallowed so the primary response is still returned.
async fn log_comparison(
    state: &AppState,
    incoming: &IncomingRequest,
    primary: &UpstreamResponse,
    secondary: Option<UpstreamResponse>,
) {
    let primary = primary.clone();
    let settings = state.comparison.clone();
    let sampler = state.sampler.clone();
    let sink = state.sink.clone();
    let meta = incoming.meta();

    let outcome = tokio::task::spawn_blocking(move || {
        let record = compare(&primary, secondary.as_ref(), &settings, sampler.as_ref());
        let sampled = record.sampled;
        let duration = record.comparison_duration_seconds;
        let line = render(record, &meta);
        metrics::record_comparison(line.level.as_str(), sampled, duration);
        sink.emit(&line)
    })
    .await;

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(path = %incoming.path, error = %e, "Failed to write comparison log");
        }
        Err(e) => {
            tracing::error!(path = %incoming.path, error = %e, "Comparison failed; skipping log line");
        }
    }
}
