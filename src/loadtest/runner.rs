//! Bounded-concurrency batch requester.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use futures_util::stream::{self, StreamExt};
use reqwest::header::HeaderMap;

use crate::loadtest::report::{report_stats, LoadReport, ResponseSummary};

/// Default number of requests in flight.
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;

/// Responses at or above this time count as slow.
pub const DEFAULT_TIME_THRESHOLD: Duration = Duration::from_secs(4);

/// GETs a list of URLs with bounded concurrency and reports on the results.
#[derive(Clone)]
pub struct LoadTester {
    client: reqwest::Client,
    max_concurrency: usize,
    time_threshold: Duration,
}

impl Default for LoadTester {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}

impl LoadTester {
    pub fn new(max_concurrency: usize) -> Self {
        Self::with_client(reqwest::Client::new(), max_concurrency)
    }

    /// Use a preconfigured client. reqwest follows redirects by default.
    pub fn with_client(client: reqwest::Client, max_concurrency: usize) -> Self {
        Self {
            client,
            max_concurrency: max_concurrency.max(1),
            time_threshold: DEFAULT_TIME_THRESHOLD,
        }
    }

    pub fn with_time_threshold(mut self, threshold: Duration) -> Self {
        self.time_threshold = threshold;
        self
    }

    /// GET each URL once and summarize.
    pub async fn run(&self, urls: Vec<String>, headers: HeaderMap) -> LoadReport {
        let responses = self.get_responses(urls, headers).await;
        report_stats(&responses, self.time_threshold)
    }

    /// GET each URL once, at most `max_concurrency` at a time.
    pub async fn get_responses(&self, urls: Vec<String>, headers: HeaderMap) -> Vec<ResponseSummary> {
        let completed = AtomicUsize::new(0);
        let total = urls.len();

        stream::iter(urls)
            .map(|url| {
                let headers = headers.clone();
                let completed = &completed;
                async move {
                    let summary = self.get(url, headers).await;
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    tracing::debug!(done, total, url = %summary.url, status = ?summary.status, "Request complete");
                    summary
                }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await
    }

    async fn get(&self, url: String, headers: HeaderMap) -> ResponseSummary {
        let start = Instant::now();
        let result = self.client.get(&url).headers(headers).send().await;

        let status = match result {
            Ok(response) => {
                let status = response.status().as_u16();
                // Timing covers the full body, not just the headers.
                if let Err(e) = response.bytes().await {
                    tracing::warn!(url = %url, error = %e, "Failed to read response body");
                }
                Some(status)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Request failed");
                None
            }
        };

        ResponseSummary {
            url,
            time_secs: start.elapsed().as_secs_f64(),
            status,
        }
    }
}
