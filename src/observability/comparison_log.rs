//! Comparison log lines.
//!
//! # Responsibilities
//! - Classify a comparison into `info` or `warn`
//! - Render one self-contained `LogRecord` per request
//! - Write records through a `LogSink` (stdout in production)
//!
//! # Design Decisions
//! - Comparison lines go to stdout as bare JSON, one per line; operational
//!   tracing output goes to stderr so the two never interleave
//! - Rendering never fails; absent fields become placeholders

use std::io::Write;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::comparison::record::{ComparisonRecord, ResponseStats};
use crate::http::request::RequestMeta;

const SEE_OTHER: u16 = 303;

/// Alerting level of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
        }
    }
}

/// One comparison log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: Severity,
    pub method: String,
    pub path: String,
    pub query_string: String,
    pub stats: ComparisonRecord,
}

/// `info` only when no key differences were reported and the responses agree
/// on status and body size, or are both 303s to the same path.
pub fn classify(record: &ComparisonRecord) -> Severity {
    let keys_clean = record
        .different_keys
        .as_ref()
        .map_or(true, |keys| keys.is_clean());

    let responses_match = record
        .secondary
        .as_ref()
        .is_some_and(|secondary| responses_agree(&record.primary, secondary));

    if keys_clean && responses_match {
        Severity::Info
    } else {
        Severity::Warn
    }
}

fn responses_agree(primary: &ResponseStats, secondary: &ResponseStats) -> bool {
    if primary.status == SEE_OTHER && secondary.status == SEE_OTHER {
        // Redirect bodies embed the absolute target, so sizes differ with the host.
        return location_path(primary.location.as_deref())
            == location_path(secondary.location.as_deref());
    }
    primary.status == secondary.status && primary.body_size == secondary.body_size
}

/// A `Location` value with any scheme and host stripped.
fn location_path(location: Option<&str>) -> Option<String> {
    let location = location?;
    match Url::parse(location) {
        Ok(url) => {
            let mut path = url.path().to_string();
            if let Some(query) = url.query() {
                path.push('?');
                path.push_str(query);
            }
            Some(path)
        }
        Err(_) => Some(location.to_string()),
    }
}

/// Build the log line for a comparison.
pub fn render(record: ComparisonRecord, request: &RequestMeta) -> LogRecord {
    LogRecord {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        level: classify(&record),
        method: request.method.clone(),
        path: request.path.clone(),
        query_string: request.query_string.clone(),
        stats: record,
    }
}

/// Errors writing a log line.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write log record: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for comparison log lines.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Writes each record as one JSON line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(&line)?;
        handle.flush()?;
        Ok(())
    }
}

/// Keeps rendered records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Value>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records emitted so far, as JSON.
    pub fn records(&self) -> Vec<Value> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        let value = serde_json::to_value(record)?;
        match self.records.lock() {
            Ok(mut records) => records.push(value),
            Err(poisoned) => poisoned.into_inner().push(value),
        }
        Ok(())
    }
}
