//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Per request:
//!     → comparison_log.rs (severity + one JSON line on stdout)
//!     → metrics.rs (counters, histograms)
//!
//! All subsystems:
//!     → logging.rs (tracing events on stderr)
//! ```
//!
//! # Design Decisions
//! - Comparison lines are data, not diagnostics: fixed schema, own stream
//! - Metrics are cheap (atomic increments)
//! - Failures here never affect the response returned to the client

pub mod comparison_log;
pub mod logging;
pub mod metrics;

pub use comparison_log::{classify, render, LogRecord, LogSink, MemorySink, Severity, SinkError, StdoutSink};
