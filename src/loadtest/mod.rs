//! Offline load testing of a running proxy.
//!
//! Not part of the request path; driven by the `load-tester` binary.
//!
//! # Data Flow
//! ```text
//! URL list
//!     → runner.rs (GET each once, bounded concurrency, follow redirects)
//!     → report.rs (mean/variance/std-dev, slow count, status tally)
//! ```

pub mod report;
pub mod runner;

pub use report::{report_stats, LoadReport, ResponseSummary, ResponseTimes};
pub use runner::{LoadTester, DEFAULT_MAX_CONCURRENCY, DEFAULT_TIME_THRESHOLD};
