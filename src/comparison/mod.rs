//! Response comparison subsystem.
//!
//! # Data Flow
//! ```text
//! (primary response, Option<secondary response>)
//!     → stats.rs (status, size, timing, redirect location)
//!     → sampling.rs (draw in [0, 100) vs sample_percent)
//!     → body_diff.rs + key_diff.rs (sampled only)
//!     → record.rs (ComparisonRecord)
//! ```
//!
//! # Design Decisions
//! - Comparison is a pure function of its inputs plus the sampler
//! - Expected outcomes (non-JSON bodies, missing secondary) are enum variants
//! - The sampler is injected so tests can pin the draw

pub mod body_diff;
pub mod comparator;
pub mod key_diff;
pub mod record;
pub mod sampling;
pub mod stats;

pub use comparator::compare;
pub use record::{ComparisonRecord, DiffResult, FirstDifference, KeyDifferences, ResponseStats};
pub use sampling::{FixedSampler, RandomSampler, Sampler};
