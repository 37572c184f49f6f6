//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (optional deadline on the whole exchange)
//!     → on expiry: secondary treated as absent by the dispatcher
//! ```
//!
//! # Design Decisions
//! - Only the secondary call is bounded
//! - No retries: a mirrored request is sent exactly once to each side

pub mod timeouts;
