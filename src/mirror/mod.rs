//! Mirror dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Arc<IncomingRequest>
//!     ├─▶ task: primary   (no timeout)        ─┐
//!     └─▶ task: secondary (optional timeout)  ─┤
//!                                               join
//!     → (primary response, Option<secondary response>)
//! ```
//!
//! # Design Decisions
//! - Exactly two tasks per request, always joined before returning
//! - Secondary failure is observational only and never reaches the caller
//! - Primary failure is the only error the caller sees

pub mod dispatcher;

pub use dispatcher::{mirror, MirrorError, MirrorOutcome};
