//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, health endpoints, mirror handler)
//!     → request.rs (materialize body, capture transport headers)
//!     → [mirror dispatcher fans out to both upstreams]
//!     → headers.rs (transport env → outbound headers, per upstream call)
//!     → [comparison + log line]
//!     → primary response to client (response.rs for proxy-made responses)
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{IncomingRequest, RequestMeta};
pub use response::ProxyError;
pub use server::{AppState, HttpServer};
