//! Traffic-mirroring comparison proxy library.

pub mod comparison;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod loadtest;
pub mod mirror;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::schema::MirrorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
