//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the mirror proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MirrorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Primary and secondary upstream definitions.
    pub upstreams: UpstreamsConfig,

    /// Sampling and tolerance settings for response comparison.
    pub comparison: ComparisonConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream configuration.
///
/// Both URLs are required; an empty string is reported by validation.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Base URL of the authoritative upstream (e.g., "http://127.0.0.1:3000").
    pub primary: String,

    /// Base URL of the upstream under validation.
    pub secondary: String,

    /// Timeout for the secondary call in seconds. `None` waits forever.
    pub secondary_timeout_secs: Option<f64>,
}

impl UpstreamsConfig {
    /// Secondary timeout as a `Duration`, if configured and representable.
    pub fn secondary_timeout(&self) -> Option<Duration> {
        self.secondary_timeout_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

/// Response comparison settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Percentage (0-100) of requests that get a full body diff.
    pub sample_percent: u8,

    /// Maximum skew in whole seconds tolerated for timestamp and delay keys.
    pub tolerance_secs: i64,

    /// Top-level JSON keys holding write timestamps (RFC 3339).
    pub timestamp_keys: Vec<String>,

    /// Top-level JSON keys holding computed delays in whole seconds.
    pub delay_keys: Vec<String>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            sample_percent: 0,
            tolerance_secs: 2,
            timestamp_keys: vec!["updated_at".to_string()],
            delay_keys: vec!["delay_in_seconds".to_string()],
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum incoming body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Output format for operational logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Operational log format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: MirrorConfig = toml::from_str(
            r#"
            [upstreams]
            primary = "http://127.0.0.1:3001"
            secondary = "http://127.0.0.1:3002"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.comparison.sample_percent, 0);
        assert_eq!(config.comparison.tolerance_secs, 2);
        assert_eq!(config.comparison.timestamp_keys, vec!["updated_at"]);
        assert!(config.upstreams.secondary_timeout().is_none());
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_secondary_timeout_conversion() {
        let upstreams = UpstreamsConfig {
            secondary_timeout_secs: Some(0.25),
            ..Default::default()
        };
        assert_eq!(upstreams.secondary_timeout(), Some(Duration::from_millis(250)));

        let negative = UpstreamsConfig {
            secondary_timeout_secs: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.secondary_timeout().is_none());
    }
}
