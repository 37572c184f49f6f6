//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Both upstream URLs present, absolute and plain HTTP
//! - Validate value ranges (percentages, timeouts, limits)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MirrorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::MirrorConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} upstream URL is required")]
    MissingUpstream(&'static str),

    #[error("{role} upstream URL '{url}' is invalid: {reason}")]
    InvalidUpstream {
        role: &'static str,
        url: String,
        reason: String,
    },

    #[error("sample_percent must be between 0 and 100, got {0}")]
    SamplePercentOutOfRange(u8),

    #[error("secondary_timeout_secs must be a positive number, got {0}")]
    InvalidTimeout(f64),

    #[error("tolerance_secs must not be negative, got {0}")]
    NegativeTolerance(i64),

    #[error("max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a loaded configuration.
pub fn validate_config(config: &MirrorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_upstream("primary", &config.upstreams.primary, &mut errors);
    check_upstream("secondary", &config.upstreams.secondary, &mut errors);

    if config.comparison.sample_percent > 100 {
        errors.push(ValidationError::SamplePercentOutOfRange(
            config.comparison.sample_percent,
        ));
    }

    if let Some(secs) = config.upstreams.secondary_timeout_secs {
        if !secs.is_finite() || secs <= 0.0 {
            errors.push(ValidationError::InvalidTimeout(secs));
        }
    }

    if config.comparison.tolerance_secs < 0 {
        errors.push(ValidationError::NegativeTolerance(
            config.comparison.tolerance_secs,
        ));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream(role: &'static str, raw: &str, errors: &mut Vec<ValidationError>) {
    if raw.trim().is_empty() {
        errors.push(ValidationError::MissingUpstream(role));
        return;
    }

    let invalid = |reason: String| ValidationError::InvalidUpstream {
        role,
        url: raw.to_string(),
        reason,
    };

    match Url::parse(raw) {
        Ok(url) if url.scheme() != "http" => {
            errors.push(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(url) if url.host_str().is_none() => {
            errors.push(invalid("missing host".to_string()));
        }
        Ok(_) => {}
        Err(e) => errors.push(invalid(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> MirrorConfig {
        let mut config = MirrorConfig::default();
        config.upstreams.primary = "http://127.0.0.1:3001".into();
        config.upstreams.secondary = "http://127.0.0.1:3002".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_upstreams_reported_together() {
        let config = MirrorConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingUpstream("primary")));
        assert!(errors.contains(&ValidationError::MissingUpstream("secondary")));
    }

    #[test]
    fn test_rejects_https_and_garbage() {
        let mut config = valid_config();
        config.upstreams.primary = "https://example.com".into();
        config.upstreams.secondary = "not a url".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            ValidationError::InvalidUpstream { role: "primary", .. }
        ));
    }

    #[test]
    fn test_range_checks() {
        let mut config = valid_config();
        config.comparison.sample_percent = 101;
        config.upstreams.secondary_timeout_secs = Some(0.0);
        config.comparison.tolerance_secs = -1;
        config.limits.max_body_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
