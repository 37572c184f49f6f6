//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MirrorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, overlay the process
/// environment, then validate.
pub fn load_config(path: Option<&Path>) -> Result<MirrorConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => MirrorConfig::default(),
    };

    let config = apply_env(config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so the overlay can be exercised without
/// touching process state.
pub fn apply_env<F>(mut config: MirrorConfig, lookup: F) -> Result<MirrorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(url) = get("PRIMARY_UPSTREAM") {
        config.upstreams.primary = url;
    }
    if let Some(url) = get("SECONDARY_UPSTREAM") {
        config.upstreams.secondary = url;
    }
    if let Some(raw) = get("SECONDARY_TIMEOUT_SECONDS") {
        config.upstreams.secondary_timeout_secs = Some(parse_var("SECONDARY_TIMEOUT_SECONDS", &raw)?);
    }
    if let Some(raw) = get("COMPARISON_SAMPLE_PERCENT") {
        config.comparison.sample_percent = parse_var("COMPARISON_SAMPLE_PERCENT", &raw)?;
    }
    if let Some(raw) = get("COMPARISON_TOLERANCE_SECONDS") {
        config.comparison.tolerance_secs = parse_var("COMPARISON_TOLERANCE_SECONDS", &raw)?;
    }
    if let Some(addr) = get("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(raw) = get("LOG_FORMAT") {
        config.observability.log_format = parse_var("LOG_FORMAT", &raw)?;
    }
    if let Some(addr) = get("METRICS_ADDRESS") {
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = addr;
    }

    Ok(config)
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        reason: e.to_string(),
    })
}
