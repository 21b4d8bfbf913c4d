//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. Every problem is reported,
//! not just the first one.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no destinations configured (set FORWARDHOOK_SITES or `destinations`)")]
    NoDestinations,

    #[error("invalid destination {url:?}: {reason}")]
    InvalidDestination { url: String, reason: String },

    #[error("retries.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),

    #[error("fulltext is enabled but fulltext.api_key is empty")]
    MissingApiKey,

    #[error("invalid fulltext.api_url {0:?}")]
    InvalidApiUrl(String),

    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Check an http(s) URL, returning the reason it is unusable.
fn check_http_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {:?}", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}

/// Validate a configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.destinations.is_empty() {
        errors.push(ValidationError::NoDestinations);
    }
    for url in &config.destinations {
        if let Err(reason) = check_http_url(url) {
            errors.push(ValidationError::InvalidDestination { url: url.clone(), reason });
        }
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.fulltext.enabled {
        if config.fulltext.api_key.trim().is_empty() {
            errors.push(ValidationError::MissingApiKey);
        }
        if check_http_url(&config.fulltext.api_url).is_err() {
            errors.push(ValidationError::InvalidApiUrl(config.fulltext.api_url.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
