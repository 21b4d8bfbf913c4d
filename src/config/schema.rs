//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Inbound listener settings.
    pub listener: ListenerConfig,

    /// Downstream URLs every payload is relayed to.
    pub destinations: Vec<String>,

    /// Outbound retry policy.
    pub retries: RetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Full-text enrichment settings.
    pub fulltext: FullTextConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            max_body_size: 2 * 1024 * 1024,
        }
    }
}

/// Retry configuration for outbound deliveries.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total delivery attempts per destination, first one included.
    pub max_attempts: u32,

    /// Fixed delay between attempts in seconds.
    pub backoff_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff_secs: 10,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request handling timeout in seconds.
    pub request_secs: u64,

    /// Per-attempt outbound timeout in seconds. Unset keeps the HTTP client default.
    pub delivery_secs: Option<u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            delivery_secs: None,
        }
    }
}

/// Full-text enrichment through a content-extraction API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FullTextConfig {
    pub enabled: bool,

    /// Parser endpoint; the article URL is passed as the `url` query parameter.
    pub api_url: String,

    /// Sent as `x-api-key`.
    pub api_key: String,

    pub timeout_secs: u64,
}

impl Default for FullTextConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: "https://mercury.postlight.com/parser".to_string(),
            api_key: String::new(),
            timeout_secs: 15,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
