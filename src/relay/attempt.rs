//! Single delivery attempt.
//!
//! # Responsibilities
//! - Issue exactly one POST for an envelope
//! - Force `Content-Type: application/json`
//! - Classify the result as a response (any status) or a transient failure
//!
//! # Design Decisions
//! - Any HTTP response counts as success; the status is reported, not judged
//! - A fresh client per attempt, so no connection is reused across retries
//! - Connection-level headers are recomputed by the transport

use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use std::time::Duration;

use crate::relay::envelope::OutboundEnvelope;

/// Upper bound on draining a response once its status is known.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Inbound headers that describe the inbound connection, not the payload.
const CONNECTION_HEADERS: [header::HeaderName; 4] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The destination answered. The status is never inspected for retry purposes.
    Success { status: StatusCode },
    /// No response was obtained.
    TransientFailure { error: String },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success { .. })
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            AttemptOutcome::Success { .. } => "success",
            AttemptOutcome::TransientFailure { .. } => "transient_failure",
        }
    }
}

/// Something that can perform a single delivery attempt.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn deliver(&self, envelope: &OutboundEnvelope) -> AttemptOutcome;
}

/// Outbound headers for an envelope: inbound copy minus connection headers,
/// with the JSON content type forced.
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();
    for name in CONNECTION_HEADERS.iter() {
        headers.remove(name);
    }
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// HTTP transport backed by reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// `timeout` bounds a single attempt; `None` keeps the client default.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn deliver(&self, envelope: &OutboundEnvelope) -> AttemptOutcome {
        let destination = envelope.destination();

        let client = match self.build_client() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(destination = %destination, error = %e, "Failed to build HTTP client");
                return AttemptOutcome::TransientFailure { error: e.to_string() };
            }
        };

        let request = client
            .post(destination.as_str())
            .headers(outbound_headers(envelope.headers()))
            .body(envelope.body().clone());

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                // Drain so the connection closes cleanly; the content is irrelevant.
                match tokio::time::timeout(DRAIN_TIMEOUT, response.bytes()).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => {
                        tracing::debug!(destination = %destination, error = %e, "Failed to drain response body")
                    }
                    Err(_) => {
                        tracing::debug!(destination = %destination, "Response body stalled, dropping connection")
                    }
                }
                AttemptOutcome::Success { status }
            }
            Err(e) if e.is_builder() => {
                tracing::error!(destination = %destination, error = %e, "Malformed outbound request");
                AttemptOutcome::TransientFailure { error: e.to_string() }
            }
            Err(e) => {
                tracing::warn!(destination = %destination, error = %e, "Delivery attempt failed");
                AttemptOutcome::TransientFailure { error: e.to_string() }
            }
        }
    }
}
