//! Retrying dispatcher.
//!
//! # States
//! - Attempting: one delivery attempt in flight
//! - Backoff: waiting the fixed interval before the next attempt
//! - Succeeded: the destination answered (terminal)
//! - Exhausted: the attempt ceiling was reached (terminal)
//!
//! # State Transitions
//! ```text
//! Attempting → Succeeded: any response
//! Attempting → Backoff:   no response, attempts remain
//! Attempting → Exhausted: no response, ceiling reached
//! Backoff → Attempting:   after backoff_interval
//! ```
//!
//! # Design Decisions
//! - Fixed interval, no jitter, no growth
//! - Failures never leave the dispatcher; the caller gets a report, not an error

use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::relay::attempt::{AttemptOutcome, Transport};
use crate::relay::envelope::{Destination, OutboundEnvelope};

/// Retry ceiling and backoff for a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Sleep between consecutive attempts.
    pub backoff_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff_interval: Duration::from_secs(10),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff_interval: Duration::from_secs(config.backoff_secs),
        }
    }
}

/// Dispatcher state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchState {
    Attempting,
    Backoff,
    Succeeded { status: StatusCode },
    Exhausted { last_error: String },
}

impl DispatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DispatchState::Succeeded { .. } | DispatchState::Exhausted { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            DispatchState::Attempting => "attempting",
            DispatchState::Backoff => "backoff",
            DispatchState::Succeeded { .. } => "succeeded",
            DispatchState::Exhausted { .. } => "exhausted",
        }
    }
}

/// Final outcome of one dispatcher run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub destination: Destination,
    /// Number of delivery attempts performed.
    pub attempts: u32,
    /// Always a terminal state.
    pub state: DispatchState,
}

/// Drives a transport through the retry loop for one envelope at a time.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Deliver `envelope` until it is answered or the ceiling is reached.
    ///
    /// Runs to a terminal state; there is no cancellation and no overall deadline.
    pub async fn run(&self, envelope: OutboundEnvelope) -> DispatchReport {
        let destination = envelope.destination().clone();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt: u32 = 1;
        let mut state = DispatchState::Attempting;

        loop {
            state = match state {
                DispatchState::Attempting => {
                    tracing::info!(destination = %destination, attempt, "Attempting destination, try={}", attempt);

                    let outcome = self.transport.deliver(&envelope).await;
                    metrics::record_attempt(destination.as_str(), outcome.label());

                    match outcome {
                        AttemptOutcome::Success { status } => {
                            tracing::info!(destination = %destination, attempt, status = status.as_u16(), "Success, status={}", status.as_u16());
                            DispatchState::Succeeded { status }
                        }
                        AttemptOutcome::TransientFailure { error } if attempt >= max_attempts => {
                            tracing::error!(destination = %destination, attempt, error = %error, "Max retries reached");
                            DispatchState::Exhausted { last_error: error }
                        }
                        AttemptOutcome::TransientFailure { error } => {
                            tracing::warn!(
                                destination = %destination,
                                attempt,
                                delay = ?self.policy.backoff_interval,
                                error = %error,
                                "Delivery failed, backing off"
                            );
                            DispatchState::Backoff
                        }
                    }
                }
                DispatchState::Backoff => {
                    tokio::time::sleep(self.policy.backoff_interval).await;
                    attempt += 1;
                    DispatchState::Attempting
                }
                terminal => {
                    metrics::record_dispatch(destination.as_str(), terminal.label());
                    return DispatchReport {
                        destination,
                        attempts: attempt,
                        state: terminal,
                    };
                }
            };
        }
    }
}
