//! Fan-out coordinator.
//!
//! # Responsibilities
//! - Start one dispatcher task per destination for every inbound payload
//! - Give every task its own copy of headers and body
//! - Return without waiting for any task
//!
//! # Design Decisions
//! - Tasks are detached: join handles are dropped on purpose, outcomes only
//!   surface in logs, metrics and the optional report channel
//! - No concurrency cap or queue; one task per destination per payload

use axum::http::HeaderMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::relay::dispatcher::{DispatchReport, Dispatcher};
use crate::relay::envelope::{Destination, OutboundEnvelope};

/// Relays payloads to every configured destination.
#[derive(Clone)]
pub struct FanOut {
    destinations: Arc<[Destination]>,
    dispatcher: Arc<Dispatcher>,
    reports: Option<mpsc::UnboundedSender<DispatchReport>>,
}

impl FanOut {
    pub fn new(destinations: Vec<Destination>, dispatcher: Dispatcher) -> Self {
        Self {
            destinations: destinations.into(),
            dispatcher: Arc::new(dispatcher),
            reports: None,
        }
    }

    /// Also publish every terminal report on `tx`.
    ///
    /// Delivery does not depend on the receiver; a dropped receiver is ignored.
    pub fn with_reports(mut self, tx: mpsc::UnboundedSender<DispatchReport>) -> Self {
        self.reports = Some(tx);
        self
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Spawn one detached dispatcher per destination and return how many were started.
    ///
    /// Must be called from within a tokio runtime.
    pub fn relay(&self, headers: &HeaderMap, body: &[u8]) -> usize {
        for destination in self.destinations.iter() {
            let envelope = OutboundEnvelope::copied_from(destination.clone(), headers, body);
            let dispatcher = self.dispatcher.clone();
            let reports = self.reports.clone();

            tokio::spawn(async move {
                let report = dispatcher.run(envelope).await;
                if let Some(tx) = reports {
                    let _ = tx.send(report);
                }
            });
        }

        tracing::debug!(destinations = self.destinations.len(), bytes = body.len(), "Fan-out started");
        self.destinations.len()
    }
}
