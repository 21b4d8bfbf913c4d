//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router (hook endpoint, health check)
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Build the relay (transport, dispatcher, fan-out) from configuration
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::fulltext::{enrichment_budget, ContentExtractor, ExtractError};
use crate::http::handlers::{handle_hook, health_check};
use crate::lifecycle::shutdown;
use crate::relay::{Destination, Dispatcher, FanOut, HttpTransport, RetryPolicy};

/// Error type for server construction and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("full-text client: {0}")]
    FullText(#[from] ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fanout: FanOut,
    pub extractor: Option<Arc<ContentExtractor>>,
    /// Upper bound on full-text enrichment, kept below the request timeout.
    pub enrichment_budget: Duration,
}

/// Inbound HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server relaying over HTTP to the configured destinations.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let fanout = build_fanout(&config);
        Self::with_fanout(config, fanout)
    }

    /// Create a server around an existing fan-out coordinator.
    pub fn with_fanout(config: RelayConfig, fanout: FanOut) -> Result<Self, ServerError> {
        let extractor = if config.fulltext.enabled {
            Some(Arc::new(ContentExtractor::new(&config.fulltext)?))
        } else {
            None
        };

        let state = AppState {
            fanout,
            extractor,
            enrichment_budget: enrichment_budget(Duration::from_secs(config.timeouts.request_secs)),
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .route("/health-check", any(health_check))
            .route("/", any(handle_hook))
            .fallback(handle_hook)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.listener.max_body_size))
            .layer(middleware)
    }

    /// Serve on `listener` until `shutdown_rx` fires.
    pub async fn run(self, listener: TcpListener, shutdown_rx: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            destinations = self.config.destinations.len(),
            fulltext = self.config.fulltext.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Build the production relay for `config`.
pub fn build_fanout(config: &RelayConfig) -> FanOut {
    let transport = HttpTransport::new(config.timeouts.delivery_secs.map(Duration::from_secs));
    let dispatcher = Dispatcher::new(Arc::new(transport), RetryPolicy::from(&config.retries));
    let destinations = config.destinations.iter().map(Destination::new).collect::<Vec<_>>();
    FanOut::new(destinations, dispatcher)
}
