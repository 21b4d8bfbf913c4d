//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http, relay and fulltext produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Delivery outcomes are only observable here; nothing is reported to the webhook caller
//! - Request ID (`x-request-id`) is attached to inbound request spans

pub mod logging;
pub mod metrics;
