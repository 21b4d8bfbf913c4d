//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, limits)
//!     → handlers.rs (method check, parse, enrich, transform)
//!     → relay::FanOut (detached delivery)
//!     → 200 OK to the webhook caller
//! ```

pub mod handlers;
pub mod server;

pub use server::{build_fanout, AppState, HttpServer, ServerError};
