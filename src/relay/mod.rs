//! Request relay subsystem.
//!
//! # Data Flow
//! ```text
//! transformed payload + inbound headers
//!     → fanout.rs (one detached task per destination, own copy each)
//!     → dispatcher.rs (retry loop: attempt, fixed backoff, ceiling)
//!     → attempt.rs (single POST, Content-Type forced)
//!     → destination
//! ```
//!
//! # Design Decisions
//! - Fire-and-forget: nothing flows back to the request handler
//! - Any HTTP response ends the retry loop; only missing responses are retried
//! - Isolation comes from per-destination copies, not locks

pub mod attempt;
pub mod dispatcher;
pub mod envelope;
pub mod fanout;

pub use attempt::{AttemptOutcome, HttpTransport, Transport};
pub use dispatcher::{DispatchReport, DispatchState, Dispatcher, RetryPolicy};
pub use envelope::{Destination, OutboundEnvelope};
pub use fanout::FanOut;
