//! Inbound notification handling.
//!
//! # Data Flow
//! ```text
//! POST body (JSON)
//!     → notification.rs (deserialize items)
//!     → [optional full-text enrichment]
//!     → payload.rs (title/body/tags per item, rows joined with ";;;")
//!     → serialized RelayPayload handed to the relay
//! ```

pub mod notification;
pub mod payload;

pub use notification::{parse_notification, FeedError, FeedItem, FeedNotification};
pub use payload::{RelayEntry, RelayPayload, ROW_SEPARATOR};
