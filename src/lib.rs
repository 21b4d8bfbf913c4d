//! Feed webhook relay library.
//!
//! Receives feed-reader "items" notifications, flattens them into a
//! `value1`/`value2`/`value3` payload and relays it to every configured
//! destination with bounded, fixed-interval retries.

pub mod config;
pub mod feed;
pub mod fulltext;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::FanOut;
