//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (FORWARDHOOK_* environment overrides)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; destinations live for the process lifetime
//! - All fields have defaults so an environment-only setup works
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_config, ConfigError};
pub use schema::{
    FullTextConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, RetryConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
