//! Sieve Runtime - configuration, logging and rule books.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `SieveConfig`)
//! - Logging setup on top of `tracing-subscriber` (`LoggingBuilder`)
//! - Rule books: named predicates declared in configuration (`RuleBook`)
//!
//! ```rust,ignore
//! use sieve_runtime::{RuleBook, config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//! let rules = RuleBook::from_config(&config, Some(states))?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod rules;

pub use config::{ConfigError, ConfigLoader, ConfigResult, SieveConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents, init_from_config};
pub use rules::RuleBook;

// Re-export tracing for use by applications
pub use tracing;
pub use tracing_subscriber;

/// Logging macros.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
