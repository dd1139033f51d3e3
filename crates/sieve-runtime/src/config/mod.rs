//! Configuration for sieve applications.
//!
//! Settings are layered with figment (defaults, files, `SIEVE_*` variables)
//! and cover logging, filter defaults and declarative rules.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    FilterSettings, LogFormat, LogLevel, LogOutput, LoggingConfig, RuleSpec, SieveConfig,
    SpanEventConfig,
};
pub use validation::validate_config;
