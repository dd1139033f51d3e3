//! Runtime error types.

use thiserror::Error;

use sieve_filter::FilterError;

use crate::config::ConfigError;

/// Errors raised while turning configuration into filters.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Loading or validating the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A configured rule could not be built.
    #[error("Failed to build rule '{rule}': {source}")]
    Rule {
        rule: String,
        #[source]
        source: FilterError,
    },
}

impl RuntimeError {
    pub fn rule(rule: impl Into<String>, source: FilterError) -> Self {
        Self::Rule {
            rule: rule.into(),
            source,
        }
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
