//! Error types for the filter layer.
//!
//! Evaluating a predicate never fails: malformed payloads simply do not match.
//! The errors here are raised while predicates are being *defined*, and point
//! at a bug in bot definition code or configuration.

use thiserror::Error;

/// Returned by a tower filter when an event does **not** match its predicate.
///
/// Dispatchers should recognise this error and silently skip the service.
/// All other errors are genuine failures.
#[derive(Debug, Clone, Error)]
#[error("event skipped by filter")]
pub struct EventSkipped;

/// Errors raised while constructing predicates.
#[derive(Debug, Clone, Error)]
pub enum FilterError {
    /// A regular expression failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The compiler error.
        #[source]
        source: regex::Error,
    },

    /// No filter is registered under this alias.
    #[error("unknown filter alias: {0}")]
    UnknownAlias(String),

    /// The argument given to an alias has the wrong shape.
    #[error("filter '{alias}' expects {expected}")]
    InvalidArgument {
        /// The alias being built.
        alias: String,
        /// Description of the accepted argument.
        expected: &'static str,
    },

    /// A state-based alias was built without a conversation state source.
    #[error("filter '{0}' needs a conversation state source")]
    MissingStateSource(String),

    /// An `all`/`any` combination was given no operands.
    #[error("'{0}' needs at least one operand")]
    EmptyCombination(&'static str),
}

impl FilterError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(alias: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidArgument {
            alias: alias.into(),
            expected,
        }
    }
}

/// Result type for predicate construction.
pub type FilterResult<T> = Result<T, FilterError>;
