//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sieve_filter::DEFAULT_COMMAND_PREFIXES;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SieveConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings shared by the built-in filters.
    #[serde(default)]
    pub filters: FilterSettings,

    /// Named predicate expressions, see [`RuleSpec`].
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSpec>,
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path, used when `output = "file"`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-target level overrides, e.g. `sieve_filter = "trace"`.
    #[serde(default)]
    pub filters: BTreeMap<String, LogLevel>,

    /// Span lifecycle events to log.
    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_location: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Log output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

// =============================================================================
// Filters
// =============================================================================

/// Settings applied when building filters from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Characters that may start a command.
    #[serde(default = "default_command_prefixes")]
    pub command_prefixes: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            command_prefixes: default_command_prefixes(),
        }
    }
}

fn default_command_prefixes() -> String {
    DEFAULT_COMMAND_PREFIXES.to_string()
}

/// A predicate expression.
///
/// ```toml
/// [rules.start]
/// filter = "command"
/// arg = "/start"
///
/// [rules.document]
/// all = [
///     { filter = "file" },
///     { filter = "state", arg = "awaiting_document" },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// Matches when every sub-rule matches.
    All { all: Vec<RuleSpec> },
    /// Matches when at least one sub-rule matches.
    Any { any: Vec<RuleSpec> },
    /// A registry alias with its argument.
    Leaf {
        filter: String,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        arg: Value,
    },
}

impl RuleSpec {
    /// Creates a leaf for an alias without argument.
    pub fn alias(filter: impl Into<String>) -> Self {
        Self::Leaf {
            filter: filter.into(),
            arg: Value::Null,
        }
    }

    /// Creates a leaf for an alias with an argument.
    pub fn with_arg(filter: impl Into<String>, arg: impl Into<Value>) -> Self {
        Self::Leaf {
            filter: filter.into(),
            arg: arg.into(),
        }
    }
}
