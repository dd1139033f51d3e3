//! Configuration validation utilities.

use sieve_filter::FilterRegistry;

use super::error::{ConfigError, ConfigResult};
use super::schema::{FilterSettings, LogOutput, LoggingConfig, RuleSpec, SieveConfig};

/// Validates the entire configuration.
///
/// Only the shape of each rule is checked here: aliases must exist and
/// `all`/`any` lists must not be empty. Arguments are checked when the rule
/// book is built.
pub fn validate_config(config: &SieveConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_filter_settings(&config.filters)?;
    for (name, spec) in &config.rules {
        validate_rule(name, spec)?;
    }
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    for target in logging.filters.keys() {
        if target.is_empty() || target.contains(|c: char| c.is_whitespace() || c == '=') {
            return Err(ConfigError::validation(format!(
                "Invalid log filter target: '{target}'"
            )));
        }
    }

    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "File log output requires logging.file_path",
        ));
    }

    Ok(())
}

fn validate_filter_settings(filters: &FilterSettings) -> ConfigResult<()> {
    if filters.command_prefixes.is_empty() {
        return Err(ConfigError::validation(
            "filters.command_prefixes must not be empty",
        ));
    }
    if filters.command_prefixes.contains(char::is_whitespace) {
        return Err(ConfigError::validation(
            "filters.command_prefixes must not contain whitespace",
        ));
    }
    Ok(())
}

fn validate_rule(name: &str, spec: &RuleSpec) -> ConfigResult<()> {
    match spec {
        RuleSpec::All { all: rules } | RuleSpec::Any { any: rules } => {
            if rules.is_empty() {
                return Err(ConfigError::validation(format!(
                    "Rule '{name}' has an empty combination"
                )));
            }
            rules.iter().try_for_each(|rule| validate_rule(name, rule))
        }
        RuleSpec::Leaf { filter, .. } => {
            if FilterRegistry::global().contains(filter) {
                Ok(())
            } else {
                Err(ConfigError::validation(format!(
                    "Rule '{name}' uses unknown filter '{filter}'"
                )))
            }
        }
    }
}
