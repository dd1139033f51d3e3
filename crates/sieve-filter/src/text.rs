//! Text and regex predicates.
//!
//! Patterns are compiled once, when the predicate is built. An invalid pattern
//! is reported right there as [`FilterError::InvalidPattern`]; evaluation
//! itself never fails. Matching uses search semantics: a match anywhere in the
//! text counts.

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use sieve_core::{Event, lookup_str};

use crate::error::{FilterError, FilterResult};
use crate::predicate::Predicate;
use crate::shape::is_message;

/// Characters that may start a command.
pub const DEFAULT_COMMAND_PREFIXES: &str = "/";

/// Compiles `pattern`, failing fast on invalid input.
pub(crate) fn compile(pattern: &str) -> FilterResult<Regex> {
    let regex = Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    debug!(pattern, "Compiled filter pattern");
    Ok(regex)
}

// ============================================================================
// CommandPredicate
// ============================================================================

/// Matches a message whose trimmed text is exactly the configured command.
///
/// The text must also start with one of the command prefixes (`/` by
/// default). `/start` matches `CommandPredicate::new("/start")`, but
/// `/start now` does not: this is an equality check, not a prefix match.
#[derive(Debug, Clone)]
pub struct CommandPredicate {
    command: String,
    prefixes: String,
}

impl CommandPredicate {
    /// Creates a predicate for `command`, including its prefix (e.g. `/start`).
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            prefixes: DEFAULT_COMMAND_PREFIXES.to_string(),
        }
    }

    /// Replaces the set of prefix characters.
    pub fn with_prefixes(mut self, prefixes: impl Into<String>) -> Self {
        self.prefixes = prefixes.into();
        self
    }

    /// Returns the command this predicate matches.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Predicate for CommandPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        if !is_message(event) {
            return false;
        }
        let Some(text) = event.text() else {
            return false;
        };
        let text = text.trim();
        text.starts_with(|c: char| self.prefixes.contains(c)) && text == self.command
    }
}

// ============================================================================
// RegexPredicate
// ============================================================================

/// Matches a message whose trimmed text contains a match of the pattern.
#[derive(Debug, Clone)]
pub struct RegexPredicate {
    pattern: Regex,
}

impl RegexPredicate {
    /// Compiles `pattern`.
    pub fn new(pattern: &str) -> FilterResult<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
        })
    }
}

impl Predicate for RegexPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        is_message(event)
            && event
                .text()
                .is_some_and(|text| self.pattern.is_match(text.trim()))
    }
}

// ============================================================================
// RegexTextPartsPredicate
// ============================================================================

/// Matches a message where some part's `payload.message.text` matches the
/// pattern.
///
/// Parts are scanned in order; parts without that nested text (files,
/// stickers, ...) are skipped.
#[derive(Debug, Clone)]
pub struct RegexTextPartsPredicate {
    pattern: Regex,
}

impl RegexTextPartsPredicate {
    /// Compiles `pattern`.
    pub fn new(pattern: &str) -> FilterResult<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
        })
    }
}

impl Predicate for RegexTextPartsPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        if !is_message(event) {
            return false;
        }
        event.parts().is_some_and(|parts| {
            parts
                .iter()
                .filter_map(|part| lookup_str(part, "payload.message.text"))
                .any(|text| self.pattern.is_match(text))
        })
    }
}

// ============================================================================
// TagPredicate
// ============================================================================

/// Matches a message whose text is exactly one of the configured tags.
#[derive(Debug, Clone)]
pub struct TagPredicate {
    tags: HashSet<String>,
}

impl TagPredicate {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl Predicate for TagPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        is_message(event) && event.text().is_some_and(|text| self.tags.contains(text))
    }
}
