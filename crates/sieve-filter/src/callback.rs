//! Callback query predicates.

use regex::Regex;

use sieve_core::{Event, EventType};

use crate::error::FilterResult;
use crate::predicate::Predicate;
use crate::text::compile;

fn is_callback_query(event: &Event) -> bool {
    event.event_type == EventType::CallbackQuery
}

/// Matches callback queries whose data equals the configured value exactly.
#[derive(Debug, Clone)]
pub struct CallbackDataPredicate {
    value: String,
}

impl CallbackDataPredicate {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Predicate for CallbackDataPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        is_callback_query(event) && event.callback_data() == Some(self.value.as_str())
    }
}

/// Matches callback queries whose data contains a match of the pattern.
#[derive(Debug, Clone)]
pub struct CallbackDataRegexPredicate {
    pattern: Regex,
}

impl CallbackDataRegexPredicate {
    /// Compiles `pattern`.
    pub fn new(pattern: &str) -> FilterResult<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
        })
    }
}

impl Predicate for CallbackDataRegexPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        is_callback_query(event)
            && event
                .callback_data()
                .is_some_and(|data| self.pattern.is_match(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_callback_data_exact() {
        let predicate = CallbackDataPredicate::new("confirm");
        assert!(predicate.evaluate(&Event::callback_query("confirm", json!({}))));
        assert!(!predicate.evaluate(&Event::callback_query("confirm_all", json!({}))));
    }

    #[test]
    fn test_callback_data_from_payload() {
        let predicate = CallbackDataPredicate::new("confirm");
        let event = Event::new(EventType::CallbackQuery, json!({"callbackData": "confirm"}));
        assert!(predicate.evaluate(&event));
    }

    #[test]
    fn test_callback_requires_callback_query() {
        let predicate = CallbackDataPredicate::new("confirm");
        let event = Event::message(json!({"text": "confirm"})).with_callback_data("confirm");
        assert!(!predicate.evaluate(&event));

        let regex = CallbackDataRegexPredicate::new("conf").unwrap();
        assert!(!regex.evaluate(&event));
    }

    #[test]
    fn test_callback_regex_search() {
        let page = CallbackDataRegexPredicate::new(r"page:\d+").unwrap();
        assert!(page.evaluate(&Event::callback_query("nav/page:3", json!({}))));
        assert!(!page.evaluate(&Event::callback_query("nav/page:last", json!({}))));
    }

    #[test]
    fn test_callback_regex_missing_data() {
        let any = CallbackDataRegexPredicate::new(".*").unwrap();
        assert!(!any.evaluate(&Event::new(EventType::CallbackQuery, json!({}))));
    }

    #[test]
    fn test_callback_regex_invalid_pattern() {
        assert!(CallbackDataRegexPredicate::new("(?P<").is_err());
    }
}
