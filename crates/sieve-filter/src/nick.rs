//! Nick-attribution predicate.
//!
//! Forwarded and quoted messages carry their original author in
//! `payload.message.from.nick` of each part. [`FromNickPredicate`] checks
//! those authors against a configured nick.

use serde_json::Value;

use sieve_core::{Event, lookup};

use crate::predicate::Predicate;
use crate::shape::is_message;

/// How the nicks found in a message's parts are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NickMatch {
    /// At least one part is from the nick.
    #[default]
    Any,
    /// Every part that names an author is from the nick.
    ///
    /// Parts without an author are left out entirely, so a message where no
    /// part names an author matches vacuously. Combine with a positive check
    /// when that pass-through is not wanted.
    All,
}

/// Matches a message whose parts were written by the configured nick.
#[derive(Debug, Clone)]
pub struct FromNickPredicate {
    nick: String,
    mode: NickMatch,
}

impl FromNickPredicate {
    /// Creates a predicate in [`NickMatch::Any`] mode.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            mode: NickMatch::default(),
        }
    }

    /// Sets the mode used by [`Predicate::evaluate`].
    pub fn with_mode(mut self, mode: NickMatch) -> Self {
        self.mode = mode;
        self
    }

    /// Evaluates the predicate with an explicit mode.
    pub fn matches(&self, event: &Event, mode: NickMatch) -> bool {
        if !is_message(event) {
            return false;
        }
        let mut authored = event
            .parts()
            .unwrap_or_default()
            .iter()
            .filter_map(|part| lookup(part, "payload.message.from.nick"))
            .map(|nick| self.is_nick(nick));

        match mode {
            NickMatch::Any => authored.any(|same| same),
            NickMatch::All => authored.all(|same| same),
        }
    }

    fn is_nick(&self, nick: &Value) -> bool {
        nick.as_str() == Some(self.nick.as_str())
    }
}

impl Predicate for FromNickPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        self.matches(event, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sieve_core::EventType;

    fn from(nick: Value) -> Value {
        json!({"type": "forward", "payload": {"message": {"from": {"nick": nick}, "text": "hi"}}})
    }

    fn with_parts(parts: Value) -> Event {
        Event::message(json!({ "parts": parts }))
    }

    #[test]
    fn test_any_versus_all() {
        let predicate = FromNickPredicate::new("a");
        let event = with_parts(json!([from(json!("a")), from(json!("b"))]));
        assert!(predicate.matches(&event, NickMatch::Any));
        assert!(!predicate.matches(&event, NickMatch::All));
        assert!(predicate.evaluate(&event));
        assert!(!predicate.clone().with_mode(NickMatch::All).evaluate(&event));
    }

    #[test]
    fn test_all_skips_parts_without_nick() {
        let predicate = FromNickPredicate::new("a").with_mode(NickMatch::All);
        let event = with_parts(json!([
            from(json!("a")),
            {"type": "file", "payload": {"fileId": "f1"}},
            from(json!("a"))
        ]));
        assert!(predicate.evaluate(&event));
    }

    #[test]
    fn test_non_string_nick_counts_as_other_author() {
        let predicate = FromNickPredicate::new("a");
        let event = with_parts(json!([from(json!("a")), from(json!(17))]));
        assert!(predicate.matches(&event, NickMatch::Any));
        assert!(!predicate.matches(&event, NickMatch::All));
    }

    #[test]
    fn test_no_nicks_is_vacuously_true_in_all_mode() {
        let predicate = FromNickPredicate::new("a");
        for event in [
            with_parts(json!([])),
            with_parts(json!([{"type": "file"}])),
            Event::message(json!({})),
        ] {
            assert!(!predicate.matches(&event, NickMatch::Any));
            assert!(predicate.matches(&event, NickMatch::All));
        }
    }

    #[test]
    fn test_requires_message() {
        let predicate = FromNickPredicate::new("a");
        let event = Event::new(EventType::EditedMessage, json!({"parts": [from(json!("a"))]}));
        assert!(!predicate.matches(&event, NickMatch::Any));
        assert!(!predicate.matches(&event, NickMatch::All));
    }
}
