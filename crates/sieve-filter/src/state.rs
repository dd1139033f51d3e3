//! Conversation-state predicates.
//!
//! Both predicates read a shared [`StateSource`](sieve_core::StateSource) owned by the dispatcher.
//! They never write to it and never assume the chat is known: a missing chat,
//! a missing `state` field or an unexpected shape all mean "no match".
//!
//! The two predicates read the chat id from different places:
//!
//! | predicate                 | chat id path              |
//! |---------------------------|---------------------------|
//! | [`StateEqualsPredicate`]  | `data.chat.chatId`        |
//! | [`StateContainsPredicate`]| `data.message.chat.chatId`|
//!
//! The second targets envelopes that wrap the message in a `message` object.

use serde_json::Value;
use tracing::trace;

use sieve_core::{BoxedStateSource, Event, chat_key, lookup};

use crate::predicate::Predicate;
use crate::shape::is_message;

/// Matches a message whose chat is in exactly the expected state.
///
/// The chat id is read from `data.chat.chatId`.
#[derive(Clone)]
pub struct StateEqualsPredicate {
    expected: Value,
    states: BoxedStateSource,
}

impl StateEqualsPredicate {
    /// Creates a predicate comparing the chat's `state` with `expected`.
    pub fn new(expected: impl Into<Value>, states: BoxedStateSource) -> Self {
        Self {
            expected: expected.into(),
            states,
        }
    }
}

impl Predicate for StateEqualsPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        if !is_message(event) {
            return false;
        }
        // `None` is the "no state" sentinel and never equals an expected state.
        let current = event.chat_id().and_then(|chat| self.states.state(&chat));
        if current.is_none() {
            trace!(expected = %self.expected, "Chat has no conversation state");
        }
        current.as_ref() == Some(&self.expected)
    }
}

impl std::fmt::Debug for StateEqualsPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateEqualsPredicate")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// Matches a message whose chat has the expected key among its active
/// sub-states.
///
/// The chat's `state` is treated as a collection: an array matches when one
/// of its string elements equals the key, an object when it has the key.
/// Anything else, or no state at all, counts as the empty set.
///
/// The chat id is read from `data.message.chat.chatId`.
#[derive(Clone)]
pub struct StateContainsPredicate {
    key: String,
    states: BoxedStateSource,
}

impl StateContainsPredicate {
    pub fn new(key: impl Into<String>, states: BoxedStateSource) -> Self {
        Self {
            key: key.into(),
            states,
        }
    }

    fn contains(&self, state: &Value) -> bool {
        match state {
            Value::Array(items) => items
                .iter()
                .any(|item| item.as_str() == Some(self.key.as_str())),
            Value::Object(map) => map.contains_key(&self.key),
            _ => false,
        }
    }
}

impl Predicate for StateContainsPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        if !is_message(event) {
            return false;
        }
        lookup(&event.data, "message.chat.chatId")
            .and_then(chat_key)
            .and_then(|chat| self.states.state(&chat))
            .is_some_and(|state| self.contains(&state))
    }
}

impl std::fmt::Debug for StateContainsPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateContainsPredicate")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
