//! Conversation state consumed by state-based predicates.
//!
//! The state store is owned by whoever drives the dialogue (usually the
//! dispatcher). Predicates only see it through the read-only [`StateSource`]
//! trait and never assume a chat is present.
//!
//! A state record is a JSON object whose `state` field describes where the
//! dialogue stands. Its shape depends on the consumer: a scalar state name for
//! equality checks, or a collection of active sub-states for membership checks.
//!
//! ```rust
//! use serde_json::json;
//! use sieve_core::{ConversationStates, StateSource};
//!
//! let states = ConversationStates::new();
//! states.set_state("chat1", json!("awaiting_email"));
//!
//! assert_eq!(states.state("chat1"), Some(json!("awaiting_email")));
//! assert_eq!(states.state("chat2"), None);
//! ```

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::trace;

/// Read-only access to per-chat state records.
///
/// Implementations return a snapshot: the record may change right after it
/// was read, and no transactional guarantee is given.
pub trait StateSource: Send + Sync {
    /// Returns the state record of `chat_id`, if the chat has one.
    fn record(&self, chat_id: &str) -> Option<Value>;

    /// Returns the `state` field of the record of `chat_id`.
    fn state(&self, chat_id: &str) -> Option<Value> {
        match self.record(chat_id)? {
            Value::Object(mut record) => record.remove("state"),
            _ => None,
        }
    }
}

/// A shared, type-erased state source.
pub type BoxedStateSource = Arc<dyn StateSource>;

impl StateSource for HashMap<String, Value> {
    fn record(&self, chat_id: &str) -> Option<Value> {
        self.get(chat_id).cloned()
    }
}

impl<S: StateSource + ?Sized> StateSource for Arc<S> {
    fn record(&self, chat_id: &str) -> Option<Value> {
        (**self).record(chat_id)
    }
}

/// A thread-safe in-memory state store.
///
/// Writers (the dispatcher) call [`set_state`](Self::set_state) and friends;
/// readers take a short read lock and get a cloned record.
#[derive(Debug, Default)]
pub struct ConversationStates {
    records: RwLock<HashMap<String, Value>>,
}

impl ConversationStates {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store wrapped in an `Arc`, ready to be shared with
    /// predicates.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Replaces the whole record of `chat_id`.
    pub fn set_record(&self, chat_id: impl Display, record: Value) {
        self.records.write().insert(chat_id.to_string(), record);
    }

    /// Sets the `state` field of `chat_id`, keeping other record fields.
    ///
    /// A record that is not an object is replaced.
    pub fn set_state(&self, chat_id: impl Display, state: Value) {
        let key = chat_id.to_string();
        let mut records = self.records.write();
        let record = records
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        match record {
            Value::Object(fields) => {
                fields.insert("state".to_string(), state);
            }
            other => {
                let mut fields = Map::new();
                fields.insert("state".to_string(), state);
                *other = Value::Object(fields);
            }
        }
    }

    /// Removes the record of `chat_id`, returning it.
    pub fn clear(&self, chat_id: impl Display) -> Option<Value> {
        self.records.write().remove(&chat_id.to_string())
    }

    /// Returns the number of chats with a record.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if no chat has a record.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl StateSource for ConversationStates {
    fn record(&self, chat_id: &str) -> Option<Value> {
        let record = self.records.read().get(chat_id).cloned();
        if record.is_none() {
            trace!(chat_id, "No conversation state recorded");
        }
        record
    }
}

impl From<HashMap<String, Value>> for ConversationStates {
    fn from(records: HashMap<String, Value>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl FromIterator<(String, Value)> for ConversationStates {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<HashMap<_, _>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_state_keeps_other_fields() {
        let states = ConversationStates::new();
        states.set_record("c1", json!({"state": "start", "attempts": 2}));
        states.set_state("c1", json!("awaiting_email"));

        assert_eq!(
            states.record("c1"),
            Some(json!({"state": "awaiting_email", "attempts": 2}))
        );
    }

    #[test]
    fn test_set_state_replaces_non_object_record() {
        let states = ConversationStates::new();
        states.set_record("c1", json!("garbage"));
        states.set_state("c1", json!(["a", "b"]));
        assert_eq!(states.state("c1"), Some(json!(["a", "b"])));
    }

    #[test]
    fn test_integer_and_string_chat_ids_share_a_key() {
        let states = ConversationStates::new();
        states.set_state(1001, json!("menu"));
        assert_eq!(states.state("1001"), Some(json!("menu")));
        assert_eq!(states.clear(1001), Some(json!({"state": "menu"})));
        assert!(states.is_empty());
    }

    #[test]
    fn test_missing_state_field() {
        let states: ConversationStates =
            [("c1".to_string(), json!({"step": 3}))].into_iter().collect();
        assert_eq!(states.len(), 1);
        assert!(states.record("c1").is_some());
        assert_eq!(states.state("c1"), None);
        assert_eq!(states.state("c2"), None);
    }

    #[test]
    fn test_plain_map_is_a_state_source() {
        let mut map = HashMap::new();
        map.insert("c1".to_string(), json!({"state": "done"}));
        let source: BoxedStateSource = Arc::new(map);
        assert_eq!(source.state("c1"), Some(json!("done")));
    }
}
