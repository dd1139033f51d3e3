//! Event-shape predicates.
//!
//! These look at the event type and at the kinds of parts a message carries.
//! Every predicate that only makes sense for messages calls [`is_message`]
//! first.

use sieve_core::{Event, EventType, PartKind};

use crate::predicate::Predicate;

/// Returns `true` if the event is a new message.
///
/// This is the shared first step of every message-only predicate.
pub fn is_message(event: &Event) -> bool {
    event.event_type == EventType::NewMessage
}

/// Returns `true` if `data.parts` exists and some part is of `kind`.
fn has_part(event: &Event, kind: PartKind) -> bool {
    event
        .parts()
        .is_some_and(|parts| parts.iter().any(|part| kind.matches(part)))
}

/// Matches new messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePredicate;

impl Predicate for MessagePredicate {
    fn evaluate(&self, event: &Event) -> bool {
        is_message(event)
    }
}

/// Matches messages with at least one `file` part.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilePredicate;

impl Predicate for FilePredicate {
    fn evaluate(&self, event: &Event) -> bool {
        is_message(event) && has_part(event, PartKind::File)
    }
}

/// Matches messages with at least one `reply` part.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyPredicate;

impl Predicate for ReplyPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        is_message(event) && has_part(event, PartKind::Reply)
    }
}

/// Matches events with at least one `forward` part.
///
/// Unlike the other part checks this one reads `data.parts` directly and does
/// not look at the event type, so e.g. an edited message carrying a forward
/// also matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardPredicate;

impl Predicate for ForwardPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        has_part(event, PartKind::Forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_parts(event_type: EventType, parts: serde_json::Value) -> Event {
        Event::new(event_type, json!({ "parts": parts }))
    }

    #[test]
    fn test_message_predicate() {
        assert!(MessagePredicate.evaluate(&Event::message(json!({}))));
        assert!(!MessagePredicate.evaluate(&Event::new(EventType::EditedMessage, json!({}))));
        assert!(!MessagePredicate.evaluate(&Event::callback_query("x", json!({}))));
    }

    #[test]
    fn test_part_predicates_find_their_kind() {
        let event = with_parts(
            EventType::NewMessage,
            json!([{"type": "mention"}, {"type": "file", "payload": {"fileId": "f1"}}]),
        );
        assert!(FilePredicate.evaluate(&event));
        assert!(!ReplyPredicate.evaluate(&event));
        assert!(!ForwardPredicate.evaluate(&event));

        let event = with_parts(EventType::NewMessage, json!([{"type": "reply"}]));
        assert!(ReplyPredicate.evaluate(&event));

        let event = with_parts(EventType::NewMessage, json!([{"type": "forward"}]));
        assert!(ForwardPredicate.evaluate(&event));
    }

    #[test]
    fn test_file_and_reply_require_a_message() {
        let event = with_parts(
            EventType::EditedMessage,
            json!([{"type": "file"}, {"type": "reply"}]),
        );
        assert!(!FilePredicate.evaluate(&event));
        assert!(!ReplyPredicate.evaluate(&event));
    }

    #[test]
    fn test_forward_ignores_event_type() {
        let event = with_parts(EventType::EditedMessage, json!([{"type": "forward"}]));
        assert!(ForwardPredicate.evaluate(&event));
    }

    #[test]
    fn test_missing_or_malformed_parts() {
        let empty = Event::message(json!({}));
        let not_a_list = Event::message(json!({"parts": "file"}));
        let untyped = with_parts(EventType::NewMessage, json!([{"payload": {}}, 3, null]));
        for event in [&empty, &not_a_list, &untyped] {
            assert!(!FilePredicate.evaluate(event));
            assert!(!ReplyPredicate.evaluate(event));
            assert!(!ForwardPredicate.evaluate(event));
        }
    }
}
