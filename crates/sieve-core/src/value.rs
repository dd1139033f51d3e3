//! Safe lookups into loosely-shaped JSON payloads.
//!
//! Every predicate reads the event payload through [`lookup`]. A missing key,
//! an out-of-range index or a value of the wrong type along the path all
//! collapse to `None`, so callers never have to distinguish between them.

use serde_json::Value;

/// Follows a dotted `path` through `value`.
///
/// Object segments are looked up by key; when the current value is an array,
/// a segment is parsed as an index.
///
/// ```rust
/// use serde_json::json;
/// use sieve_core::value::lookup;
///
/// let data = json!({"payload": {"message": {"from": {"nick": "alice"}}}});
/// assert_eq!(lookup(&data, "payload.message.from.nick"), Some(&json!("alice")));
/// assert_eq!(lookup(&data, "payload.message.text"), None);
/// ```
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Like [`lookup`], but only yields string values.
pub fn lookup_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}

/// Normalises a chat identifier to its string key.
///
/// The platform sends chat ids as strings, but integer ids are accepted too
/// and map to their decimal form. Anything else is not a chat id.
pub fn chat_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_object() {
        let data = json!({"chat": {"chatId": "c1", "type": "private"}});
        assert_eq!(lookup_str(&data, "chat.chatId"), Some("c1"));
        assert_eq!(lookup(&data, "chat.missing"), None);
        assert_eq!(lookup(&data, "missing.chatId"), None);
    }

    #[test]
    fn test_lookup_through_array_index() {
        let data = json!({"parts": [{"type": "file"}, {"type": "reply"}]});
        assert_eq!(lookup_str(&data, "parts.1.type"), Some("reply"));
        assert_eq!(lookup(&data, "parts.2.type"), None);
        assert_eq!(lookup(&data, "parts.first.type"), None);
    }

    #[test]
    fn test_lookup_type_mismatch_is_absent() {
        let data = json!({"text": "hello", "chat": null});
        assert_eq!(lookup(&data, "text.length"), None);
        assert_eq!(lookup(&data, "chat.chatId"), None);
        assert_eq!(lookup_str(&json!({"text": 42}), "text"), None);
    }

    #[test]
    fn test_lookup_on_non_object_root() {
        assert_eq!(lookup(&Value::Null, "text"), None);
        assert_eq!(lookup(&json!([1, 2]), "text"), None);
    }

    #[test]
    fn test_chat_key() {
        assert_eq!(chat_key(&json!("abc@chat.agent")), Some("abc@chat.agent".into()));
        assert_eq!(chat_key(&json!(1001)), Some("1001".into()));
        assert_eq!(chat_key(&json!({"id": 1})), None);
        assert_eq!(chat_key(&Value::Null), None);
    }
}
