//! Event types consumed by the predicate engine.
//!
//! This module provides the input side of the filter layer:
//!
//! - [`EventType`] - Event type classification (new message, callback query, ...)
//! - [`PartKind`] - Kinds of message parts (file, reply, forward, ...)
//! - [`Event`] - An incoming event with its raw, loosely-shaped payload
//!
//! Events arrive from the bot API as JSON envelopes:
//!
//! ```json
//! {"eventId": 12, "type": "newMessage", "payload": {"text": "/start", "chat": {"chatId": "c1"}}}
//! ```
//!
//! The payload is kept as a [`serde_json::Value`] because the platform adds and
//! drops keys freely; every accessor returns an `Option` instead of failing.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::value::{chat_key, lookup, lookup_str};

// ============================================================================
// Event Type Classification
// ============================================================================

/// Classification of event types.
///
/// Wire names are camelCase (`newMessage`, `callbackQuery`, ...). Names the
/// client does not know deserialize to [`EventType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A new message in a chat.
    NewMessage,
    /// An existing message was edited.
    EditedMessage,
    /// A message was deleted.
    DeletedMessage,
    /// A message was pinned.
    PinnedMessage,
    /// A message was unpinned.
    UnpinnedMessage,
    /// Members joined a chat.
    NewChatMembers,
    /// Members left a chat.
    LeftChatMembers,
    /// Chat information changed.
    ChangedChatInfo,
    /// An inline keyboard button was pressed.
    CallbackQuery,
    /// Other/unknown event types
    Other,
}

impl EventType {
    /// Returns the wire name of this event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewMessage => "newMessage",
            Self::EditedMessage => "editedMessage",
            Self::DeletedMessage => "deletedMessage",
            Self::PinnedMessage => "pinnedMessage",
            Self::UnpinnedMessage => "unpinnedMessage",
            Self::NewChatMembers => "newChatMembers",
            Self::LeftChatMembers => "leftChatMembers",
            Self::ChangedChatInfo => "changedChatInfo",
            Self::CallbackQuery => "callbackQuery",
            Self::Other => "other",
        }
    }

    fn from_wire(s: &str) -> Self {
        match s {
            "newMessage" => Self::NewMessage,
            "editedMessage" => Self::EditedMessage,
            "deletedMessage" => Self::DeletedMessage,
            "pinnedMessage" => Self::PinnedMessage,
            "unpinnedMessage" => Self::UnpinnedMessage,
            "newChatMembers" => Self::NewChatMembers,
            "leftChatMembers" => Self::LeftChatMembers,
            "changedChatInfo" => Self::ChangedChatInfo,
            "callbackQuery" => Self::CallbackQuery,
            _ => Self::Other,
        }
    }
}

impl FromStr for EventType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_wire(s))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&name))
    }
}

// ============================================================================
// Part Kinds
// ============================================================================

/// The kind of a message part, as found in the `type` field of each element
/// of `payload.parts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    File,
    Sticker,
    Mention,
    Voice,
    Reply,
    Forward,
    InlineKeyboardMarkup,
}

impl PartKind {
    /// Returns the wire tag of this part kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Sticker => "sticker",
            Self::Mention => "mention",
            Self::Voice => "voice",
            Self::Reply => "reply",
            Self::Forward => "forward",
            Self::InlineKeyboardMarkup => "inlineKeyboardMarkup",
        }
    }

    /// Returns `true` if `part` is a JSON object whose `type` is this kind.
    pub fn matches(&self, part: &Value) -> bool {
        lookup_str(part, "type") == Some(self.as_str())
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Event
// ============================================================================

/// An incoming event.
///
/// `data` holds the raw payload. Nothing about its shape is guaranteed: any
/// key may be missing at any level, and the accessors below report that as
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier assigned by the platform, if present.
    #[serde(rename = "eventId", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<u64>,

    /// The event type tag.
    #[serde(rename = "type")]
    pub event_type: EventType,

    /// The raw payload.
    #[serde(rename = "payload", default)]
    pub data: Value,

    /// Callback data of a callback query, when carried on the envelope.
    #[serde(
        rename = "callbackData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub callback_data: Option<String>,
}

impl Event {
    /// Creates an event with the given type and payload.
    pub fn new(event_type: EventType, data: Value) -> Self {
        Self {
            event_id: None,
            event_type,
            data,
            callback_data: None,
        }
    }

    /// Creates a `newMessage` event.
    pub fn message(data: Value) -> Self {
        Self::new(EventType::NewMessage, data)
    }

    /// Creates a `callbackQuery` event carrying `callback_data`.
    pub fn callback_query(callback_data: impl Into<String>, data: Value) -> Self {
        Self::new(EventType::CallbackQuery, data).with_callback_data(callback_data)
    }

    /// Sets the envelope-level callback data.
    pub fn with_callback_data(mut self, callback_data: impl Into<String>) -> Self {
        self.callback_data = Some(callback_data.into());
        self
    }

    /// Sets the event identifier.
    pub fn with_event_id(mut self, event_id: u64) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// Returns `true` if this is a `newMessage` event.
    pub fn is_message(&self) -> bool {
        self.event_type == EventType::NewMessage
    }

    /// Returns the message text (`data.text`), if it is a string.
    pub fn text(&self) -> Option<&str> {
        lookup_str(&self.data, "text")
    }

    /// Returns the message parts (`data.parts`), if present and an array.
    pub fn parts(&self) -> Option<&[Value]> {
        lookup(&self.data, "parts")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Returns the chat identifier found at `data.chat.chatId`.
    ///
    /// String and integer identifiers normalise to the same key.
    pub fn chat_id(&self) -> Option<String> {
        lookup(&self.data, "chat.chatId").and_then(chat_key)
    }

    /// Returns the callback data.
    ///
    /// The envelope field wins; otherwise `data.callbackData` is used, which is
    /// where the bot API places it for callback queries.
    pub fn callback_data(&self) -> Option<&str> {
        self.callback_data
            .as_deref()
            .or_else(|| lookup_str(&self.data, "callbackData"))
    }
}
