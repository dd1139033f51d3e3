//! # Sieve Core
//!
//! Input types of the Sieve predicate engine.
//!
//! The event transport and the conversation-state store live outside the
//! filter layer; this crate defines the shape in which they hand data over:
//!
//! - **Events**: [`Event`], [`EventType`] and [`PartKind`], built from the bot
//!   API's JSON envelopes with the payload kept as a loose JSON tree
//! - **Payload lookups**: [`lookup`] and friends, which turn every missing key
//!   or type mismatch into `None`
//! - **Conversation state**: the read-only [`StateSource`] seam and the
//!   [`ConversationStates`] in-memory store

pub mod event;
pub mod state;
pub mod value;

pub use event::{Event, EventType, PartKind};
pub use state::{BoxedStateSource, ConversationStates, StateSource};
pub use value::{chat_key, lookup, lookup_str};
