//! # Sieve Filter
//!
//! Composable predicates deciding which handler receives a chat-bot event.
//!
//! This layer provides:
//! - The [`Predicate`] contract, implemented by every built-in predicate and by
//!   plain `Fn(&Event) -> bool` closures
//! - [`AndPredicate`] / [`OrPredicate`] composition with short-circuiting
//! - Event-shape, text, callback, nick and conversation-state predicates
//! - The [`Filter`] namespace and the [`FilterRegistry`] alias table
//! - A tower [`FilterLayer`](tower::filter::FilterLayer) adapter
//!
//! Predicates are built once, when handlers are registered, and evaluated
//! for every incoming event. Construction can fail (an invalid regex, an
//! unknown alias); evaluation cannot.

pub mod callback;
pub mod combinator;
pub mod error;
pub mod nick;
pub mod predicate;
pub mod registry;
pub mod service;
pub mod shape;
pub mod state;
pub mod text;

pub use callback::{CallbackDataPredicate, CallbackDataRegexPredicate};
pub use combinator::{AndPredicate, OrPredicate, all_of, any_of};
pub use error::{EventSkipped, FilterError, FilterResult};
pub use nick::{FromNickPredicate, NickMatch};
pub use predicate::{BoxedPredicate, CheckFn, Predicate, PredicateExt};
pub use registry::{Alias, Constructor, Filter, FilterArgs, FilterRegistry};
pub use service::{PredicateFilter, ServiceBuilderExt, is_skipped};
pub use shape::{FilePredicate, ForwardPredicate, MessagePredicate, ReplyPredicate, is_message};
pub use state::{StateContainsPredicate, StateEqualsPredicate};
pub use text::{
    CommandPredicate, DEFAULT_COMMAND_PREFIXES, RegexPredicate, RegexTextPartsPredicate,
    TagPredicate,
};
