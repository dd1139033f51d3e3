//! The predicate contract.
//!
//! A [`Predicate`] decides whether a handler should run for an [`Event`]. All
//! predicates are pure: they read the event (and, for state-based predicates,
//! a snapshot of the conversation state) and return a `bool`. They never
//! mutate their input and never fail; a payload missing the keys a predicate
//! looks for simply does not match.
//!
//! # Calling predicates
//!
//! Any `Fn(&Event) -> bool + Send + Sync` closure is a predicate, and any
//! predicate can be turned back into a plain callable with
//! [`PredicateExt::into_fn`], so the dispatcher can treat both the same way:
//!
//! ```rust,ignore
//! use sieve_filter::{Filter, PredicateExt};
//!
//! let is_start = Filter::command("/start").into_fn();
//! if is_start(&event) {
//!     // run the /start handler
//! }
//! ```
//!
//! # Composition
//!
//! ```rust,ignore
//! use sieve_filter::{Filter, PredicateExt};
//!
//! // A file sent while the chat waits for a document, or a /cancel command.
//! let rule = Filter::file()
//!     .and(Filter::state("awaiting_document", states.clone()))
//!     .or(Filter::command("/cancel"));
//! ```

use std::sync::Arc;

use sieve_core::Event;

use crate::combinator::{AndPredicate, OrPredicate};

/// A pure boolean check over an event.
///
/// `evaluate` is the only required method; there is no default body, so a
/// predicate type that forgets to implement it does not compile.
pub trait Predicate: Send + Sync {
    /// Returns `true` if the event matches.
    fn evaluate(&self, event: &Event) -> bool;
}

/// A shared, type-erased predicate.
///
/// Composites hold their children through this type, so one predicate may be
/// reused by any number of composites.
pub type BoxedPredicate = Arc<dyn Predicate>;

/// A predicate exposed as a plain callable.
pub type CheckFn = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

impl<F> Predicate for F
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    fn evaluate(&self, event: &Event) -> bool {
        self(event)
    }
}

impl<P: Predicate + ?Sized> Predicate for Arc<P> {
    fn evaluate(&self, event: &Event) -> bool {
        (**self).evaluate(event)
    }
}

/// Combinators and conversions available on every predicate.
pub trait PredicateExt: Predicate + Sized + 'static {
    /// Matches when both `self` and `other` match. `other` is only evaluated
    /// when `self` matched.
    fn and<P: Predicate + 'static>(self, other: P) -> AndPredicate {
        AndPredicate::new(self.boxed(), other.boxed())
    }

    /// Matches when `self` or `other` matches. `other` is only evaluated when
    /// `self` did not match.
    fn or<P: Predicate + 'static>(self, other: P) -> OrPredicate {
        OrPredicate::new(self.boxed(), other.boxed())
    }

    /// Erases the predicate type.
    fn boxed(self) -> BoxedPredicate {
        Arc::new(self)
    }

    /// Turns the predicate into a plain callable with the same behaviour as
    /// [`Predicate::evaluate`].
    fn into_fn(self) -> CheckFn {
        Arc::new(move |event: &Event| self.evaluate(event))
    }
}

impl<P: Predicate + 'static> PredicateExt for P {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closure_is_a_predicate() {
        let has_text = |event: &Event| event.text().is_some();
        assert!(has_text.evaluate(&Event::message(json!({"text": "hi"}))));
        assert!(!has_text.evaluate(&Event::message(json!({}))));
    }

    #[test]
    fn test_into_fn_matches_evaluate() {
        let event = Event::message(json!({"text": "hi"}));
        let predicate = |event: &Event| event.is_message();
        let check = predicate.into_fn();
        assert_eq!(check(&event), predicate.evaluate(&event));
    }

    #[test]
    fn test_boxed_and_shared_predicates_delegate() {
        let shared: BoxedPredicate = (|event: &Event| event.is_message()).boxed();
        let boxed: Box<dyn Predicate> = Box::new(Arc::clone(&shared));
        let event = Event::message(json!({}));
        assert!(shared.evaluate(&event));
        assert!(boxed.evaluate(&event));
    }
}
