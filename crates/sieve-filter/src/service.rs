//! Tower integration.
//!
//! Predicates gate tower services through [`tower::filter::FilterLayer`]: a
//! [`PredicateFilter`] passes matching events to the inner service and rejects
//! the rest with [`EventSkipped`]. Dispatchers treat that error as "not for
//! this handler" and move on.
//!
//! # Example
//!
//! ```rust,ignore
//! use sieve_filter::{Filter, ServiceBuilderExt};
//! use tower::ServiceBuilder;
//!
//! let svc = ServiceBuilder::new()
//!     .when(Filter::command("/start"))
//!     .service_fn(on_start);
//! ```

use std::sync::Arc;

use tower::filter::{FilterLayer, Predicate as TowerPredicate};
use tower::{BoxError, ServiceBuilder};
use tower_layer::Stack;

use sieve_core::Event;

use crate::error::EventSkipped;
use crate::predicate::{BoxedPredicate, Predicate, PredicateExt};

/// A [`tower::filter::Predicate`] backed by a sieve [`Predicate`].
///
/// When the inner predicate returns `false` the request is rejected with
/// [`EventSkipped`].
#[derive(Clone)]
pub struct PredicateFilter(BoxedPredicate);

impl PredicateFilter {
    pub fn new(predicate: impl Predicate + 'static) -> Self {
        Self(predicate.boxed())
    }

    /// Returns the wrapped predicate.
    pub fn predicate(&self) -> &BoxedPredicate {
        &self.0
    }
}

impl TowerPredicate<Arc<Event>> for PredicateFilter {
    type Request = Arc<Event>;

    fn check(&mut self, request: Arc<Event>) -> Result<Arc<Event>, BoxError> {
        if self.0.evaluate(&request) {
            Ok(request)
        } else {
            Err(Box::new(EventSkipped))
        }
    }
}

/// Returns `true` if `error` is the rejection produced by a [`PredicateFilter`].
pub fn is_skipped(error: &BoxError) -> bool {
    error.is::<EventSkipped>()
}

/// Extension trait for [`tower::ServiceBuilder`] that gates the stack on a
/// predicate.
pub trait ServiceBuilderExt<L> {
    /// Attaches `predicate` as a filter layer.
    ///
    /// Equivalent to `.filter(PredicateFilter::new(predicate))`.
    fn when<P>(self, predicate: P) -> ServiceBuilder<Stack<FilterLayer<PredicateFilter>, L>>
    where
        P: Predicate + 'static;
}

impl<L> ServiceBuilderExt<L> for ServiceBuilder<L> {
    fn when<P>(self, predicate: P) -> ServiceBuilder<Stack<FilterLayer<PredicateFilter>, L>>
    where
        P: Predicate + 'static,
    {
        self.filter(PredicateFilter::new(predicate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Filter;
    use serde_json::json;
    use sieve_core::EventType;
    use tower::ServiceExt;

    async fn echo(event: Arc<Event>) -> Result<EventType, BoxError> {
        Ok(event.event_type)
    }

    #[test]
    fn test_matching_event_reaches_service() {
        let svc = ServiceBuilder::new()
            .when(Filter::command("/start"))
            .service_fn(echo);
        let event = Arc::new(Event::message(json!({"text": "/start"})));
        let response = tokio_test::block_on(svc.oneshot(event)).unwrap();
        assert_eq!(response, EventType::NewMessage);
    }

    #[test]
    fn test_mismatch_is_skipped() {
        let svc = ServiceBuilder::new().when(Filter::file()).service_fn(echo);
        let event = Arc::new(Event::message(json!({"text": "no file"})));
        let err = tokio_test::block_on(svc.oneshot(event)).unwrap_err();
        assert!(is_skipped(&err));
    }

    #[test]
    fn test_closure_predicate() {
        let svc = ServiceBuilder::new()
            .when(|event: &Event| event.callback_data() == Some("ok"))
            .service_fn(echo);
        let event = Arc::new(Event::callback_query("ok", json!({})));
        assert!(tokio_test::block_on(svc.oneshot(event)).is_ok());
    }

    #[test]
    fn test_other_errors_are_not_skips() {
        let err: BoxError = "boom".into();
        assert!(!is_skipped(&err));
    }
}
