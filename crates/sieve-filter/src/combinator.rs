//! Boolean combinators.
//!
//! [`AndPredicate`] and [`OrPredicate`] each hold exactly two children and are
//! predicates themselves, so they nest into expression trees of any depth.
//! A tree is evaluated left to right, depth first, and every node
//! short-circuits: the right child is only evaluated when the left one did not
//! already decide the result.

use std::sync::Arc;

use tracing::trace;

use sieve_core::Event;

use crate::error::{FilterError, FilterResult};
use crate::predicate::{BoxedPredicate, Predicate};

/// Matches when both children match.
#[derive(Clone)]
pub struct AndPredicate {
    left: BoxedPredicate,
    right: BoxedPredicate,
}

impl AndPredicate {
    /// Combines two shared predicates.
    pub fn new(left: BoxedPredicate, right: BoxedPredicate) -> Self {
        Self { left, right }
    }
}

impl Predicate for AndPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        if !self.left.evaluate(event) {
            trace!("left operand rejected the event, skipping right operand");
            return false;
        }
        self.right.evaluate(event)
    }
}

/// Matches when at least one child matches.
#[derive(Clone)]
pub struct OrPredicate {
    left: BoxedPredicate,
    right: BoxedPredicate,
}

impl OrPredicate {
    /// Combines two shared predicates.
    pub fn new(left: BoxedPredicate, right: BoxedPredicate) -> Self {
        Self { left, right }
    }
}

impl Predicate for OrPredicate {
    fn evaluate(&self, event: &Event) -> bool {
        if self.left.evaluate(event) {
            trace!("left operand accepted the event, skipping right operand");
            return true;
        }
        self.right.evaluate(event)
    }
}

/// Folds `predicates` into a left-nested chain of [`AndPredicate`]s.
///
/// `all_of([a, b, c])` evaluates as `(a AND b) AND c`. A single predicate is
/// returned unchanged; an empty list is an error.
pub fn all_of<I>(predicates: I) -> FilterResult<BoxedPredicate>
where
    I: IntoIterator<Item = BoxedPredicate>,
{
    fold(predicates, "all", |left, right| {
        Arc::new(AndPredicate::new(left, right)) as BoxedPredicate
    })
}

/// Folds `predicates` into a left-nested chain of [`OrPredicate`]s.
///
/// `any_of([a, b, c])` evaluates as `(a OR b) OR c`. A single predicate is
/// returned unchanged; an empty list is an error.
pub fn any_of<I>(predicates: I) -> FilterResult<BoxedPredicate>
where
    I: IntoIterator<Item = BoxedPredicate>,
{
    fold(predicates, "any", |left, right| {
        Arc::new(OrPredicate::new(left, right)) as BoxedPredicate
    })
}

fn fold<I, F>(predicates: I, name: &'static str, combine: F) -> FilterResult<BoxedPredicate>
where
    I: IntoIterator<Item = BoxedPredicate>,
    F: Fn(BoxedPredicate, BoxedPredicate) -> BoxedPredicate,
{
    let mut predicates = predicates.into_iter();
    let first = predicates
        .next()
        .ok_or(FilterError::EmptyCombination(name))?;
    Ok(predicates.fold(first, combine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::PredicateExt;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn constant(value: bool) -> BoxedPredicate {
        (move |_: &Event| value).boxed()
    }

    /// A predicate that counts how often it is evaluated.
    fn counting(value: bool, counter: &Arc<AtomicUsize>) -> BoxedPredicate {
        let counter = Arc::clone(counter);
        (move |_: &Event| {
            counter.fetch_add(1, Ordering::SeqCst);
            value
        })
        .boxed()
    }

    fn event() -> Event {
        Event::message(json!({"text": "hello"}))
    }

    #[test]
    fn test_truth_tables() {
        for left in [false, true] {
            for right in [false, true] {
                let and = AndPredicate::new(constant(left), constant(right));
                let or = OrPredicate::new(constant(left), constant(right));
                assert_eq!(and.evaluate(&event()), left && right);
                assert_eq!(or.evaluate(&event()), left || right);
            }
        }
    }

    #[test]
    fn test_and_short_circuits_on_false() {
        let calls = Arc::new(AtomicUsize::new(0));
        let and = AndPredicate::new(constant(false), counting(true, &calls));
        assert!(!and.evaluate(&event()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let and = AndPredicate::new(constant(true), counting(true, &calls));
        assert!(and.evaluate(&event()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_or_short_circuits_on_true() {
        let calls = Arc::new(AtomicUsize::new(0));
        let or = OrPredicate::new(constant(true), counting(false, &calls));
        assert!(or.evaluate(&event()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let or = OrPredicate::new(constant(false), counting(false, &calls));
        assert!(!or.evaluate(&event()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_tree_evaluates_left_to_right() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let step = |name: &'static str, value: bool| {
            let order = Arc::clone(&order);
            (move |_: &Event| {
                order.lock().unwrap().push(name);
                value
            })
            .boxed()
        };

        // (a OR b) AND (c OR d), with a = false, b = true, c = true.
        let tree = step("a", false)
            .or(step("b", true))
            .and(step("c", true).or(step("d", true)));
        assert!(tree.evaluate(&event()));
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_shared_child_in_two_composites() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shared = counting(true, &calls);
        let first = AndPredicate::new(Arc::clone(&shared), constant(true));
        let second = OrPredicate::new(constant(false), Arc::clone(&shared));
        assert!(first.evaluate(&event()));
        assert!(second.evaluate(&event()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_all_of_and_any_of() {
        let all = all_of([constant(true), constant(true), constant(false)]).unwrap();
        assert!(!all.evaluate(&event()));
        let any = any_of([constant(false), constant(false), constant(true)]).unwrap();
        assert!(any.evaluate(&event()));
        let single = all_of([constant(true)]).unwrap();
        assert!(single.evaluate(&event()));
    }

    #[test]
    fn test_empty_combination_is_an_error() {
        assert!(matches!(
            all_of(Vec::new()),
            Err(FilterError::EmptyCombination("all"))
        ));
        assert!(matches!(
            any_of(std::iter::empty()),
            Err(FilterError::EmptyCombination("any"))
        ));
    }
}
