//! Evaluation counting for leaf rules

use sieve_core::Rule;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared handle onto a [`Counted`] rule's evaluation count
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluations recorded so far
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }

    fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Wraps a rule and counts how often it is evaluated.
///
/// The counter survives the rule being moved into a tree, so callers keep a
/// [`CallCounter`] to observe which branches ran.
#[derive(Debug)]
pub struct Counted<R> {
    inner: R,
    calls: CallCounter,
}

impl<R> Counted<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: CallCounter::new(),
        }
    }

    /// Handle onto the evaluation count
    pub fn counter(&self) -> CallCounter {
        self.calls.clone()
    }

    pub fn count(&self) -> usize {
        self.calls.get()
    }
}

impl<T, R> Rule<T> for Counted<R>
where
    T: ?Sized,
    R: Rule<T>,
{
    fn check(&self, candidate: &T) -> bool {
        let count = self.calls.increment();
        tracing::trace!(rule = %self.inner.name(), count, "Counted evaluation");
        self.inner.check(candidate)
    }

    fn description(&self) -> String {
        self.inner.description()
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}
