//! Logical combinators and sequence aggregation

use crate::error::{Result, SieveError};
use crate::spec::{Node, Spec};
use crate::types::Policy;
use std::ops::{BitAnd, BitOr, Not};

impl<T: ?Sized> Spec<T> {
    /// Both must hold. Short-circuits: `other` is skipped when `self` fails.
    pub fn and(self, other: Spec<T>) -> Spec<T> {
        self.and_with(other, Policy::ShortCircuit)
    }

    /// Both must hold, visiting children according to `policy`
    pub fn and_with(self, other: Spec<T>, policy: Policy) -> Spec<T> {
        let (left, left_format) = self.into_parts();
        let (right, right_format) = other.into_parts();
        Spec::from_parts(
            Node::And {
                left: Box::new(left),
                right: Box::new(right),
                policy,
            },
            left_format.or(right_format),
        )
    }

    /// Either must hold. Short-circuits: `other` is skipped when `self` passes.
    pub fn or(self, other: Spec<T>) -> Spec<T> {
        self.or_with(other, Policy::ShortCircuit)
    }

    /// Either must hold, visiting children according to `policy`
    pub fn or_with(self, other: Spec<T>, policy: Policy) -> Spec<T> {
        let (left, left_format) = self.into_parts();
        let (right, right_format) = other.into_parts();
        Spec::from_parts(
            Node::Or {
                left: Box::new(left),
                right: Box::new(right),
                policy,
            },
            left_format.or(right_format),
        )
    }

    /// Negation
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Spec<T> {
        let (inner, format) = self.into_parts();
        Spec::from_parts(
            Node::Not {
                inner: Box::new(inner),
                include_candidate: true,
            },
            format,
        )
    }

    /// Fold with AND, left to right
    pub fn all_of<I>(specs: I) -> Result<Spec<T>>
    where
        I: IntoIterator<Item = Spec<T>>,
    {
        all_of(specs)
    }

    /// Fold with OR, left to right
    pub fn any_of<I>(specs: I) -> Result<Spec<T>>
    where
        I: IntoIterator<Item = Spec<T>>,
    {
        any_of(specs)
    }
}

impl<T: ?Sized> BitAnd for Spec<T> {
    type Output = Spec<T>;

    fn bitand(self, rhs: Spec<T>) -> Spec<T> {
        self.and(rhs)
    }
}

impl<T: ?Sized> BitOr for Spec<T> {
    type Output = Spec<T>;

    fn bitor(self, rhs: Spec<T>) -> Spec<T> {
        self.or(rhs)
    }
}

impl<T: ?Sized> Not for Spec<T> {
    type Output = Spec<T>;

    fn not(self) -> Spec<T> {
        Spec::not(self)
    }
}

fn fold<T, I>(specs: I, op: &str, combine: fn(Spec<T>, Spec<T>) -> Spec<T>) -> Result<Spec<T>>
where
    T: ?Sized,
    I: IntoIterator<Item = Spec<T>>,
{
    let mut specs = specs.into_iter();
    let Some(first) = specs.next() else {
        tracing::warn!("{} called with no specifications", op);
        return Err(SieveError::InvalidArgument(format!(
            "{} requires at least one specification",
            op
        )));
    };
    Ok(specs.fold(first, combine))
}

/// Combine specifications with logical AND, left to right.
///
/// A single specification is returned unchanged.
pub fn all_of<T, I>(specs: I) -> Result<Spec<T>>
where
    T: ?Sized,
    I: IntoIterator<Item = Spec<T>>,
{
    fold(specs, "all_of", Spec::and)
}

/// Combine specifications with logical OR, left to right.
pub fn any_of<T, I>(specs: I) -> Result<Spec<T>>
where
    T: ?Sized,
    I: IntoIterator<Item = Spec<T>>,
{
    fold(specs, "any_of", Spec::or)
}
