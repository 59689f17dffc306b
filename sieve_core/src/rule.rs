//! Leaf rules: the application-supplied checks at the bottom of a tree

use std::fmt;

/// A concrete check over candidates of type `T`.
///
/// Implementors only decide pass or fail. Resetting and populating the error
/// report is done by [`Spec`](crate::Spec), so `check` must be a pure function
/// of the candidate and the rule's own configuration. A rule that wants to
/// reject a malformed candidate returns `false`; it never panics.
pub trait Rule<T: ?Sized>: Send + Sync {
    /// Whether the candidate passes
    fn check(&self, candidate: &T) -> bool;

    /// Human-readable rule text, synthesized from the rule's parameters
    fn description(&self) -> String;

    /// Identity used to key failures. Defaults to the implementor's type name.
    /// A `/` in the name is escaped as `\/` so it never reads as a path separator.
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Strip module paths and generic arguments: `a::b::GreaterThan<i64>` -> `GreaterThan`
pub(crate) fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// A rule backed by a closure
pub struct FnRule<F> {
    name: String,
    description: String,
    predicate: F,
}

impl<F> FnRule<F> {
    pub fn new(name: impl Into<String>, description: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            predicate,
        }
    }
}

impl<T, F> Rule<T> for FnRule<F>
where
    T: ?Sized,
    F: Fn(&T) -> bool + Send + Sync,
{
    fn check(&self, candidate: &T) -> bool {
        (self.predicate)(candidate)
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Build a named rule from a closure
pub fn rule_fn<T, F>(name: impl Into<String>, description: impl Into<String>, predicate: F) -> FnRule<F>
where
    T: ?Sized,
    F: Fn(&T) -> bool + Send + Sync,
{
    FnRule::new(name, description, predicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Positive;

    impl Rule<i64> for Positive {
        fn check(&self, candidate: &i64) -> bool {
            *candidate > 0
        }

        fn description(&self) -> String {
            "Positive value".to_string()
        }
    }

    #[test]
    fn test_default_name_is_type_name() {
        assert_eq!(Rule::<i64>::name(&Positive), "Positive");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("sieve_rules::numeric::GreaterThan<i64>"), "GreaterThan");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    struct User {
        active: bool,
    }

    #[test]
    fn test_fn_rule() {
        let active = rule_fn("IsActive", "User is active", |u: &User| u.active);

        assert!(active.check(&User { active: true }));
        assert!(!active.check(&User { active: false }));
        assert_eq!(Rule::<User>::name(&active), "IsActive");
        assert_eq!(Rule::<User>::description(&active), "User is active");
    }
}
