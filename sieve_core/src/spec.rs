//! The specification tree and its evaluation entry points

use crate::error::{Result, SieveError};
use crate::rule::{rule_fn, Rule};
use crate::types::{ErrorReport, Evaluation, Policy};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// One node of a rule tree. Composites own their children.
pub(crate) enum Node<T: ?Sized> {
    Leaf {
        rule: Box<dyn Rule<T>>,
        include_candidate: bool,
    },
    And {
        left: Box<Node<T>>,
        right: Box<Node<T>>,
        policy: Policy,
    },
    Or {
        left: Box<Node<T>>,
        right: Box<Node<T>>,
        policy: Policy,
    },
    Not {
        inner: Box<Node<T>>,
        include_candidate: bool,
    },
}

/// Renders a candidate for the `(got: ...)` suffix of failure messages
pub type CandidateFormat<T> = fn(&T) -> String;

fn debug_candidate<T: fmt::Debug + ?Sized>(candidate: &T) -> String {
    format!("{:?}", candidate)
}

/// Escape `/` in a rule name so it cannot pose as a path separator
fn escape_segment(name: &str) -> String {
    name.replace('\\', "\\\\").replace('/', "\\/")
}

/// Join a scope path and a segment into a report key
fn scoped(scope: &str, segment: &str) -> String {
    if scope.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", scope, segment)
    }
}

fn failure_message<T: ?Sized>(
    text: String,
    candidate: &T,
    include: bool,
    format: Option<CandidateFormat<T>>,
) -> String {
    match format {
        Some(render) if include => format!("{} (got: {})", text, render(candidate)),
        _ => text,
    }
}

impl<T: ?Sized> Node<T> {
    fn kind(&self) -> String {
        match self {
            Node::Leaf { rule, .. } => rule.name(),
            Node::And { .. } => "And".to_string(),
            Node::Or { .. } => "Or".to_string(),
            Node::Not { .. } => "Not".to_string(),
        }
    }

    fn description(&self) -> String {
        match self {
            Node::Leaf { rule, .. } => rule.description(),
            Node::And { left, right, .. } => {
                format!("({} AND {})", left.description(), right.description())
            }
            Node::Or { left, right, .. } => {
                format!("({} OR {})", left.description(), right.description())
            }
            Node::Not { inner, .. } => format!("NOT({})", inner.description()),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::And { left, right, .. } | Node::Or { left, right, .. } => {
                1 + left.depth().max(right.depth())
            }
            Node::Not { inner, .. } => 1 + inner.depth(),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::And { left, right, .. } | Node::Or { left, right, .. } => {
                left.leaf_count() + right.leaf_count()
            }
            Node::Not { inner, .. } => inner.leaf_count(),
        }
    }

    pub(crate) fn set_include_candidate(&mut self, include: bool) {
        match self {
            Node::Leaf {
                include_candidate, ..
            } => *include_candidate = include,
            Node::And { left, right, .. } | Node::Or { left, right, .. } => {
                left.set_include_candidate(include);
                right.set_include_candidate(include);
            }
            Node::Not {
                inner,
                include_candidate,
            } => {
                *include_candidate = include;
                inner.set_include_candidate(include);
            }
        }
    }

    pub(crate) fn set_policy(&mut self, new_policy: Policy) {
        match self {
            Node::Leaf { .. } => {}
            Node::And {
                left,
                right,
                policy,
            }
            | Node::Or {
                left,
                right,
                policy,
            } => {
                *policy = new_policy;
                left.set_policy(new_policy);
                right.set_policy(new_policy);
            }
            Node::Not { inner, .. } => inner.set_policy(new_policy),
        }
    }

    /// Depth-first evaluation. Every node settles its own verdict and report
    /// before returning to its parent.
    fn evaluate(
        &self,
        candidate: &T,
        scope: &str,
        format: Option<CandidateFormat<T>>,
    ) -> Evaluation {
        match self {
            Node::Leaf {
                rule,
                include_candidate,
            } => {
                let satisfied = rule.check(candidate);
                let key = scoped(scope, &escape_segment(&rule.name()));
                tracing::trace!(rule = %key.as_str(), satisfied, "Leaf evaluated");
                if satisfied {
                    return Evaluation::pass();
                }
                let mut errors = ErrorReport::new();
                errors.insert(
                    key,
                    failure_message(rule.description(), candidate, *include_candidate, format),
                );
                Evaluation::fail(errors)
            }
            Node::And {
                left,
                right,
                policy,
            } => {
                let left_eval = left.evaluate(candidate, &scoped(scope, "and[0]"), format);
                if !left_eval.satisfied && *policy == Policy::ShortCircuit {
                    return Evaluation::fail(left_eval.errors);
                }
                let right_eval = right.evaluate(candidate, &scoped(scope, "and[1]"), format);
                if left_eval.satisfied && right_eval.satisfied {
                    return Evaluation::pass();
                }
                let mut errors = ErrorReport::new();
                for child in [left_eval, right_eval] {
                    if !child.satisfied {
                        errors.merge(child.errors);
                    }
                }
                Evaluation::fail(errors)
            }
            Node::Or {
                left,
                right,
                policy,
            } => {
                let left_eval = left.evaluate(candidate, &scoped(scope, "or[0]"), format);
                if left_eval.satisfied && *policy == Policy::ShortCircuit {
                    return Evaluation::pass();
                }
                let right_eval = right.evaluate(candidate, &scoped(scope, "or[1]"), format);
                if left_eval.satisfied || right_eval.satisfied {
                    return Evaluation::pass();
                }
                let mut errors = left_eval.errors;
                errors.merge(right_eval.errors);
                Evaluation::fail(errors)
            }
            Node::Not {
                inner,
                include_candidate,
            } => {
                let key = scoped(scope, "not");
                let inner_eval = inner.evaluate(candidate, &key, format);
                if !inner_eval.satisfied {
                    return Evaluation::pass();
                }
                let mut errors = ErrorReport::new();
                errors.insert(
                    key,
                    failure_message(
                        format!("Expected to NOT satisfy: {}", inner.description()),
                        candidate,
                        *include_candidate,
                        format,
                    ),
                );
                Evaluation::fail(errors)
            }
        }
    }
}

/// A composable rule over candidates of type `T`.
///
/// Build leaves with [`Spec::leaf`], combine them with
/// [`and`](Spec::and), [`or`](Spec::or) and [`not`](Spec::not) (or `&`, `|`, `!`),
/// then evaluate the root once per candidate.
///
/// Failures are keyed by path so the same rule type may appear several times
/// in one tree: `and[0]/GreaterThan`, `and[1]/not`, `or[1]/and[0]/MinLength`.
///
/// Candidates need not implement `Debug`: [`Spec::leaf`] captures a `Debug`
/// renderer for the `(got: ...)` suffix, while [`Spec::leaf_opaque`] carries
/// none. A combined tree keeps the first renderer found among its operands.
///
/// [`evaluate`](Spec::evaluate) is pure and safe to call from several threads.
/// The remaining entry points also record the report of the most recent call,
/// readable through [`errors`](Spec::errors).
pub struct Spec<T: ?Sized> {
    pub(crate) node: Node<T>,
    format: Option<CandidateFormat<T>>,
    last_errors: Mutex<ErrorReport>,
}

impl<T: fmt::Debug + ?Sized> Spec<T> {
    /// Wrap a leaf rule; failure messages show the candidate's `Debug` form
    pub fn leaf<R: Rule<T> + 'static>(rule: R) -> Self {
        Self::leaf_opaque(rule).with_candidate_format(debug_candidate::<T>)
    }
}

impl<T: ?Sized> Spec<T> {
    pub(crate) fn from_parts(node: Node<T>, format: Option<CandidateFormat<T>>) -> Self {
        Self {
            node,
            format,
            last_errors: Mutex::new(ErrorReport::new()),
        }
    }

    /// Wrap a leaf rule without a candidate renderer; `T` need not be `Debug`
    pub fn leaf_opaque<R: Rule<T> + 'static>(rule: R) -> Self {
        Self::from_parts(
            Node::Leaf {
                rule: Box::new(rule),
                include_candidate: true,
            },
            None,
        )
    }

    /// Wrap a named closure as a leaf. Like [`Spec::leaf_opaque`], no
    /// candidate renderer is attached.
    pub fn from_fn<F>(name: impl Into<String>, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::leaf_opaque(rule_fn(name, description, predicate))
    }

    /// Render candidates in failure messages with `format`
    pub fn with_candidate_format(mut self, format: CandidateFormat<T>) -> Self {
        self.format = Some(format);
        self
    }

    /// Human-readable rule text for the whole tree
    pub fn description(&self) -> String {
        self.node.description()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        self.node.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.node.leaf_count()
    }

    /// Toggle appending the candidate to failure messages, tree-wide
    pub fn include_candidate_in_error(mut self, include: bool) -> Self {
        self.node.set_include_candidate(include);
        self
    }

    /// Copy of the report from the most recent recorded evaluation
    pub fn errors(&self) -> ErrorReport {
        self.last_errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn into_parts(self) -> (Node<T>, Option<CandidateFormat<T>>) {
        (self.node, self.format)
    }

    fn record(&self, report: ErrorReport) {
        *self
            .last_errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = report;
    }

    /// Evaluate without touching recorded state
    pub fn evaluate(&self, candidate: &T) -> Evaluation {
        self.node.evaluate(candidate, "", self.format)
    }

    /// Borrow the tree as a plain predicate, e.g. for `Iterator::filter`.
    /// Uses [`evaluate`](Spec::evaluate), so recorded errors are untouched.
    pub fn as_predicate(&self) -> impl Fn(&T) -> bool + '_ {
        move |candidate: &T| self.evaluate(candidate).satisfied
    }

    /// Clear the recorded report, evaluate, then record the fresh report
    fn run(&self, candidate: &T) -> Evaluation {
        self.record(ErrorReport::new());
        let evaluation = self.evaluate(candidate);
        if !evaluation.satisfied {
            tracing::debug!(
                spec = %self.description(),
                violations = evaluation.errors.len(),
                "Candidate rejected"
            );
        }
        self.record(evaluation.errors.clone());
        evaluation
    }

    /// Whether the candidate satisfies the specification
    pub fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.run(candidate).satisfied
    }

    /// Alias for [`is_satisfied_by`](Spec::is_satisfied_by)
    pub fn validate(&self, candidate: &T) -> bool {
        self.is_satisfied_by(candidate)
    }

    /// Every failure message joined one per line; empty when the candidate passes
    pub fn explain_failure(&self, candidate: &T) -> String {
        self.run(candidate).explain()
    }

    /// Fail with [`SieveError::RuleViolation`] carrying the joined explanation
    pub fn validate_or_raise(&self, candidate: &T) -> Result<()> {
        self.validate_or_else(candidate, SieveError::RuleViolation)
    }

    /// Like [`validate_or_raise`](Spec::validate_or_raise) with a caller-chosen error
    pub fn validate_or_else<E, F>(&self, candidate: &T, make_error: F) -> std::result::Result<(), E>
    where
        F: FnOnce(String) -> E,
    {
        let evaluation = self.run(candidate);
        if evaluation.satisfied {
            Ok(())
        } else {
            Err(make_error(evaluation.explain()))
        }
    }
}

impl<T: ?Sized> fmt::Display for Spec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.node.kind(), self.description())
    }
}

impl<T: ?Sized> fmt::Debug for Spec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec")
            .field("kind", &self.node.kind())
            .field("description", &self.description())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GreaterThan(i64);

    impl Rule<i64> for GreaterThan {
        fn check(&self, candidate: &i64) -> bool {
            *candidate > self.0
        }

        fn description(&self) -> String {
            format!("Value greater than {}", self.0)
        }
    }

    fn gt(threshold: i64) -> Spec<i64> {
        Spec::leaf(GreaterThan(threshold))
    }

    #[test]
    fn test_leaf_pass_and_fail() {
        let spec = gt(5);

        assert!(spec.is_satisfied_by(&7));
        assert!(spec.errors().is_empty());

        assert!(!spec.is_satisfied_by(&3));
        assert_eq!(
            spec.errors().get("GreaterThan"),
            Some("Value greater than 5 (got: 3)")
        );
    }

    #[test]
    fn test_errors_reset_between_calls() {
        let spec = gt(5);

        assert!(!spec.is_satisfied_by(&1));
        assert_eq!(spec.errors().len(), 1);

        assert!(spec.is_satisfied_by(&6));
        assert!(spec.errors().is_empty());
    }

    #[test]
    fn test_no_evaluation_yet() {
        assert!(gt(5).errors().is_empty());
    }

    #[test]
    fn test_evaluate_is_stateless() {
        let spec = gt(5);

        let evaluation = spec.evaluate(&3);
        assert!(!evaluation.satisfied);
        assert_eq!(evaluation.errors.len(), 1);
        assert!(spec.errors().is_empty());
    }

    #[test]
    fn test_candidate_suffix_toggle() {
        let spec = gt(5).include_candidate_in_error(false);

        assert_eq!(spec.explain_failure(&3), "GreaterThan: Value greater than 5");
    }

    #[test]
    fn test_not_reports_inner_description() {
        let spec = gt(5).not();

        assert!(spec.is_satisfied_by(&3));
        assert!(spec.errors().is_empty());

        assert!(!spec.is_satisfied_by(&7));
        assert_eq!(
            spec.errors().get("not"),
            Some("Expected to NOT satisfy: Value greater than 5 (got: 7)")
        );
        assert_eq!(spec.description(), "NOT(Value greater than 5)");
    }

    #[test]
    fn test_path_keys_disambiguate_same_rule() {
        let spec = gt(5).or(gt(10));

        assert!(!spec.is_satisfied_by(&3));
        let errors = spec.errors();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["or[0]/GreaterThan", "or[1]/GreaterThan"]);
        assert_eq!(errors.get("or[1]/GreaterThan"), Some("Value greater than 10 (got: 3)"));
    }

    #[test]
    fn test_explain_and_raise_agree() {
        let combo = gt(5).and(gt(10).not());

        let explanation = combo.explain_failure(&12);
        assert_eq!(
            explanation,
            "and[1]/not: Expected to NOT satisfy: Value greater than 10 (got: 12)"
        );

        let err = combo.validate_or_raise(&12).unwrap_err();
        assert_eq!(err.explanation(), Some(explanation.as_str()));
        assert!(combo.validate_or_raise(&7).is_ok());
    }

    #[test]
    fn test_validate_or_else_custom_error() {
        #[derive(Debug, PartialEq)]
        struct Rejected(String);

        let spec = gt(5);
        assert_eq!(
            spec.validate_or_else(&1, Rejected),
            Err(Rejected("GreaterThan: Value greater than 5 (got: 1)".to_string()))
        );
        assert_eq!(spec.validate_or_else(&9, Rejected), Ok(()));
    }

    #[test]
    fn test_display_and_shape() {
        let spec = gt(5).and(gt(10).not());

        assert_eq!(
            spec.to_string(),
            "<And: (Value greater than 5 AND NOT(Value greater than 10))>"
        );
        assert_eq!(gt(5).to_string(), "<GreaterThan: Value greater than 5>");
        assert_eq!(spec.depth(), 3);
        assert_eq!(spec.leaf_count(), 2);
    }

    #[test]
    fn test_closure_leaf_on_unsized_candidate() {
        let spec: Spec<str> = Spec::from_fn("NonBlank", "Non-empty string", |s: &str| {
            !s.trim().is_empty()
        });

        assert!(spec.is_satisfied_by("abc"));
        assert!(!spec.is_satisfied_by("   "));
        assert_eq!(spec.errors().get("NonBlank"), Some("Non-empty string"));
    }

    struct Order {
        total: i64,
    }

    #[test]
    fn test_candidate_without_debug() {
        let spec = Spec::leaf_opaque(rule_fn("Positive", "Positive total", |o: &Order| {
            o.total > 0
        }))
        .and(Spec::leaf_opaque(rule_fn("Small", "Total under 100", |o: &Order| {
            o.total < 100
        })));

        assert!(spec.is_satisfied_by(&Order { total: 3 }));
        assert!(!spec.is_satisfied_by(&Order { total: -3 }));
        assert_eq!(spec.explain_failure(&Order { total: -3 }), "and[0]/Positive: Positive total");
        assert!(spec.validate_or_raise(&Order { total: 500 }).is_err());
    }

    #[test]
    fn test_custom_candidate_format() {
        let spec = Spec::leaf_opaque(rule_fn("Positive", "Positive total", |o: &Order| {
            o.total > 0
        }))
        .with_candidate_format(|o: &Order| format!("order of {}", o.total));

        assert_eq!(
            spec.explain_failure(&Order { total: -3 }),
            "Positive: Positive total (got: order of -3)"
        );
    }

    #[test]
    fn test_as_predicate_filters() {
        let spec = gt(5).and(gt(10).not());

        let kept: Vec<i64> = [3, 6, 10, 12].into_iter().filter(|c| spec.as_predicate()(c)).collect();
        assert_eq!(kept, vec![6, 10]);
        assert!(spec.errors().is_empty());
    }

    #[test]
    fn test_slash_in_rule_name_is_escaped() {
        let spec = gt(5).and(Spec::from_fn("and[1]/GreaterThan", "Tricky", |_: &i64| false));

        assert!(!spec.is_satisfied_by(&7));
        assert_eq!(
            spec.errors().keys().collect::<Vec<_>>(),
            vec!["and[1]/and[1]\\/GreaterThan"]
        );
    }

    #[test]
    fn test_spec_is_send_and_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Spec<i64>>();
        assert_send_sync::<Spec<str>>();
    }
}
