//! Type definitions shared across the specification tree

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a binary composite visits its children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Stop as soon as the outcome is known; the right child may never run
    #[default]
    ShortCircuit,
    /// Always evaluate both children
    Exhaustive,
}

/// A single failing rule within an evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path-qualified identity of the rule that failed
    pub key: String,
    /// Human-readable explanation
    pub message: String,
}

/// Failure messages keyed by rule identity, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorReport {
    violations: IndexMap<String, String>,
}

impl ErrorReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. An existing key keeps its position and takes the new message.
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.violations.insert(key.into(), message.into());
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: ErrorReport) {
        self.violations.extend(other.violations);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.violations.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.violations.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.violations.keys().map(String::as_str)
    }

    /// `(key, message)` pairs in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.violations
            .iter()
            .map(|(key, message)| (key.as_str(), message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Copy into a sorted map, losing evaluation order
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.violations
            .iter()
            .map(|(key, message)| (key.clone(), message.clone()))
            .collect()
    }

    /// Serialize as a JSON array of `{key, message}` objects
    pub fn to_json(&self) -> Result<String> {
        let violations: Vec<Violation> = self.clone().into_iter().collect();
        Ok(serde_json::to_string(&violations)?)
    }

    /// One `key: message` line per violation
    pub fn explain(&self) -> String {
        self.violations
            .iter()
            .map(|(key, message)| format!("{}: {}", key, message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl IntoIterator for ErrorReport {
    type Item = Violation;
    type IntoIter = std::iter::Map<
        indexmap::map::IntoIter<String, String>,
        fn((String, String)) -> Violation,
    >;

    fn into_iter(self) -> Self::IntoIter {
        let to_violation: fn((String, String)) -> Violation =
            |(key, message)| Violation { key, message };
        self.violations.into_iter().map(to_violation)
    }
}

/// Outcome of evaluating one candidate against a specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the candidate satisfied the specification
    pub satisfied: bool,
    /// Failures behind a negative verdict; empty when satisfied
    pub errors: ErrorReport,
}

impl Evaluation {
    pub fn pass() -> Self {
        Self {
            satisfied: true,
            errors: ErrorReport::new(),
        }
    }

    pub fn fail(errors: ErrorReport) -> Self {
        Self {
            satisfied: false,
            errors,
        }
    }

    /// Joined failure text, empty when the candidate passed
    pub fn explain(&self) -> String {
        if self.satisfied {
            String::new()
        } else {
            self.errors.explain()
        }
    }
}
