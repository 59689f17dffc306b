//! Comparisons against fixed bounds

use sieve_core::{Rule, Spec};
use std::fmt;

/// Candidate strictly greater than a threshold
#[derive(Debug, Clone, PartialEq)]
pub struct GreaterThan<V> {
    pub threshold: V,
}

impl<V> GreaterThan<V> {
    pub fn new(threshold: V) -> Self {
        Self { threshold }
    }
}

impl<V> Rule<V> for GreaterThan<V>
where
    V: PartialOrd + fmt::Display + Send + Sync,
{
    fn check(&self, candidate: &V) -> bool {
        *candidate > self.threshold
    }

    fn description(&self) -> String {
        format!("Value greater than {}", self.threshold)
    }
}

/// Candidate strictly less than a threshold
#[derive(Debug, Clone, PartialEq)]
pub struct LessThan<V> {
    pub threshold: V,
}

impl<V> LessThan<V> {
    pub fn new(threshold: V) -> Self {
        Self { threshold }
    }
}

impl<V> Rule<V> for LessThan<V>
where
    V: PartialOrd + fmt::Display + Send + Sync,
{
    fn check(&self, candidate: &V) -> bool {
        *candidate < self.threshold
    }

    fn description(&self) -> String {
        format!("Value less than {}", self.threshold)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtLeast<V> {
    pub minimum: V,
}

impl<V> AtLeast<V> {
    pub fn new(minimum: V) -> Self {
        Self { minimum }
    }
}

impl<V> Rule<V> for AtLeast<V>
where
    V: PartialOrd + fmt::Display + Send + Sync,
{
    fn check(&self, candidate: &V) -> bool {
        *candidate >= self.minimum
    }

    fn description(&self) -> String {
        format!("Value at least {}", self.minimum)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtMost<V> {
    pub maximum: V,
}

impl<V> AtMost<V> {
    pub fn new(maximum: V) -> Self {
        Self { maximum }
    }
}

impl<V> Rule<V> for AtMost<V>
where
    V: PartialOrd + fmt::Display + Send + Sync,
{
    fn check(&self, candidate: &V) -> bool {
        *candidate <= self.maximum
    }

    fn description(&self) -> String {
        format!("Value at most {}", self.maximum)
    }
}

/// Candidate within `[min, max]`, both ends inclusive
#[derive(Debug, Clone, PartialEq)]
pub struct Between<V> {
    pub min: V,
    pub max: V,
}

impl<V> Between<V> {
    pub fn new(min: V, max: V) -> Self {
        Self { min, max }
    }
}

impl<V> Rule<V> for Between<V>
where
    V: PartialOrd + fmt::Display + Send + Sync,
{
    fn check(&self, candidate: &V) -> bool {
        *candidate >= self.min && *candidate <= self.max
    }

    fn description(&self) -> String {
        format!("Value between {} and {}", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EqualTo<V> {
    pub expected: V,
}

impl<V> EqualTo<V> {
    pub fn new(expected: V) -> Self {
        Self { expected }
    }
}

impl<V> Rule<V> for EqualTo<V>
where
    V: PartialEq + fmt::Display + Send + Sync,
{
    fn check(&self, candidate: &V) -> bool {
        *candidate == self.expected
    }

    fn description(&self) -> String {
        format!("Value equal to {}", self.expected)
    }
}

/// Leaf spec for [`GreaterThan`]
pub fn greater_than<V>(threshold: V) -> Spec<V>
where
    V: PartialOrd + fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    Spec::leaf(GreaterThan::new(threshold))
}

/// Leaf spec for [`LessThan`]
pub fn less_than<V>(threshold: V) -> Spec<V>
where
    V: PartialOrd + fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    Spec::leaf(LessThan::new(threshold))
}
