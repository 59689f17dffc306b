//! String checks

use regex::Regex;
use sieve_core::{Result, Rule, SieveError};

/// Non-blank after trimming whitespace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonEmptyString;

impl Rule<str> for NonEmptyString {
    fn check(&self, candidate: &str) -> bool {
        !candidate.trim().is_empty()
    }

    fn description(&self) -> String {
        "Non-empty string".to_string()
    }
}

/// At least `min` characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLength(pub usize);

impl Rule<str> for MinLength {
    fn check(&self, candidate: &str) -> bool {
        candidate.chars().count() >= self.0
    }

    fn description(&self) -> String {
        format!("String of at least {} characters", self.0)
    }
}

/// At most `max` characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLength(pub usize);

impl Rule<str> for MaxLength {
    fn check(&self, candidate: &str) -> bool {
        candidate.chars().count() <= self.0
    }

    fn description(&self) -> String {
        format!("String of at most {} characters", self.0)
    }
}

/// Contains a match for a regular expression
#[derive(Debug, Clone)]
pub struct Matches {
    pattern: Regex,
}

impl Matches {
    /// Compile `pattern`; a malformed pattern is a caller error
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            SieveError::InvalidArgument(format!("Invalid pattern {}: {}", pattern, e))
        })?;
        Ok(Self { pattern })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Rule<str> for Matches {
    fn check(&self, candidate: &str) -> bool {
        self.pattern.is_match(candidate)
    }

    fn description(&self) -> String {
        format!("String matching /{}/", self.pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_core::Spec;

    #[test]
    fn test_non_empty_string() {
        assert!(NonEmptyString.check("a"));
        assert!(!NonEmptyString.check(""));
        assert!(!NonEmptyString.check(" \t\n"));
    }

    #[test]
    fn test_lengths_count_chars() {
        assert!(MinLength(3).check("héé"));
        assert!(!MinLength(4).check("héé"));
        assert!(MaxLength(3).check("héé"));
    }

    #[test]
    fn test_matches() {
        let email = Matches::new(r"^[^@\s]+@[^@\s]+$").unwrap();

        assert!(email.check("ada@example.com"));
        assert!(!email.check("not an email"));
        assert_eq!(email.description(), r"String matching /^[^@\s]+@[^@\s]+$/");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Matches::new("(unclosed").unwrap_err();
        assert!(matches!(err, SieveError::InvalidArgument(_)));
    }

    #[test]
    fn test_username_spec() {
        let username: Spec<str> = Spec::leaf(NonEmptyString)
            .and(Spec::leaf(MaxLength(8)))
            .and(Spec::leaf(Matches::new("^[a-z_]+$").unwrap()));

        assert!(username.is_satisfied_by("john_h"));
        assert!(!username.is_satisfied_by("rosalind_b"));
        assert_eq!(
            username.errors().keys().collect::<Vec<_>>(),
            vec!["and[0]/and[1]/MaxLength"]
        );
        assert!(!username.is_satisfied_by("John"));
        assert!(username.errors().contains_key("and[1]/Matches"));
    }
}
