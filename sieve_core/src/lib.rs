//! Sieve Core
//!
//! Composable specifications for typed candidates.
//! Leaf rules are combined with AND, OR and NOT into a tree that is
//! evaluated depth-first, producing a verdict together with a structured,
//! path-keyed report of every rule that rejected the candidate.

pub mod compose;
pub mod config;
pub mod error;
pub mod rule;
pub mod spec;
pub mod types;

pub use compose::{all_of, any_of};
pub use config::Settings;
pub use error::{Result, SieveError};
pub use rule::{rule_fn, FnRule, Rule};
pub use spec::{CandidateFormat, Spec};
pub use types::{ErrorReport, Evaluation, Policy, Violation};
