//! Sieve Rules
//!
//! Ready-made leaf rules for sieve specifications: numeric comparisons,
//! string checks, and an evaluation counter for observing which branches
//! of a tree actually ran.

pub mod counted;
pub mod numeric;
pub mod text;

pub use counted::{CallCounter, Counted};
pub use numeric::{AtLeast, AtMost, Between, EqualTo, GreaterThan, LessThan};
pub use text::{Matches, MaxLength, MinLength, NonEmptyString};
