//! Validation policy shared by every search entry point.
//!
//! A query is searchable when it is at least `min_length` characters long and
//! consists only of ASCII letters and spaces.

use std::fmt;

use serde::Serialize;

/// Minimum query length used when no explicit policy is configured.
pub const DEFAULT_MIN_LENGTH: usize = 3;

/// Reason a query was refused by [`SearchPolicy::check`].
///
/// A rejection is not an error: it maps to an idle gate with an optional hint
/// for the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// The query is the empty string.
    Empty,
    /// The query has fewer characters than the policy requires.
    TooShort { min_length: usize, actual: usize },
    /// The query contains something other than a letter or a space.
    DisallowedCharacter { found: char },
}

impl Rejection {
    /// Hint suitable for display next to the input.
    ///
    /// Empty input carries no hint so an untouched field stays quiet.
    pub fn hint(&self, min_length: usize) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::TooShort { .. } | Self::DisallowedCharacter { .. } => Some(format!(
                "Please enter at least {min_length} letters (no numbers or special characters)"
            )),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("query is empty"),
            Self::TooShort { min_length, actual } => {
                write!(f, "query has {actual} characters, at least {min_length} required")
            }
            Self::DisallowedCharacter { found } => {
                write!(f, "query contains disallowed character {found:?}")
            }
        }
    }
}

/// Pure predicate deciding whether a query may be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    min_length: usize,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH)
    }
}

impl SearchPolicy {
    #[must_use]
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Classify `query`, returning the first rule it breaks.
    ///
    /// Length is checked before the character set, so `"j1"` with a minimum
    /// of three reports [`Rejection::TooShort`].
    pub fn check(&self, query: &str) -> Result<(), Rejection> {
        if query.is_empty() {
            return Err(Rejection::Empty);
        }

        let actual = query.chars().count();
        if actual < self.min_length {
            return Err(Rejection::TooShort {
                min_length: self.min_length,
                actual,
            });
        }

        match query.chars().find(|ch| !is_allowed(*ch)) {
            Some(found) => Err(Rejection::DisallowedCharacter { found }),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn is_valid(&self, query: &str) -> bool {
        self.check(query).is_ok()
    }
}

fn is_allowed(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == ' '
}

/// Convenience wrapper over [`SearchPolicy::is_valid`].
#[must_use]
pub fn validate_search(query: &str, min_length: usize) -> bool {
    SearchPolicy::new(min_length).is_valid(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_letters_at_minimum_length() {
        assert!(validate_search("john", 3));
        assert!(validate_search("joe", 3));
        assert!(validate_search("John Smith", 3));
    }

    #[test]
    fn rejects_short_and_empty_queries() {
        let policy = SearchPolicy::new(3);
        assert_eq!(policy.check(""), Err(Rejection::Empty));
        assert_eq!(
            policy.check("jo"),
            Err(Rejection::TooShort {
                min_length: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn rejects_digits_and_punctuation() {
        let policy = SearchPolicy::new(3);
        assert_eq!(
            policy.check("john123"),
            Err(Rejection::DisallowedCharacter { found: '1' })
        );
        assert!(!policy.is_valid("o'brien"));
        assert!(!policy.is_valid("jane-doe"));
        assert!(!policy.is_valid("zoë"));
    }

    #[test]
    fn length_is_reported_before_character_set() {
        let policy = SearchPolicy::new(3);
        assert!(matches!(policy.check("j1"), Err(Rejection::TooShort { .. })));
    }

    #[test]
    fn empty_rejection_has_no_hint() {
        assert_eq!(Rejection::Empty.hint(3), None);
        let hint = Rejection::DisallowedCharacter { found: '#' }
            .hint(3)
            .expect("hint");
        assert!(hint.contains("at least 3 letters"));
    }
}
