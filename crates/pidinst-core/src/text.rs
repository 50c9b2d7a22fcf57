//! Validated string primitives
//!
//! Names and identifier values are stored as newtypes that can only be
//! built through a fallible constructor, so an entity never holds an
//! unchecked string.

use crate::error::{PidInstError, Result};
use serde::Serialize;
use std::fmt;

/// Exclusive upper bound on the length (in characters) of names and
/// instrument/related identifier values.
pub const MAX_TEXT_LEN: usize = 200;

/// Non-empty string shorter than [`MAX_TEXT_LEN`] characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoundedText(String);

impl BoundedText {
    /// Validate `value` for the attribute labelled `field`.
    pub fn parse(field: &str, value: impl Into<String>) -> Result<Self> {
        let value = NonEmptyText::parse(field, value)?.into_inner();
        if value.chars().count() >= MAX_TEXT_LEN {
            return Err(PidInstError::OutOfRange {
                field: field.to_string(),
                max: MAX_TEXT_LEN,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Non-empty string with no length ceiling.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Validate `value` for the attribute labelled `field`.
    pub fn parse(field: &str, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(PidInstError::EmptyValue {
                field: field.to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for BoundedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoundedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(100)]
    #[case(199)]
    fn bounded_accepts_below_limit(#[case] len: usize) {
        let text = BoundedText::parse("name", "a".repeat(len)).unwrap();
        assert_eq!(text.as_str().len(), len);
    }

    #[rstest]
    #[case(200)]
    #[case(201)]
    #[case(1000)]
    fn bounded_rejects_at_or_above_limit(#[case] len: usize) {
        let err = BoundedText::parse("name", "a".repeat(len)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.to_string(), "name must be less than 200 chars");
    }

    #[test]
    fn bounded_counts_characters_not_bytes() {
        // 199 two-byte characters are still under the limit
        let text = "é".repeat(199);
        assert!(BoundedText::parse("name", text).is_ok());
    }

    #[test]
    fn empty_is_rejected() {
        let err = BoundedText::parse("name", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyValue);
        let err = NonEmptyText::parse("value", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyValue);
    }

    #[test]
    fn non_empty_has_no_ceiling() {
        let long = "x".repeat(5000);
        let text = NonEmptyText::parse("value", long.clone()).unwrap();
        assert_eq!(text.into_inner(), long);
    }
}
