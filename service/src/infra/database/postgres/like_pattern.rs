//! [`LikePattern`] definition.

use derive_more::{AsRef, Display};
use postgres_types::ToSql;

/// SQL `LIKE` pattern matching its input literally.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, ToSql)]
#[as_ref(str)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] matching values containing the provided
    /// `needle`.
    ///
    /// `LIKE` wildcards of the `needle` are escaped with the default `\`
    /// escape character.
    #[must_use]
    pub fn contains(needle: &str) -> Self {
        let mut pattern = String::with_capacity(needle.len() + 2);
        pattern.push('%');
        for c in needle.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Self(pattern)
    }
}

#[cfg(test)]
mod spec {
    use super::LikePattern;

    #[test]
    fn wraps_plain_text() {
        assert_eq!(LikePattern::contains("isrc-123").to_string(), "%isrc-123%");
        assert_eq!(LikePattern::contains("").to_string(), "%%");
    }

    #[test]
    fn escapes_wildcards() {
        assert_eq!(LikePattern::contains("100%").to_string(), r"%100\%%");
        assert_eq!(LikePattern::contains("a_b").to_string(), r"%a\_b%");
        assert_eq!(LikePattern::contains(r"c:\d").to_string(), r"%c:\\d%");
    }
}
