//! `EntityTag` (`ETag`, `If-Match`, `If-None-Match`).

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::parse_quoted_string;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityTag {
    pub opaque: String,
    pub weak: bool,
}

impl EntityTag {
    #[must_use]
    pub fn strong(opaque: impl Into<String>) -> Self {
        Self {
            opaque: opaque.into(),
            weak: false,
        }
    }

    #[must_use]
    pub fn weak(opaque: impl Into<String>) -> Self {
        Self {
            opaque: opaque.into(),
            weak: true,
        }
    }

    pub fn parse(text: &str) -> NetResult<Self> {
        let text = text.trim();
        let (weak, quoted) = text.strip_prefix("W/").map_or((false, text), |rest| (true, rest));
        let opaque = parse_quoted_string(quoted).map_err(|_| ParseErrorKind::HeaderValue("entity-tag"))?;
        Ok(Self { opaque, weak })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        crate::grammar::split_list(text)
            .iter()
            .map(|s| Self::parse(s))
            .collect()
    }

    /// Strong comparison: equal opaque tags, neither weak.
    #[must_use]
    pub fn strong_matches(&self, other: &Self) -> bool {
        !self.weak && !other.weak && self.opaque == other.opaque
    }

    /// Weak comparison: equal opaque tags, either may be weak.
    #[must_use]
    pub fn weak_matches(&self, other: &Self) -> bool {
        self.opaque == other.opaque
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weak {
            f.write_str("W/")?;
        }
        write!(f, "\"{}\"", self.opaque)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_tag_round_trips() {
        let tag = EntityTag::parse("\"abc\"").unwrap();
        assert!(!tag.weak);
        assert_eq!(tag.to_string(), "\"abc\"");
    }

    #[test]
    fn weak_tag_parses_prefix() {
        let tag = EntityTag::parse("W/\"abc\"").unwrap();
        assert!(tag.weak);
        assert_eq!(tag.to_string(), "W/\"abc\"");
    }

    #[test]
    fn weak_comparison_ignores_weakness() {
        let a = EntityTag::weak("x");
        let b = EntityTag::strong("x");
        assert!(a.weak_matches(&b));
        assert!(!a.strong_matches(&b));
    }
}
