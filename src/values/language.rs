//! `LanguageTag`/`LanguageRange`.

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::{parse_qvalue, split_params};
use crate::values::media::format_weight;
use crate::values::DEFAULT_WEIGHT;

/// A BCP 47 language tag, stored as its dash-separated subtags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageTag {
    pub subtags: Vec<String>,
}

impl LanguageTag {
    pub fn parse(text: &str) -> NetResult<Self> {
        let subtags: Vec<String> = text.split('-').map(str::to_ascii_lowercase).collect();
        if subtags.is_empty() || subtags.iter().any(String::is_empty) {
            return Err(ParseErrorKind::HeaderValue("language-tag").into());
        }
        Ok(Self { subtags })
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subtags.join("-"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LanguageRange {
    pub range: String,
    pub weight: f32,
}

impl LanguageRange {
    pub fn parse(text: &str) -> NetResult<Self> {
        let (head, params) = split_params(text)?;
        let mut weight = DEFAULT_WEIGHT;
        for p in params {
            if p.name.eq_ignore_ascii_case("q") {
                if let Some(v) = p.value {
                    weight = parse_qvalue(&v)?;
                }
            }
        }
        Ok(Self {
            range: head.to_ascii_lowercase(),
            weight,
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        crate::grammar::split_list(text)
            .iter()
            .map(|s| Self::parse(s))
            .collect()
    }

    /// Whether `tag` matches this range, ignoring quality. `*` matches
    /// anything; a range without a subtag (`en`) matches `en` and `en-*`.
    #[must_use]
    pub fn matches(&self, tag: &LanguageTag) -> bool {
        if self.range == "*" {
            return true;
        }
        let range_subtags: Vec<&str> = self.range.split('-').collect();
        if range_subtags.len() > tag.subtags.len() {
            return false;
        }
        range_subtags
            .iter()
            .zip(tag.subtags.iter())
            .all(|(r, t)| r.eq_ignore_ascii_case(t))
    }
}

impl fmt::Display for LanguageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.range)?;
        if (self.weight - DEFAULT_WEIGHT).abs() > f32::EPSILON {
            write!(f, ";q={}", format_weight(self.weight))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_range_matches_prefix() {
        let range = LanguageRange::parse("en").unwrap();
        let tag = LanguageTag::parse("en-US").unwrap();
        assert!(range.matches(&tag));
    }

    #[test]
    fn language_range_wildcard_matches_all() {
        let range = LanguageRange::parse("*").unwrap();
        let tag = LanguageTag::parse("fr").unwrap();
        assert!(range.matches(&tag));
    }

    #[test]
    fn language_tag_rejects_empty_subtag() {
        assert!(LanguageTag::parse("en--US").is_err());
    }
}
