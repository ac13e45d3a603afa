//! `MediaType` and `MediaRange`.

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::{parse_qvalue, quote_if_needed, split_params};
use crate::values::DEFAULT_WEIGHT;

#[derive(Clone, Debug, PartialEq)]
pub struct MediaType {
    pub type_: String,
    pub subtype: String,
    pub params: Vec<(String, String)>,
}

impl MediaType {
    pub fn parse(text: &str) -> NetResult<Self> {
        let (head, params) = split_params(text)?;
        let (type_, subtype) = head
            .split_once('/')
            .ok_or(ParseErrorKind::HeaderValue("media-type"))?;
        if type_.is_empty() || subtype.is_empty() {
            return Err(ParseErrorKind::HeaderValue("media-type").into());
        }
        Ok(Self {
            type_: type_.trim().to_ascii_lowercase(),
            subtype: subtype.trim().to_ascii_lowercase(),
            params: params
                .into_iter()
                .filter_map(|p| p.value.map(|v| (p.name.to_ascii_lowercase(), v)))
                .collect(),
        })
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `charset` parameter, or `None` when absent (callers default to
    /// UTF-8 per spec.md §4.5).
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.params {
            write!(f, "; {name}={}", quote_if_needed(value))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaRange {
    pub type_: String,
    pub subtype: String,
    pub weight: f32,
    pub params: Vec<(String, String)>,
}

impl MediaRange {
    pub fn parse(text: &str) -> NetResult<Self> {
        let (head, params) = split_params(text)?;
        let (type_, subtype) = head
            .split_once('/')
            .ok_or(ParseErrorKind::HeaderValue("media-range"))?;
        if type_.is_empty() || subtype.is_empty() {
            return Err(ParseErrorKind::HeaderValue("media-range").into());
        }

        let mut weight = DEFAULT_WEIGHT;
        let mut rest = Vec::new();
        for p in params {
            if p.name.eq_ignore_ascii_case("q") {
                if let Some(v) = &p.value {
                    weight = parse_qvalue(v)?;
                }
            } else if let Some(v) = p.value {
                rest.push((p.name.to_ascii_lowercase(), v));
            }
        }

        Ok(Self {
            type_: type_.trim().to_ascii_lowercase(),
            subtype: subtype.trim().to_ascii_lowercase(),
            weight,
            params: rest,
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        crate::grammar::split_list(text)
            .iter()
            .map(|s| Self::parse(s))
            .collect()
    }

    /// Whether this range matches `media_type`, ignoring quality.
    #[must_use]
    pub fn matches(&self, media_type: &MediaType) -> bool {
        (self.type_ == "*" || self.type_ == media_type.type_)
            && (self.subtype == "*" || self.subtype == media_type.subtype)
    }
}

impl fmt::Display for MediaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.params {
            write!(f, "; {name}={}", quote_if_needed(value))?;
        }
        if (self.weight - DEFAULT_WEIGHT).abs() > f32::EPSILON {
            write!(f, "; q={}", format_weight(self.weight))?;
        }
        Ok(())
    }
}

pub(crate) fn format_weight(weight: f32) -> String {
    let rounded = (weight * 1000.0).round() / 1000.0;
    let mut s = format!("{rounded:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_round_trips_with_charset() {
        let mt = MediaType::parse("text/plain; charset=UTF-8").unwrap();
        assert_eq!(mt.type_, "text");
        assert_eq!(mt.subtype, "plain");
        assert_eq!(mt.charset(), Some("UTF-8"));
        assert_eq!(mt.to_string(), "text/plain; charset=UTF-8");
    }

    #[test]
    fn media_type_rejects_missing_slash() {
        assert!(MediaType::parse("textplain").is_err());
    }

    #[test]
    fn media_range_default_weight_is_one() {
        let mr = MediaRange::parse("text/html").unwrap();
        assert!((mr.weight - 1.0).abs() < f32::EPSILON);
        assert_eq!(mr.to_string(), "text/html");
    }

    #[test]
    fn media_range_strips_q_param_and_matches_ignores_quality() {
        let mr = MediaRange::parse("text/*; q=0.5").unwrap();
        assert!((mr.weight - 0.5).abs() < f32::EPSILON);
        assert!(mr.params.is_empty());
        let mt = MediaType::parse("text/plain").unwrap();
        assert!(mr.matches(&mt));
    }

    #[test]
    fn media_range_parse_all_splits_comma_list() {
        let ranges = MediaRange::parse_all("text/html, application/json; q=0.8").unwrap();
        assert_eq!(ranges.len(), 2);
    }
}
