//! `ByteRange` (`Range`) and `ByteContentRange` (`Content-Range`).

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteRangeSpec {
    pub first: Option<u64>,
    pub last: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteRange {
    pub ranges: Vec<ByteRangeSpec>,
}

impl ByteRange {
    /// Parses a `Range: bytes=first-last, -suffix, first-` header value.
    pub fn parse(text: &str) -> NetResult<Self> {
        let rest = text
            .trim()
            .strip_prefix("bytes=")
            .ok_or(ParseErrorKind::HeaderValue("byte-range"))?;

        let ranges = rest
            .split(',')
            .map(str::trim)
            .map(|spec| {
                let (first_str, last_str) = spec
                    .split_once('-')
                    .ok_or(ParseErrorKind::HeaderValue("byte-range"))?;
                let first = if first_str.is_empty() {
                    None
                } else {
                    Some(first_str.parse().map_err(|_| ParseErrorKind::HeaderValue("byte-range"))?)
                };
                let last = if last_str.is_empty() {
                    None
                } else {
                    Some(last_str.parse().map_err(|_| ParseErrorKind::HeaderValue("byte-range"))?)
                };
                if first.is_none() && last.is_none() {
                    return Err(ParseErrorKind::HeaderValue("byte-range").into());
                }
                Ok(ByteRangeSpec { first, last })
            })
            .collect::<NetResult<Vec<_>>>()?;

        if ranges.is_empty() {
            return Err(ParseErrorKind::HeaderValue("byte-range").into());
        }

        Ok(Self { ranges })
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("bytes=")?;
        for (i, spec) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match (spec.first, spec.last) {
                (Some(first), Some(last)) => write!(f, "{first}-{last}")?,
                (Some(first), None) => write!(f, "{first}-")?,
                (None, Some(last)) => write!(f, "-{last}")?,
                (None, None) => unreachable!("parse rejects empty specs"),
            }
        }
        Ok(())
    }
}

/// `bytes first-last/(len|*)` or `bytes */len`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ByteContentRange {
    Range { first: u64, last: u64, complete_length: Option<u64> },
    Unsatisfied { complete_length: u64 },
}

impl ByteContentRange {
    pub fn parse(text: &str) -> NetResult<Self> {
        let rest = text
            .trim()
            .strip_prefix("bytes ")
            .ok_or(ParseErrorKind::HeaderValue("content-range"))?;

        if let Some(len) = rest.strip_prefix("*/") {
            let complete_length = len
                .parse()
                .map_err(|_| ParseErrorKind::HeaderValue("content-range"))?;
            return Ok(Self::Unsatisfied { complete_length });
        }

        let (range_part, len_part) = rest
            .split_once('/')
            .ok_or(ParseErrorKind::HeaderValue("content-range"))?;
        let (first_str, last_str) = range_part
            .split_once('-')
            .ok_or(ParseErrorKind::HeaderValue("content-range"))?;
        let first: u64 = first_str.parse().map_err(|_| ParseErrorKind::HeaderValue("content-range"))?;
        let last: u64 = last_str.parse().map_err(|_| ParseErrorKind::HeaderValue("content-range"))?;
        let complete_length = if len_part == "*" {
            None
        } else {
            Some(len_part.parse().map_err(|_| ParseErrorKind::HeaderValue("content-range"))?)
        };

        Ok(Self::Range { first, last, complete_length })
    }
}

impl fmt::Display for ByteContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { first, last, complete_length } => {
                write!(f, "bytes {first}-{last}/")?;
                match complete_length {
                    Some(len) => write!(f, "{len}"),
                    None => write!(f, "*"),
                }
            }
            Self::Unsatisfied { complete_length } => write!(f, "bytes */{complete_length}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_range_parses_multiple_specs() {
        let r = ByteRange::parse("bytes=0-499, -500, 9500-").unwrap();
        assert_eq!(r.ranges.len(), 3);
        assert_eq!(r.ranges[0], ByteRangeSpec { first: Some(0), last: Some(499) });
        assert_eq!(r.ranges[1], ByteRangeSpec { first: None, last: Some(500) });
        assert_eq!(r.ranges[2], ByteRangeSpec { first: Some(9500), last: None });
    }

    #[test]
    fn byte_content_range_round_trips() {
        let r = ByteContentRange::parse("bytes 0-499/1234").unwrap();
        assert_eq!(r.to_string(), "bytes 0-499/1234");
        let u = ByteContentRange::parse("bytes */1234").unwrap();
        assert_eq!(u.to_string(), "bytes */1234");
    }
}
