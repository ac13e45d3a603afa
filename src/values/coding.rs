//! `ContentCoding`/`ContentCodingRange` and `TransferCoding`/`TransferCodingRange`.

use std::fmt;

use crate::errors::NetResult;
use crate::grammar::{parse_qvalue, split_params};
use crate::values::media::format_weight;
use crate::values::DEFAULT_WEIGHT;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentCoding {
    Identity,
    Gzip,
    Deflate,
    Compress,
    Br,
    Other(String),
}

impl ContentCoding {
    pub fn parse(text: &str) -> NetResult<Self> {
        Ok(match text.trim().to_ascii_lowercase().as_str() {
            "identity" => Self::Identity,
            "gzip" | "x-gzip" => Self::Gzip,
            "deflate" => Self::Deflate,
            "compress" | "x-compress" => Self::Compress,
            "br" => Self::Br,
            other => Self::Other(other.to_string()),
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        crate::grammar::split_list(text)
            .iter()
            .map(|s| Self::parse(s))
            .collect()
    }
}

impl fmt::Display for ContentCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Identity => "identity",
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::Compress => "compress",
            Self::Br => "br",
            Self::Other(s) => s,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContentCodingRange {
    pub coding: ContentCoding,
    pub weight: f32,
}

impl ContentCodingRange {
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
            coding: ContentCoding::parse(head)?,
            weight,
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        crate::grammar::split_list(text)
            .iter()
            .map(|s| Self::parse(s))
            .collect()
    }

    #[must_use]
    pub fn matches(&self, coding: &ContentCoding) -> bool {
        &self.coding == coding
    }
}

impl fmt::Display for ContentCodingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coding)?;
        if (self.weight - DEFAULT_WEIGHT).abs() > f32::EPSILON {
            write!(f, ";q={}", format_weight(self.weight))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferCoding {
    Chunked,
    Gzip,
    Deflate,
    Compress,
    Other(String, Vec<(String, String)>),
}

impl TransferCoding {
    pub fn parse(text: &str) -> NetResult<Self> {
        let (head, params) = split_params(text)?;
        Ok(match head.to_ascii_lowercase().as_str() {
            "chunked" => Self::Chunked,
            "gzip" => Self::Gzip,
            "deflate" => Self::Deflate,
            "compress" => Self::Compress,
            other => Self::Other(
                other.to_string(),
                params
                    .into_iter()
                    .filter_map(|p| p.value.map(|v| (p.name, v)))
                    .collect(),
            ),
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        crate::grammar::split_list(text)
            .iter()
            .map(|s| Self::parse(s))
            .collect()
    }

    #[must_use]
    pub fn is_chunked(&self) -> bool {
        matches!(self, Self::Chunked)
    }
}

impl fmt::Display for TransferCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunked => f.write_str("chunked"),
            Self::Gzip => f.write_str("gzip"),
            Self::Deflate => f.write_str("deflate"),
            Self::Compress => f.write_str("compress"),
            Self::Other(name, params) => {
                f.write_str(name)?;
                for (k, v) in params {
                    write!(f, ";{k}={v}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransferCodingRange {
    pub coding: TransferCoding,
    pub weight: f32,
    pub params: Vec<(String, String)>,
}

impl TransferCodingRange {
    pub fn parse(text: &str) -> NetResult<Self> {
        let (head, params) = split_params(text)?;
        let mut weight = DEFAULT_WEIGHT;
        let mut rest = Vec::new();
        for p in params {
            if p.name.eq_ignore_ascii_case("q") {
                if let Some(v) = &p.value {
                    weight = parse_qvalue(v)?;
                }
            } else if let Some(v) = p.value {
                rest.push((p.name, v));
            }
        }
        Ok(Self {
            coding: TransferCoding::parse(head)?,
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
}

impl fmt::Display for TransferCodingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coding)?;
        for (k, v) in &self.params {
            write!(f, ";{k}={v}")?;
        }
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
    fn content_coding_recognizes_known_names() {
        assert_eq!(ContentCoding::parse("gzip").unwrap(), ContentCoding::Gzip);
        assert_eq!(
            ContentCoding::parse("br-custom").unwrap(),
            ContentCoding::Other("br-custom".to_string())
        );
    }

    #[test]
    fn transfer_coding_parses_chunked() {
        assert!(TransferCoding::parse("chunked").unwrap().is_chunked());
    }

    #[test]
    fn content_coding_range_default_weight() {
        let r = ContentCodingRange::parse("gzip").unwrap();
        assert!((r.weight - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn transfer_coding_range_parses_list() {
        let ranges = TransferCodingRange::parse_all("gzip, chunked;q=0.5").unwrap();
        assert_eq!(ranges.len(), 2);
        assert!((ranges[1].weight - 0.5).abs() < f32::EPSILON);
    }
}
