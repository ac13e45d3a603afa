//! `ProductType` (`User-Agent`/`Server`).

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductType {
    pub name: String,
    pub version: Option<String>,
}

impl ProductType {
    #[must_use]
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self { name: name.into(), version }
    }

    /// Parses a single `product/version` token (not the whole
    /// space-separated `product *( RWS ( product / comment ) )` sequence;
    /// callers scanning a full header value split on whitespace first,
    /// skipping parenthesized comments).
    pub fn parse(text: &str) -> NetResult<Self> {
        let text = text.trim();
        if text.is_empty() || text.starts_with('(') {
            return Err(ParseErrorKind::HeaderValue("product").into());
        }
        Ok(match text.split_once('/') {
            Some((name, version)) => Self {
                name: name.to_string(),
                version: Some(version.to_string()),
            },
            None => Self {
                name: text.to_string(),
                version: None,
            },
        })
    }

    /// Parses a full `User-Agent`/`Server` value into its product tokens,
    /// dropping parenthesized comments.
    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        let mut out = Vec::new();
        let mut depth = 0usize;
        for token in text.split_whitespace() {
            if token.starts_with('(') {
                depth += token.matches('(').count();
            }
            if depth == 0 {
                out.push(Self::parse(token)?);
            }
            if depth > 0 {
                depth = depth.saturating_sub(token.matches(')').count());
            }
        }
        Ok(out)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(version) = &self.version {
            write!(f, "/{version}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_parses_name_and_version() {
        let p = ProductType::parse("curl/8.4.0").unwrap();
        assert_eq!(p.name, "curl");
        assert_eq!(p.version.as_deref(), Some("8.4.0"));
    }

    #[test]
    fn product_parse_all_skips_comments() {
        let products = ProductType::parse_all("curl/8.4.0 (x86_64-pc-linux-gnu) libcurl/8.4.0").unwrap();
        assert_eq!(products.len(), 2);
    }
}
