//! `Protocol` (`Upgrade`).

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::split_list;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Protocol {
    pub name: String,
    pub version: Option<String>,
}

impl Protocol {
    pub fn parse(text: &str) -> NetResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseErrorKind::HeaderValue("protocol").into());
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

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        split_list(text).iter().map(|s| Self::parse(s)).collect()
    }

    #[must_use]
    pub fn is_websocket(&self) -> bool {
        self.name.eq_ignore_ascii_case("websocket")
    }
}

impl fmt::Display for Protocol {
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
    fn protocol_recognizes_websocket() {
        let p = Protocol::parse("websocket").unwrap();
        assert!(p.is_websocket());
    }

    #[test]
    fn protocol_parses_version() {
        let p = Protocol::parse("HTTP/2.0").unwrap();
        assert_eq!(p.version.as_deref(), Some("2.0"));
    }
}
