//! `LinkType` (`Link`).

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::{quote_if_needed, split_list, split_params};

#[derive(Clone, Debug, PartialEq)]
pub struct LinkType {
    pub uri: String,
    pub params: Vec<(String, String)>,
}

impl LinkType {
    pub fn parse(text: &str) -> NetResult<Self> {
        let (head, params) = split_params(text)?;
        let uri = head
            .trim()
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .ok_or(ParseErrorKind::HeaderValue("link"))?;
        Ok(Self {
            uri: uri.to_string(),
            params: params
                .into_iter()
                .filter_map(|p| p.value.map(|v| (p.name.to_ascii_lowercase(), v)))
                .collect(),
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        split_list(text).iter().map(|s| Self::parse(s)).collect()
    }

    #[must_use]
    pub fn rel(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == "rel")
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.uri)?;
        for (k, v) in &self.params {
            write!(f, "; {k}={}", quote_if_needed(v))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_parses_uri_and_rel() {
        let l = LinkType::parse(r#"</page2>; rel="next""#).unwrap();
        assert_eq!(l.uri, "/page2");
        assert_eq!(l.rel(), Some("next"));
    }
}
