//! `CacheDirective` (`Cache-Control`) and `PragmaDirective` (`Pragma`).

use std::fmt;

use crate::errors::NetResult;
use crate::grammar::{quote_if_needed, split_list};

/// `name=value` or bare `name`; unknown tokens are preserved verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheDirective {
    pub name: String,
    pub value: Option<String>,
}

impl CacheDirective {
    pub fn parse(text: &str) -> NetResult<Self> {
        Ok(match text.split_once('=') {
            Some((name, value)) => Self {
                name: name.trim().to_ascii_lowercase(),
                value: Some(value.trim().trim_matches('"').to_string()),
            },
            None => Self {
                name: text.trim().to_ascii_lowercase(),
                value: None,
            },
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        split_list(text).iter().map(|s| Self::parse(s)).collect()
    }

    #[must_use]
    pub fn max_age(directives: &[Self]) -> Option<u64> {
        directives
            .iter()
            .find(|d| d.name == "max-age")
            .and_then(|d| d.value.as_ref())
            .and_then(|v| v.parse().ok())
    }

    #[must_use]
    pub fn has(directives: &[Self], name: &str) -> bool {
        directives.iter().any(|d| d.name == name)
    }
}

impl fmt::Display for CacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(value) = &self.value {
            write!(f, "={}", quote_if_needed(value))?;
        }
        Ok(())
    }
}

/// `Pragma` directive; in practice almost always the single `no-cache`
/// token, but the grammar is the same `name[=value]` shape as `Cache-Control`.
pub type PragmaDirective = CacheDirective;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_directive_parses_value_and_bare() {
        let directives = CacheDirective::parse_all("no-cache, max-age=3600, private").unwrap();
        assert_eq!(directives.len(), 3);
        assert_eq!(CacheDirective::max_age(&directives), Some(3600));
        assert!(CacheDirective::has(&directives, "no-cache"));
    }

    #[test]
    fn cache_directive_round_trips() {
        let d = CacheDirective::parse("max-age=60").unwrap();
        assert_eq!(d.to_string(), "max-age=60");
    }
}
