//! `WarningType` (`Warning`).

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::{parse_http_date_str, split_list};

#[derive(Clone, Debug, PartialEq)]
pub struct WarningType {
    pub code: u16,
    pub agent: String,
    pub text: String,
    pub date: Option<std::time::SystemTime>,
}

impl WarningType {
    /// Parses `code agent "text" [date]`.
    pub fn parse(text: &str) -> NetResult<Self> {
        let text = text.trim();
        let mut parts = text.splitn(3, ' ');
        let code: u16 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(ParseErrorKind::HeaderValue("warning"))?;
        let agent = parts
            .next()
            .ok_or(ParseErrorKind::HeaderValue("warning"))?
            .to_string();
        let rest = parts.next().ok_or(ParseErrorKind::HeaderValue("warning"))?;

        let rest = rest.trim();
        let after_quote = rest
            .strip_prefix('"')
            .ok_or(ParseErrorKind::HeaderValue("warning"))?;
        let end = after_quote
            .find('"')
            .ok_or(ParseErrorKind::HeaderValue("warning"))?;
        let warn_text = after_quote[..end].to_string();
        let remainder = after_quote[end + 1..].trim();

        let date = if remainder.is_empty() {
            None
        } else {
            let stripped = remainder.trim_matches('"');
            Some(parse_http_date_str(stripped)?)
        };

        Ok(Self {
            code,
            agent,
            text: warn_text,
            date,
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        split_list(text).iter().map(|s| Self::parse(s)).collect()
    }
}

impl fmt::Display for WarningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.code, self.agent, self.text)?;
        if let Some(date) = self.date {
            write!(f, " \"{}\"", crate::grammar::format_http_date(date))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_parses_without_date() {
        let w = WarningType::parse(r#"110 anderson/1.3.37 "Response is stale""#).unwrap();
        assert_eq!(w.code, 110);
        assert_eq!(w.agent, "anderson/1.3.37");
        assert_eq!(w.text, "Response is stale");
        assert!(w.date.is_none());
    }
}
