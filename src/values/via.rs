//! `ViaType` (`Via`).

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::split_list;

#[derive(Clone, Debug, PartialEq)]
pub struct ViaType {
    pub protocol: Option<String>,
    pub version: String,
    pub received_by: String,
    pub comment: Option<String>,
}

impl ViaType {
    /// Parses `[protocol-name "/"] protocol-version received-by [comment]`.
    pub fn parse(text: &str) -> NetResult<Self> {
        let text = text.trim();
        let (head, comment) = match text.find('(') {
            Some(i) => {
                let c = text[i..].trim_start_matches('(').trim_end_matches(')');
                (text[..i].trim(), Some(c.to_string()))
            }
            None => (text, None),
        };

        let mut parts = head.split_whitespace();
        let proto_version = parts.next().ok_or(ParseErrorKind::HeaderValue("via"))?;
        let received_by = parts
            .next()
            .ok_or(ParseErrorKind::HeaderValue("via"))?
            .to_string();

        let (protocol, version) = match proto_version.split_once('/') {
            Some((p, v)) => (Some(p.to_string()), v.to_string()),
            None => (None, proto_version.to_string()),
        };

        Ok(Self {
            protocol,
            version,
            received_by,
            comment,
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        split_list(text).iter().map(|s| Self::parse(s)).collect()
    }
}

impl fmt::Display for ViaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(protocol) = &self.protocol {
            write!(f, "{protocol}/")?;
        }
        write!(f, "{} {}", self.version, self.received_by)?;
        if let Some(comment) = &self.comment {
            write!(f, " ({comment})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn via_parses_protocol_and_comment() {
        let v = ViaType::parse("1.1 proxy.example.com (Apache)").unwrap();
        assert_eq!(v.version, "1.1");
        assert_eq!(v.received_by, "proxy.example.com");
        assert_eq!(v.comment.as_deref(), Some("Apache"));
    }
}
