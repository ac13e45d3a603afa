//! `Uri`, `Authority`, and the `x-www-form-urlencoded` `QueryString` codec.

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::split_list;

/// scheme?, authority?, path, query string, fragment?.
///
/// An authority requires a scheme. `http`/`https` imply default ports
/// 80/443 when absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uri {
    pub scheme: Option<String>,
    pub authority: Option<Authority>,
    pub path: String,
    pub query: QueryString,
    pub fragment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authority {
    pub host: String,
    pub port: Option<u16>,
}

impl Uri {
    /// Default port for `http`/`https`/`ws`/`wss`, if any.
    #[must_use]
    pub fn default_port(scheme: &str) -> Option<u16> {
        match scheme {
            "http" | "ws" => Some(80),
            "https" | "wss" => Some(443),
            _ => None,
        }
    }

    /// The effective port: explicit if set, else the scheme's default.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        let authority = self.authority.as_ref()?;
        authority.port.or_else(|| {
            self.scheme
                .as_deref()
                .and_then(Self::default_port)
        })
    }

    /// `host[:port]` as emitted in a `Host` header, omitting the port when
    /// it matches the scheme's default.
    #[must_use]
    pub fn host_header_value(&self) -> Option<String> {
        let authority = self.authority.as_ref()?;
        let default = self.scheme.as_deref().and_then(Self::default_port);
        match authority.port {
            Some(p) if Some(p) != default => Some(format!("{}:{p}", authority.host)),
            _ => Some(authority.host.clone()),
        }
    }

    /// Parses an absolute or origin-form URI reference.
    pub fn parse(s: &str) -> NetResult<Self> {
        let mut rest = s;

        let (fragment, r) = split_last(rest, '#');
        rest = r;
        let (query_raw, r) = split_first(rest, '?');
        rest = r;

        let (scheme, r) = match rest.find("://") {
            Some(i) if rest[..i].bytes().all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.') && !rest[..i].is_empty() => {
                (Some(rest[..i].to_ascii_lowercase()), &rest[i + 3..])
            }
            _ => (None, rest),
        };
        rest = r;

        let (authority, path) = if scheme.is_some() {
            let end = rest.find('/').unwrap_or(rest.len());
            let auth_str = &rest[..end];
            if auth_str.is_empty() {
                return Err(ParseErrorKind::Uri.into());
            }
            (Some(parse_authority(auth_str)?), rest[end..].to_string())
        } else {
            (None, rest.to_string())
        };

        if authority.is_some() && scheme.is_none() {
            return Err(ParseErrorKind::Uri.into());
        }

        let query = match query_raw {
            Some(q) => QueryString::parse(q),
            None => QueryString::empty(),
        };

        Ok(Self {
            scheme,
            authority,
            path,
            query,
            fragment: fragment.map(str::to_string),
        })
    }

    /// The origin-form target (`path?query`) used on the wire, or `"*"` for
    /// a path-less `OPTIONS` request.
    #[must_use]
    pub fn origin_form(&self, is_options: bool) -> String {
        let path = if self.path.is_empty() {
            if is_options {
                return "*".to_string();
            }
            "/"
        } else {
            &self.path
        };

        let mut out = if path.starts_with('/') || path == "*" {
            path.to_string()
        } else {
            format!("/{path}")
        };

        if !self.query.is_empty() {
            out.push('?');
            out.push_str(&self.query.to_string());
        }
        out
    }
}

fn split_first(s: &str, sep: char) -> (Option<&str>, &str) {
    match s.split_once(sep) {
        Some((head, tail)) => (Some(tail), head),
        None => (None, s),
    }
}

fn split_last(s: &str, sep: char) -> (Option<&str>, &str) {
    match s.rfind(sep) {
        Some(i) => (Some(&s[i + 1..]), &s[..i]),
        None => (None, s),
    }
}

fn parse_authority(s: &str) -> NetResult<Authority> {
    let s = match s.split_once('@') {
        Some((_userinfo, rest)) => rest,
        None => s,
    };

    if let Some(rest) = s.strip_prefix('[') {
        let Some(end) = rest.find(']') else {
            return Err(ParseErrorKind::Uri.into());
        };
        let host = format!("[{}]", &rest[..end]);
        let port = match rest[end + 1..].strip_prefix(':') {
            Some(p) => Some(p.parse().map_err(|_| ParseErrorKind::Uri)?),
            None => None,
        };
        return Ok(Authority { host, port });
    }

    match s.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(Authority {
                host: host.to_string(),
                port: Some(port.parse().map_err(|_| ParseErrorKind::Uri)?),
            })
        }
        _ => Ok(Authority {
            host: s.to_string(),
            port: None,
        }),
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}://")?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "{}", authority.host)?;
            if let Some(port) = authority.port {
                write!(f, ":{port}")?;
            }
        }
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// An ordered sequence of `(name, value)` pairs preserving duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    #[must_use]
    pub fn empty() -> Self {
        Self { pairs: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Decodes `x-www-form-urlencoded` text. A bare `name` (no `=`) yields
    /// `(name, "")`; empty values (`name=`) are preserved distinctly from a
    /// bare name in the round-trip sense only through `toString`'s `=`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::empty();
        }
        let pairs = raw
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((n, v)) => (decode_component(n), decode_component(v)),
                None => (decode_component(part), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// First value per distinct name, in first-seen order.
    #[must_use]
    pub fn to_map(&self) -> Vec<(String, String)> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for (name, value) in &self.pairs {
            if seen.insert(name.clone()) {
                out.push((name.clone(), value.clone()));
            }
        }
        out
    }

    /// All values grouped by name, preserving each group's insertion order.
    #[must_use]
    pub fn to_multi_map(&self) -> Vec<(String, Vec<String>)> {
        let mut order = Vec::new();
        let mut groups: std::collections::HashMap<String, Vec<String>> =
            std::collections::HashMap::new();
        for (name, value) in &self.pairs {
            if !groups.contains_key(name) {
                order.push(name.clone());
            }
            groups.entry(name.clone()).or_default().push(value.clone());
        }
        order
            .into_iter()
            .map(|name| {
                let values = groups.remove(&name).unwrap_or_default();
                (name, values)
            })
            .collect()
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.pairs {
            if !first {
                f.write_str("&")?;
            }
            first = false;
            write!(f, "{}={}", encode_component(name), encode_component(value))?;
        }
        Ok(())
    }
}

fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(bytes[i]);
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Splits a `#list` of comma-separated URI-ish tokens, respecting quotes.
#[must_use]
pub fn split_uri_list(s: &str) -> Vec<String> {
    split_list(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_absolute_http_uri() {
        let uri = Uri::parse("http://example.com:8080/a/b?x=1&y=2#frag").unwrap();
        assert_eq!(uri.scheme.as_deref(), Some("http"));
        assert_eq!(uri.authority.as_ref().unwrap().host, "example.com");
        assert_eq!(uri.authority.as_ref().unwrap().port, Some(8080));
        assert_eq!(uri.path, "/a/b");
        assert_eq!(uri.fragment.as_deref(), Some("frag"));
    }

    #[test]
    fn default_port_applied_when_absent() {
        let uri = Uri::parse("https://example.com/").unwrap();
        assert_eq!(uri.port(), Some(443));
    }

    #[test]
    fn authority_without_scheme_is_rejected() {
        // A bare "host:port/path" with no "scheme://" has no authority;
        // it is parsed as a relative path, which is valid.
        let uri = Uri::parse("/just/a/path").unwrap();
        assert!(uri.authority.is_none());
        assert_eq!(uri.path, "/just/a/path");
    }

    #[test]
    fn options_origin_form_with_empty_path_is_star() {
        let uri = Uri::parse("http://example.com").unwrap();
        assert_eq!(uri.origin_form(true), "*");
        assert_eq!(uri.origin_form(false), "/");
    }

    #[test]
    fn query_string_round_trips_order_and_duplicates() {
        let qs = QueryString::parse("a=1&b=&c&a=2");
        assert_eq!(
            qs.pairs(),
            &[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), String::new()),
                ("c".to_string(), String::new()),
                ("a".to_string(), "2".to_string()),
            ]
        );
        let reparsed = QueryString::parse(&qs.to_string());
        assert_eq!(reparsed, qs);
    }

    #[test]
    fn query_string_to_map_keeps_first_value() {
        let qs = QueryString::parse("a=1&a=2");
        assert_eq!(qs.to_map(), vec![("a".to_string(), "1".to_string())]);
    }

    #[test]
    fn query_string_to_multi_map_groups_by_name() {
        let qs = QueryString::parse("a=1&b=2&a=3");
        let multi = qs.to_multi_map();
        assert_eq!(multi[0], ("a".to_string(), vec!["1".to_string(), "3".to_string()]));
        assert_eq!(multi[1], ("b".to_string(), vec!["2".to_string()]));
    }

    #[test]
    fn empty_query_string_is_distinguished() {
        let qs = QueryString::empty();
        assert!(qs.is_empty());
        assert_eq!(qs.to_string(), "");
    }
}
