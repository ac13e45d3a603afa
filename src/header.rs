use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{NetResult, ParseErrorKind};

pub mod accessors;
pub mod names;
pub mod values;

pub use accessors::TypedHeaders;
pub use names::{header_consts, HeaderKind, HeaderName};
pub use values::HeaderValue;

/// An object that represents a header field.
#[derive(Debug, Clone)]
pub struct Header {
    pub name: HeaderName,
    pub value: HeaderValue,
}

impl PartialEq<Self> for Header {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl PartialEq<HeaderName> for Header {
    fn eq(&self, other: &HeaderName) -> bool {
        self.name == *other
    }
}

impl Eq for Header {}

impl PartialOrd<Header> for Header {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.name.cmp(&other.name))
    }
}

impl Ord for Header {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", &self.name, &self.value)
    }
}

impl Header {
    /// Returns a new `Header` instance.
    #[must_use]
    pub fn new(name: HeaderName, value: HeaderValue) -> Self {
        Self { name, value }
    }

    /// Parses a string slice into a `Header` object. Does not fold
    /// continuation lines; callers scanning a header block do that before
    /// handing a single logical line to this parser.
    pub fn parse(line: &str) -> NetResult<Header> {
        let mut tokens = line.splitn(2, ':').map(str::trim);

        let (Some(name), Some(value)) = (tokens.next(), tokens.next()) else {
            return Err(ParseErrorKind::Header)?;
        };

        if name.is_empty() {
            return Err(ParseErrorKind::Header)?;
        }

        let hdr_name = HeaderName::from(name);
        let hdr_value = HeaderValue::from(value);

        Ok(Self::new(hdr_name, hdr_value))
    }
}

/// An ordered multimap of header fields.
///
/// Unlike a `BTreeMap<HeaderName, HeaderValue>`, this preserves both
/// insertion order and duplicate names (e.g. repeated `Set-Cookie`), per
/// the invariant that header lists are an ordered sequence, not a map.
/// Lookups by name are case-insensitive (`HeaderName` equality already is).
#[derive(Debug, Clone, Default)]
pub struct Headers(Vec<Header>);

impl Display for Headers {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for header in &self.0 {
            writeln!(f, "{header}\r")?;
        }
        Ok(())
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Headers {
    type Item = Header;
    type IntoIter = std::vec::IntoIter<Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.0.iter()
    }

    /// Appends a header without checking for an existing name, preserving
    /// duplicates.
    pub fn append(&mut self, name: HeaderName, value: HeaderValue) {
        self.0.push(Header::new(name, value));
    }

    /// Returns the first header value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.0.iter().find(|h| &h.name == name).map(|h| &h.value)
    }

    /// Returns every value for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a HeaderName) -> impl Iterator<Item = &'a HeaderValue> {
        self.0.iter().filter(move |h| &h.name == name).map(|h| &h.value)
    }

    /// Multi-valued headers flatten comma-separated lists across repeated
    /// headers into a single comma-joined string, per spec.md §4.7.
    #[must_use]
    pub fn get_combined(&self, name: &HeaderName) -> Option<String> {
        let mut values = self.get_all(name).peekable();
        values.peek()?;
        Some(
            values
                .map(|v| v.as_str().into_owned())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    #[must_use]
    pub fn has(&self, name: &HeaderName) -> bool {
        self.0.iter().any(|h| &h.name == name)
    }

    /// Replaces any existing headers of this name with a single header,
    /// appended at the end. Unlike `put_headers`, this does not preserve
    /// the position of a prior occurrence — use `put_headers` when
    /// overall header order must be kept stable.
    pub fn set(&mut self, name: HeaderName, value: HeaderValue) {
        self.remove(&name);
        self.0.push(Header::new(name, value));
    }

    /// Removes all headers with the given name, returning whether any were
    /// removed.
    pub fn remove(&mut self, name: &HeaderName) -> bool {
        let before = self.0.len();
        self.0.retain(|h| &h.name != name);
        before != self.0.len()
    }

    /// Replaces same-name headers preserving overall order (at the
    /// position of the first occurrence), then appends any additional
    /// headers not already present by name.
    pub fn put_headers(&mut self, incoming: impl IntoIterator<Item = Header>) {
        for header in incoming {
            if self.0.iter().any(|h| h.name == header.name) {
                let mut replaced = false;
                let mut out = Vec::with_capacity(self.0.len());
                for existing in self.0.drain(..) {
                    if existing.name == header.name {
                        if !replaced {
                            out.push(header.clone());
                            replaced = true;
                        }
                        // drop duplicate occurrences beyond the first
                    } else {
                        out.push(existing);
                    }
                }
                self.0 = out;
            } else {
                self.0.push(header);
            }
        }
    }

    pub fn remove_headers(&mut self, names: &[HeaderName]) {
        self.0.retain(|h| !names.contains(&h.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::header_consts::{CONTENT_LENGTH, HOST, SET_COOKIE};

    #[test]
    fn header_parse_splits_on_first_colon() {
        let h = Header::parse("X-Custom: a: b").unwrap();
        assert_eq!(h.name.to_titlecase(), "X-Custom");
        assert_eq!(h.value.as_str(), "a: b");
    }

    #[test]
    fn header_parse_rejects_empty_name() {
        assert!(Header::parse(": value").is_err());
    }

    #[test]
    fn headers_preserve_insertion_order_and_duplicates() {
        let mut headers = Headers::new();
        headers.append(SET_COOKIE, "a=1".into());
        headers.append(SET_COOKIE, "b=2".into());
        headers.append(HOST, "example.com".into());

        let names: Vec<_> = headers.iter().map(|h| h.name.to_titlecase()).collect();
        assert_eq!(names, vec!["Set-Cookie", "Set-Cookie", "Host"]);
        assert_eq!(headers.get_all(&SET_COOKIE).count(), 2);
    }

    #[test]
    fn headers_set_replaces_existing() {
        let mut headers = Headers::new();
        headers.append(CONTENT_LENGTH, "5".into());
        headers.set(CONTENT_LENGTH, "10".into());
        assert_eq!(headers.get_all(&CONTENT_LENGTH).count(), 1);
        assert_eq!(headers.get(&CONTENT_LENGTH).unwrap().as_str(), "10");
    }

    #[test]
    fn headers_remove_headers_drops_named() {
        let mut headers = Headers::new();
        headers.append(HOST, "example.com".into());
        headers.append(CONTENT_LENGTH, "0".into());
        headers.remove_headers(&[HOST]);
        assert!(!headers.has(&HOST));
        assert!(headers.has(&CONTENT_LENGTH));
    }
}
