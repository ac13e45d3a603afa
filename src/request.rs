use std::fmt::{self, Debug};
use std::io::{BufRead, Write};

use crate::errors::{NetResult, ParseErrorKind};
use crate::header::{Header, Headers};
use crate::http::{Method, Version};
use crate::message::{Attributes, Drainable, Entity};
use crate::stream::HeaderStreamReader;
use crate::uri::Uri;

/// `method SP request-target SP HTTP-version`.
#[derive(Clone, Debug)]
pub struct RequestLine {
    pub method: Method,
    pub target: Uri,
    pub version: Version,
}

impl RequestLine {
    #[must_use]
    pub fn new(method: Method, target: Uri, version: Version) -> Self {
        Self { method, target, version }
    }

    pub fn parse(line: &str) -> NetResult<Self> {
        let trimmed = line.trim();
        let mut tokens = trimmed.splitn(3, ' ').map(str::trim);
        let (Some(method), Some(target), Some(version)) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(ParseErrorKind::ReqLine.into());
        };

        Ok(Self {
            method: method.parse()?,
            target: Uri::parse(target)?,
            version: version.parse()?,
        })
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_options = matches!(self.method, Method::Options);
        write!(
            f,
            "{} {} {}",
            self.method,
            self.target.origin_form(is_options),
            self.version
        )
    }
}

/// `(RequestLine, headers, entity, attributes)`, per §4.3.
pub struct HttpRequest {
    pub line: RequestLine,
    pub headers: Headers,
    pub entity: Entity,
    pub attributes: Attributes,
}

impl Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("line", &self.line.to_string())
            .field("headers", &self.headers)
            .field("entity", &self.entity)
            .finish()
    }
}

impl Drainable for HttpRequest {
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, target: Uri, version: Version) -> Self {
        Self {
            line: RequestLine::new(method, target, version),
            headers: Headers::new(),
            entity: Entity::Empty,
            attributes: Attributes::new(),
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.line.method
    }

    /// `target.path`, normalized: an absent path becomes `/` (or `*` for
    /// `OPTIONS`, mirroring the wire rewriting rule in §4.6).
    #[must_use]
    pub fn path(&self) -> &str {
        if self.line.target.path.is_empty() {
            "/"
        } else {
            &self.line.target.path
        }
    }

    #[must_use]
    pub fn query(&self) -> &crate::uri::QueryString {
        &self.line.target.query
    }

    pub fn set_headers(&mut self, headers: Headers) {
        self.headers = headers;
    }

    /// Replaces same-name headers preserving overall order, then appends
    /// any additional headers not already present by name.
    pub fn put_headers(&mut self, incoming: impl IntoIterator<Item = Header>) {
        self.headers.put_headers(incoming);
    }

    pub fn remove_headers(&mut self, names: &[crate::header::HeaderName]) {
        self.headers.remove_headers(names);
    }

    pub fn set_body(&mut self, entity: Entity) {
        self.entity = entity;
    }

    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    pub fn put_attribute<T: std::any::Any + Send>(&mut self, key: &'static str, value: T) {
        self.attributes.put(key, value);
    }

    pub fn remove_attribute(&mut self, key: &'static str) -> bool {
        self.attributes.remove(key)
    }

    /// Reads the request line and headers (with continuation folding) from
    /// a buffered reader, leaving the entity as the reader's remaining
    /// bytes — the caller runs a `BodyDecoder` over it afterward.
    pub fn read_head<R: BufRead>(reader: &mut R, max_headers: u16) -> NetResult<(RequestLine, Headers)> {
        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            return Err(crate::errors::NetError::UnexpectedEof);
        }
        let request_line = RequestLine::parse(line.trim_end_matches(['\r', '\n']))?;
        let headers = HeaderStreamReader::new(reader, max_headers).read_headers()?;
        Ok((request_line, headers))
    }

    /// Writes the request line and headers to `writer`; the body is
    /// written separately by the wire engine (it must interleave chunk
    /// framing or raw streaming, which this method does not know about).
    pub fn write_head<W: Write>(&self, writer: &mut W) -> NetResult<()> {
        write!(writer, "{}\r\n", self.line)?;
        for header in self.headers.iter() {
            write!(writer, "{header}\r\n")?;
        }
        writer.write_all(b"\r\n")?;
        Ok(())
    }
}
