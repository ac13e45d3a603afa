use std::fmt::{self, Debug};
use std::io::{BufRead, Write};

use crate::errors::{NetError, NetResult, ParseErrorKind};
use crate::header::{Header, Headers};
use crate::http::{Method, Status, Version};
use crate::message::{Attributes, Drainable, Entity};
use crate::stream::HeaderStreamReader;

/// `HTTP-version SP status-code [SP reason]`.
#[derive(Clone, Debug)]
pub struct StatusLine {
    pub version: Version,
    pub status: Status,
}

impl StatusLine {
    #[must_use]
    pub fn new(version: Version, status: Status) -> Self {
        Self { version, status }
    }

    pub fn parse(line: &str) -> NetResult<Self> {
        let trimmed = line.trim();
        let mut tokens = trimmed.splitn(3, ' ').map(str::trim);
        let (Some(version), Some(code), reason) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(ParseErrorKind::StatusLine.into());
        };

        let version = version.parse()?;
        let code: u16 = code.parse().map_err(|_| ParseErrorKind::Status)?;
        let status = match reason {
            Some(r) if !r.is_empty() => Status::with_reason(code, r),
            _ => Status::from(code),
        };

        Ok(Self { version, status })
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.version, self.status)
    }
}

/// `(StatusLine, headers, entity, attributes)`, per §4.3.
pub struct HttpResponse {
    pub line: StatusLine,
    pub headers: Headers,
    pub entity: Entity,
    pub attributes: Attributes,
}

impl Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("line", &self.line.to_string())
            .field("headers", &self.headers)
            .field("entity", &self.entity)
            .finish()
    }
}

impl Drainable for HttpResponse {
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl HttpResponse {
    #[must_use]
    pub fn new(version: Version, status: Status) -> Self {
        Self {
            line: StatusLine::new(version, status),
            headers: Headers::new(),
            entity: Entity::Empty,
            attributes: Attributes::new(),
        }
    }

    #[must_use]
    pub fn status(&self) -> &Status {
        &self.line.status
    }

    pub fn set_headers(&mut self, headers: Headers) {
        self.headers = headers;
    }

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

    /// Whether the body must be forced empty regardless of headers: 1xx,
    /// 204, 304 responses (§4.5 step 2), or any response to a `HEAD`
    /// request (§4.6).
    #[must_use]
    pub fn forces_empty_body(&self, request_method: &Method) -> bool {
        self.line.status.forces_empty_body() || matches!(request_method, Method::Head)
    }

    /// Reads the status line and headers (with continuation folding) from
    /// a buffered reader, leaving the entity undecided — the caller wraps
    /// the reader's remaining bytes as the raw entity and runs a
    /// `BodyDecoder` over it.
    pub fn read_head<R: BufRead>(reader: &mut R, max_headers: u16) -> NetResult<(StatusLine, Headers)> {
        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            return Err(NetError::UnexpectedEof);
        }
        let status_line = StatusLine::parse(line.trim_end_matches(['\r', '\n']))?;
        let headers = HeaderStreamReader::new(reader, max_headers).read_headers()?;
        Ok((status_line, headers))
    }

    pub fn write_head<W: Write>(&self, writer: &mut W) -> NetResult<()> {
        write!(writer, "{}\r\n", self.line)?;
        for header in self.headers.iter() {
            write!(writer, "{header}\r\n")?;
        }
        writer.write_all(b"\r\n")?;
        Ok(())
    }
}
