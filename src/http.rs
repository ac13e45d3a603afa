use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::grammar::is_token;
use crate::{NetError, NetResult, ParseErrorKind};

/// HTTP request methods, plus an extension method for any other token.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Method {
    /// Transfers a current representation of the target resource.
    Get,
    /// Performs resource-specific processing on the request content.
    Post,
    /// Replaces all current representations of the target resource with the
    /// request content.
    Put,
    /// Performs a similar action to PUT but can do partial updates.
    Patch,
    /// Removes all current representations of the target resource.
    Delete,
    /// Performs the same action as GET but does not transfer the response
    /// content.
    Head,
    /// Performs a message loop-back test along the target resource path.
    Trace,
    /// Establishes a tunnel to the server identified by the target resource.
    Connect,
    /// Describes the communication options for the target resource.
    Options,
    /// Any other method whose name matches the `token` grammar.
    Extension(String),
}

impl Default for Method {
    fn default() -> Self {
        Self::Get
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = NetError;

    fn from_str(s: &str) -> NetResult<Self> {
        match s.trim() {
            // HTTP methods are case-sensitive.
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "POST" => Ok(Self::Post),
            "HEAD" => Ok(Self::Head),
            "PATCH" => Ok(Self::Patch),
            "TRACE" => Ok(Self::Trace),
            "DELETE" => Ok(Self::Delete),
            "CONNECT" => Ok(Self::Connect),
            "OPTIONS" => Ok(Self::Options),
            other if is_token(other) => Ok(Self::Extension(other.to_string())),
            _ => Err(ParseErrorKind::Method)?,
        }
    }
}

impl Method {
    /// Returns the HTTP method as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Extension(name) => name,
        }
    }

    /// Whether this method is one whose request carries no body on the
    /// wire regardless of what the caller set (GET, HEAD, DELETE, TRACE,
    /// CONNECT).
    #[must_use]
    pub fn is_bodiless(&self) -> bool {
        matches!(
            self,
            Self::Get | Self::Head | Self::Delete | Self::Trace | Self::Connect
        )
    }

    /// Parses an optional string slice into a `Method`.
    pub fn parse(maybe_method: Option<&str>) -> NetResult<Self> {
        maybe_method
            .ok_or_else(|| ParseErrorKind::Method.into())
            .and_then(Self::from_str)
    }
}

/// An HTTP status code with an optionally custom reason phrase.
#[derive(Clone, Debug, Hash)]
pub struct Status {
    code: u16,
    reason: Option<String>,
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Status {}

impl PartialOrd for Status {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Status {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code.cmp(&other.code)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::from(200)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.code(), self.reason_phrase())
    }
}

impl FromStr for Status {
    type Err = NetError;

    fn from_str(s: &str) -> NetResult<Self> {
        s.trim()
            .parse::<u16>()
            .map(Self::from)
            .map_err(|_| ParseErrorKind::Status.into())
    }
}

impl From<u16> for Status {
    fn from(code: u16) -> Self {
        Self { code, reason: None }
    }
}

impl Status {
    /// Builds a status with an explicit, non-default reason phrase, as
    /// parsed off the wire.
    #[must_use]
    pub fn with_reason(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: Some(reason.into()),
        }
    }

    /// Returns the reason phrase: the one attached at construction, if
    /// any, else the canonical phrase for the code.
    #[must_use]
    pub fn reason_phrase(&self) -> &str {
        self.reason.as_deref().unwrap_or_else(|| self.msg())
    }

    #[must_use]
    pub fn is_informational(&self) -> bool {
        (100..200).contains(&self.code)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    #[must_use]
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.code)
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.code)
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.code)
    }

    /// `1xx`/`204`/`304`: per spec.md §4.5 these responses always carry an
    /// empty decoded body regardless of headers.
    #[must_use]
    pub fn forces_empty_body(&self) -> bool {
        self.is_informational() || self.code == 204 || self.code == 304
    }

    /// Returns the canonical reason phrase for a status.
    #[must_use]
    #[rustfmt::skip]
    #[allow(clippy::too_many_lines)]
    #[allow(clippy::match_same_arms)]
    #[allow(clippy::match_overlapping_arm)]
    pub const fn msg(&self) -> &'static str {
        match self.code {
            // 1xx informational status.
            100 => "Continue",
            101 => "Switching Protocols",
            102 => "Processing",
            103 => "Early Hints",

            // 2xx successful status.
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            203 => "Non-Authoritative Information",
            204 => "No Content",
            205 => "Reset Content",
            206 => "Partial Content",
            207 => "Multi-Status",
            208 => "Already Reported",
            218 => "This Is Fine",
            226 => "IM Used",

            // 3xx redirect status.
            300 => "Multiple Choices",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            305 => "Use Proxy",
            306 => "Switch Proxy",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",

            // 4xx client error status.
            400 => "Bad Request", // No or multiple Host headers, invalid request line.
            401 => "Unauthorized",
            402 => "Payment Required",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            406 => "Not Acceptable",
            407 => "Proxy Authentication Required",
            408 => "Request Timeout",
            409 => "Conflict",
            410 => "Gone",
            411 => "Length Required",
            412 => "Precondition Failed",
            413 => "Payload Too Large",
            414 => "URI Too Long", // Recommended to support 8kb+ request lines.
            415 => "Unsupported Media Type",
            416 => "Range Not Satisfiable",
            417 => "Expectation Failed",
            418 => "I'm a Teapot",
            421 => "Misdirected Request",
            422 => "Unprocessable Entity",
            423 => "Locked",
            424 => "Failed Dependency",
            425 => "Too Early",
            426 => "Upgrade Required",
            428 => "Precondition Required",
            429 => "Too Many Requests",
            431 => "Request Header Fields Too Large",
            451 => "Unavailable For Legal Reasons",

            // 5xx server error status.
            500 => "Internal Server Error",
            501 => "Not Implemented", // Unimplemented methods, etc.
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            505 => "HTTP Version Not Supported",
            506 => "Variant Also Negotiates",
            507 => "Insufficient Storage",
            508 => "Loop Detected",
            510 => "Not Extended",
            511 => "Network Authentication Required",

            // Fall back to status ranges if unmatched.
            100..=199 => "Informational",
            200..=299 => "Success",
            300..=399 => "Redirect",
            400..=499 => "Client Error",
            500..=599 => "Server Error",
            _ => "",
        }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Parses an optional string slice into a `Status`.
    pub fn parse(maybe_status: Option<&str>) -> NetResult<Self> {
        maybe_status
            .ok_or_else(|| ParseErrorKind::Status.into())
            .and_then(Self::from_str)
    }
}

/// The HTTP protocol version.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Version {
    /// HTTP version 0.9
    ZeroDotNine,
    /// HTTP version 1.0
    OneDotZero,
    /// HTTP version 1.1
    OneDotOne,
    /// HTTP version 2.0
    TwoDotZero,
    /// HTTP version 3.0
    ThreeDotZero,
}

impl Default for Version {
    fn default() -> Self {
        Self::OneDotOne
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Version {
    type Err = NetError;

    fn from_str(s: &str) -> NetResult<Self> {
        // HTTP versions are case-sensitive and a zero is implied by a missing
        // minor version number.
        match s.trim() {
            "HTTP/0.9" => Ok(Self::ZeroDotNine),
            "HTTP/1.0" => Ok(Self::OneDotZero),
            "HTTP/1.1" => Ok(Self::OneDotOne),
            "HTTP/2" | "HTTP/2.0" => Ok(Self::TwoDotZero),
            "HTTP/3" | "HTTP/3.0" => Ok(Self::ThreeDotZero),
            _ => Err(ParseErrorKind::Version.into()),
        }
    }
}

impl Version {
    /// Returns the the protocol version as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroDotNine => "HTTP/0.9",
            Self::OneDotZero => "HTTP/1.0",
            Self::OneDotOne => "HTTP/1.1",
            Self::TwoDotZero => "HTTP/2.0",
            Self::ThreeDotZero => "HTTP/3.0",
        }
    }

    /// Returns the major version number.
    #[must_use]
    pub const fn major(&self) -> u8 {
        match self {
            Self::ZeroDotNine => 0,
            Self::OneDotZero | Self::OneDotOne => 1,
            Self::TwoDotZero => 2,
            Self::ThreeDotZero => 3,
        }
    }

    /// Returns the minor version number.
    #[must_use]
    pub const fn minor(&self) -> u8 {
        match self {
            Self::OneDotZero | Self::TwoDotZero | Self::ThreeDotZero => 0,
            Self::OneDotOne => 1,
            Self::ZeroDotNine => 9,
        }
    }

    /// Returns whether the protocol version is supported.
    ///
    /// This crate is an HTTP/1.1 client engine; only 1.1 is supported for
    /// an outgoing connection.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        *self == Self::OneDotOne
    }

    /// Parses an optional string slice into a `Version`.
    pub fn parse(maybe_version: Option<&str>) -> NetResult<Self> {
        maybe_version
            .ok_or_else(|| ParseErrorKind::Version.into())
            .and_then(Self::from_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_extension_tokens() {
        assert_eq!(Method::from_str("PROPFIND").unwrap(), Method::Extension("PROPFIND".to_string()));
        assert!(Method::from_str("bad token").is_err());
    }

    #[test]
    fn method_bodiless_classification() {
        assert!(Method::Get.is_bodiless());
        assert!(!Method::Post.is_bodiless());
    }

    #[test]
    fn status_reason_phrase_defaults_to_canonical() {
        let s = Status::from(404);
        assert_eq!(s.reason_phrase(), "Not Found");
    }

    #[test]
    fn status_with_custom_reason() {
        let s = Status::with_reason(200, "Great Success");
        assert_eq!(s.reason_phrase(), "Great Success");
        assert_eq!(s.code(), 200);
    }

    #[test]
    fn status_classifiers_by_hundreds() {
        assert!(Status::from(100).is_informational());
        assert!(Status::from(204).forces_empty_body());
        assert!(Status::from(304).forces_empty_body());
        assert!(Status::from(200).is_success());
        assert!(Status::from(301).is_redirect());
        assert!(Status::from(404).is_client_error());
        assert!(Status::from(500).is_server_error());
    }

    #[test]
    fn version_major_minor() {
        assert_eq!(Version::OneDotOne.major(), 1);
        assert_eq!(Version::OneDotOne.minor(), 1);
        assert!(Version::OneDotOne.is_supported());
        assert!(!Version::TwoDotZero.is_supported());
    }
}
