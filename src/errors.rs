use std::io::{Error as IoError, ErrorKind as IoErrorKind};

use thiserror::Error;

/// Grammar/value parsing failure detail.
///
/// Mirrors the teacher's `ParseErrorKind`, extended with the value-type and
/// URI-component kinds this crate's header-value language needs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("token grammar violation")]
    Token,
    #[error("quoted-string grammar violation")]
    QuotedString,
    #[error("parameter grammar violation")]
    Parameter,
    #[error("URI parsing failed")]
    Uri,
    #[error("HTTP method parsing failed")]
    Method,
    #[error("HTTP version parsing failed")]
    Version,
    #[error("HTTP status parsing failed")]
    Status,
    #[error("request line parsing failed")]
    ReqLine,
    #[error("status line parsing failed")]
    StatusLine,
    #[error("header name is not UTF-8 encoded")]
    NonUtf8Header,
    #[error("header parsing failed")]
    Header,
    #[error("header value type parsing failed: {0}")]
    HeaderValue(&'static str),
    #[error("date parsing failed")]
    Date,
    #[error("query string parsing failed")]
    QueryString,
}

/// The crate-wide error type.
///
/// One flat enum, the way the teacher's `NetError` stays flat rather than
/// nesting a tree of per-module error types.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("read an unexpected EOF")]
    UnexpectedEof,
    #[error("{0}")]
    ParseError(#[from] ParseErrorKind),
    #[error("header not found: {0}")]
    HeaderNotFound(&'static str),
    #[error("request aborted: {0}")]
    RequestAborted(String),
    #[error("read limit of {0} bytes exceeded")]
    ReadLimitExceeded(u64),
    #[error("entity exceeded maximum size of {0} bytes")]
    EntityTooLarge(u64),
    #[error("truncated mid-chunk or mid-payload")]
    TruncationDetected,
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),
    #[error("WebSocket handshake failed: {0}")]
    WebSocketHandshakeFailure(String),
    #[error("read error: {0}")]
    ReadError(IoErrorKind),
    #[error("write error: {0}")]
    WriteError(IoErrorKind),
    #[error("I/O error: {0}")]
    IoError(#[source] IoError),
}

pub type NetResult<T> = Result<T, NetError>;

impl From<IoError> for NetError {
    fn from(err: IoError) -> Self {
        match err.kind() {
            IoErrorKind::UnexpectedEof => Self::UnexpectedEof,
            IoErrorKind::WouldBlock => Self::ReadError(err.kind()),
            IoErrorKind::WriteZero => Self::WriteError(err.kind()),
            _ => Self::IoError(err),
        }
    }
}

impl From<NetError> for IoError {
    fn from(err: NetError) -> Self {
        match err {
            NetError::UnexpectedEof => IoError::from(IoErrorKind::UnexpectedEof),
            NetError::ReadError(kind) | NetError::WriteError(kind) => IoError::from(kind),
            NetError::IoError(inner) => inner,
            other => IoError::new(IoErrorKind::InvalidData, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_converts_into_net_error() {
        let err: NetError = ParseErrorKind::Token.into();
        assert!(matches!(err, NetError::ParseError(ParseErrorKind::Token)));
    }

    #[test]
    fn unexpected_eof_round_trips_through_io_error() {
        let io_err = IoError::from(IoErrorKind::UnexpectedEof);
        let net_err = NetError::from(io_err);
        assert!(matches!(net_err, NetError::UnexpectedEof));
    }
}
