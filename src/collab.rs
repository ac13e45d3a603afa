//! Collaborator boundaries: the interfaces the wire engine calls out to
//! rather than implementing itself — socket construction, TLS, cookie
//! persistence, and WebSocket session hand-off. Generalizes the
//! `NetReader`/`NetWriter` "wrap a stream, expose `Read`/`Write`" shape into
//! traits so the engine can be driven by something other than a raw
//! `TcpStream` in tests or behind TLS.

use std::fmt;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::errors::NetResult;

/// A bidirectional, half-closable byte channel: whatever a connected socket
/// (plain or TLS) reduces to from the engine's point of view.
pub trait ByteChannel: Read + Write + Send {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> NetResult<()>;
    fn try_clone_channel(&self) -> NetResult<Box<dyn ByteChannel>>;
}

impl ByteChannel for TcpStream {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> NetResult<()> {
        Ok(TcpStream::set_read_timeout(self, timeout)?)
    }

    fn try_clone_channel(&self) -> NetResult<Box<dyn ByteChannel>> {
        Ok(Box::new(self.try_clone()?))
    }
}

/// Constructs the transport-level channel for a `(host, port)` pair,
/// optionally wrapped in TLS. `buffer_size` governs the `TcpStream`'s
/// underlying socket buffers (best-effort on most platforms).
pub trait SocketFactory: Send + Sync {
    fn connect(&self, host: &str, port: u16, tls: bool) -> NetResult<Box<dyn ByteChannel>>;
}

/// Opens a plain TCP connection; `tls` is rejected since this crate carries
/// no bundled TLS stack (see `TlsProvider`).
pub struct DefaultSocketFactory {
    pub buffer_size: usize,
}

impl SocketFactory for DefaultSocketFactory {
    fn connect(&self, host: &str, port: u16, tls: bool) -> NetResult<Box<dyn ByteChannel>> {
        if tls {
            return Err(crate::errors::NetError::RequestAborted(
                "TLS requires a TlsProvider collaborator; none configured".to_string(),
            ));
        }
        let stream = TcpStream::connect((host, port))?;
        Ok(Box::new(stream))
    }
}

/// Builds TLS channels from a trust store or trust manager. No default
/// implementation ships in this crate; a caller integrating TLS provides
/// one (e.g. backed by `native-tls` or `rustls`), matching the collaborator
/// boundary this crate describes rather than implements.
pub trait TlsProvider: Send + Sync {
    fn wrap(&self, inner: Box<dyn ByteChannel>, host: &str) -> NetResult<Box<dyn ByteChannel>>;
}

/// A single `Set-Cookie` value as received, reduced to what a store needs
/// to persist and later reproduce in an outgoing `Cookie` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlainCookie {
    pub name: String,
    pub value: String,
}

impl fmt::Display for PlainCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// `get(uri) -> [PlainCookie]`, `put(uri, SetCookie)`, per §6.
pub trait CookieStore: Send + Sync {
    fn get(&self, uri: &crate::uri::Uri) -> Vec<PlainCookie>;
    fn put(&self, uri: &crate::uri::Uri, set_cookie_value: &str);
}

/// The default no-op store: never returns cookies, discards `Set-Cookie`.
#[derive(Default)]
pub struct NoopCookieStore;

impl CookieStore for NoopCookieStore {
    fn get(&self, _uri: &crate::uri::Uri) -> Vec<PlainCookie> {
        Vec::new()
    }

    fn put(&self, _uri: &crate::uri::Uri, _set_cookie_value: &str) {}
}

/// Hands a successfully upgraded connection off to a caller-supplied
/// session type. Called only after the 101 handshake validates, per §4.6.
pub trait WebSocketSessionFactory<S> {
    fn for_client(
        &self,
        channel: Box<dyn ByteChannel>,
        correlate: &str,
        target: &crate::uri::Uri,
        version: u8,
    ) -> NetResult<S>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_cookie_store_returns_nothing() {
        let store = NoopCookieStore;
        let uri = crate::uri::Uri::parse("http://example.com/").unwrap();
        assert!(store.get(&uri).is_empty());
        store.put(&uri, "a=1");
    }

    #[test]
    fn default_socket_factory_rejects_tls() {
        let factory = DefaultSocketFactory { buffer_size: 8192 };
        assert!(factory.connect("example.com", 443, true).is_err());
    }
}
