//! The public client: `ClientBuilder` assembles a `ClientConfig`
//! (collaborators, filters, timeouts), `Client::send` runs one request
//! through validation, rewriting, the wire engine, and the filter chain.

pub mod config;
pub mod connection;
pub mod convenience;
pub mod filters;
pub mod rewrite;
pub mod websocket;

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::collab::{ByteChannel, CookieStore, SocketFactory, TlsProvider};
use crate::errors::{NetError, NetResult};
use crate::header::header_consts::{COOKIE, SET_COOKIE};
use crate::message::attr_names;
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::uri::Uri;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use connection::{ClientConnection, ConnState};
pub use filters::{RequestFilter, ResponseFilter};

static NEXT_CLIENT_ID: AtomicU16 = AtomicU16::new(0);

struct ClientInner {
    config: ClientConfig,
    id: u16,
    next_request_id: AtomicU16,
}

/// An HTTP/1.1 client bound to one `ClientConfig`. A new `ClientConnection`
/// (and socket) is opened for every `send`, since the engine always frames
/// `Connection: close`. Cheaply cloneable (an `Arc` handle) so a `Client`
/// value can be attached to a request/response as the `client` attribute
/// per §4.6.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            inner: Arc::new(ClientInner { config, id, next_request_id: AtomicU16::new(0) }),
        }
    }

    fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// `{wallclock_ms:hex}-{clientId:04x}-{requestId:04x}`, per §4.6.
    fn next_correlate(&self) -> String {
        let wallclock_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let request_id = self.inner.next_request_id.fetch_add(1, Ordering::Relaxed);
        format!("{wallclock_ms:x}-{:04x}-{request_id:04x}", self.inner.id)
    }

    /// Runs `req` to completion: validates and rewrites the target,
    /// attaches stored cookies, runs outgoing filters, performs the wire
    /// exchange, runs incoming filters, and stores any `Set-Cookie`
    /// values the response carried. Attaches the `socket`/`correlate`/
    /// `absoluteTarget`/`client` attributes to both the request and its
    /// response, and the final outgoing request itself as the response's
    /// `response.request` attribute, per §4.6.
    pub fn send(&self, mut req: HttpRequest) -> NetResult<HttpResponse> {
        rewrite::validate_target(&req)?;

        let absolute_target = req.line.target.clone();
        let target = absolute_target.clone();
        self.attach_cookies(&mut req, &target);

        rewrite::rewrite_request(&mut req, &self.config().accept_encodings)?;
        let mut req = filters::run_outgoing(&self.config().outgoing, req);

        tracing::debug!(target = %target, "connecting");
        let channel = self.connect(&target)?;
        let socket_for_req = channel.try_clone_channel()?;
        let socket_for_res = channel.try_clone_channel()?;
        let correlate = self.next_correlate();

        req.put_attribute(attr_names::SOCKET, socket_for_req);
        req.put_attribute(attr_names::CORRELATE, correlate.clone());
        req.put_attribute(attr_names::ABSOLUTE_TARGET, absolute_target.clone());
        req.put_attribute(attr_names::CLIENT, self.clone());

        let conn = ClientConnection::new(
            channel,
            self.config().buffer_size,
            self.config().read_timeout,
            self.config().continue_timeout,
            self.config().max_headers,
            self.config().max_body_length,
        )?;

        let mut res = conn.exchange(req)?;
        self.store_cookies(&res, &target);

        res.put_attribute(attr_names::SOCKET, socket_for_res);
        res.put_attribute(attr_names::CORRELATE, correlate);
        res.put_attribute(attr_names::ABSOLUTE_TARGET, absolute_target);
        res.put_attribute(attr_names::CLIENT, self.clone());

        Ok(filters::run_incoming(&self.config().incoming, res))
    }

    /// Performs a WebSocket upgrade against `target` (which must use the
    /// `ws` or `wss` scheme), per §4.6. Builds and sends the handshake
    /// request, validates the `101` response, then hands the live socket
    /// off to `factory` to construct the caller's session type `S`. Does
    /// not run `rewrite::rewrite_request` — the upgrade's own `Connection:
    /// Upgrade` framing must survive untouched — but attaches the same
    /// `socket`/`correlate`/`absoluteTarget`/`client` attributes to the
    /// handshake request as `send` does.
    pub fn upgrade<F, S>(&self, target: Uri, factory: &F) -> NetResult<S>
    where
        F: crate::collab::WebSocketSessionFactory<S>,
    {
        match target.scheme.as_deref() {
            Some("ws" | "wss") => {}
            _ => {
                return Err(NetError::RequestAborted(
                    "websocket target must use the ws or wss scheme".to_string(),
                ));
            }
        }

        let (mut req, key) = websocket::build_upgrade_request(target.clone());
        let correlate = self.next_correlate();

        tracing::debug!(target = %target, "connecting for websocket upgrade");
        let channel = self.connect(&target)?;
        let socket_for_req = channel.try_clone_channel()?;

        req.put_attribute(attr_names::SOCKET, socket_for_req);
        req.put_attribute(attr_names::CORRELATE, correlate.clone());
        req.put_attribute(attr_names::ABSOLUTE_TARGET, target.clone());
        req.put_attribute(attr_names::CLIENT, self.clone());

        let conn = ClientConnection::new(
            channel,
            self.config().buffer_size,
            self.config().read_timeout,
            self.config().continue_timeout,
            self.config().max_headers,
            self.config().max_body_length,
        )?;

        let (status_line, headers, upgraded) = conn.upgrade(req)?;

        let mut res = HttpResponse::new(status_line.version, status_line.status);
        res.headers = headers;
        websocket::validate_upgrade_response(&res, &key)?;

        websocket::complete_upgrade(upgraded, &correlate, &target, factory)
    }

    fn connect(&self, target: &Uri) -> NetResult<Box<dyn ByteChannel>> {
        let authority = target
            .authority
            .as_ref()
            .ok_or_else(|| NetError::RequestAborted("missing authority".to_string()))?;
        let port = target.port().ok_or_else(|| {
            NetError::RequestAborted("cannot determine port for target".to_string())
        })?;
        let tls_needed = matches!(target.scheme.as_deref(), Some("https" | "wss"));

        let channel = self.config().socket_factory.connect(&authority.host, port, false)?;
        if tls_needed {
            let provider = self.config().tls.as_ref().ok_or_else(|| {
                NetError::RequestAborted("target requires TLS but no TlsProvider configured".to_string())
            })?;
            provider.wrap(channel, &authority.host)
        } else {
            Ok(channel)
        }
    }

    fn attach_cookies(&self, req: &mut HttpRequest, target: &Uri) {
        let cookies = self.config().cookie_store.get(target);
        if cookies.is_empty() {
            return;
        }
        let joined = cookies
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        req.headers.append(COOKIE, joined.into());
    }

    fn store_cookies(&self, res: &HttpResponse, target: &Uri) {
        for value in res.headers.get_all(&SET_COOKIE) {
            self.config().cookie_store.put(target, &value.as_str());
        }
    }
}

/// Builds a `Client` from a `ClientConfigBuilder`, mirroring the teacher's
/// `ClientBuilder` but assembling the collaborator-driven engine instead of
/// a direct socket connection.
#[derive(Default)]
pub struct ClientBuilder {
    inner: ClientConfigBuilder,
}

impl ClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.inner = self.inner.buffer_size(size);
        self
    }

    #[must_use]
    pub fn read_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.inner = self.inner.read_timeout(timeout);
        self
    }

    #[must_use]
    pub fn continue_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.inner = self.inner.continue_timeout(timeout);
        self
    }

    #[must_use]
    pub fn cookie_store(mut self, store: Arc<dyn CookieStore>) -> Self {
        self.inner = self.inner.cookie_store(store);
        self
    }

    #[must_use]
    pub fn tls(mut self, provider: Arc<dyn TlsProvider>) -> Self {
        self.inner = self.inner.tls(provider);
        self
    }

    #[must_use]
    pub fn socket_factory(mut self, factory: Arc<dyn SocketFactory>) -> Self {
        self.inner = self.inner.socket_factory(factory);
        self
    }

    #[must_use]
    pub fn outgoing_filter(mut self, filter: RequestFilter) -> Self {
        self.inner = self.inner.outgoing_filter(filter);
        self
    }

    #[must_use]
    pub fn incoming_filter(mut self, filter: ResponseFilter) -> Self {
        self.inner = self.inner.incoming_filter(filter);
        self
    }

    #[must_use]
    pub fn build(self) -> Client {
        Client::new(self.inner.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, Version};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn send_rejects_relative_target() {
        let client = ClientBuilder::new().build();
        let req = HttpRequest::new(Method::Get, Uri::parse("/only/a/path").unwrap(), Version::OneDotOne);
        assert!(client.send(req).is_err());
    }

    #[test]
    fn send_round_trips_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok")
                .unwrap();
        });

        let client = ClientBuilder::new().build();
        let target = Uri::parse(&format!("http://127.0.0.1:{port}/")).unwrap();
        let res = client.get(target).unwrap();
        assert_eq!(res.status().code(), 200);
        server.join().unwrap();
    }

    struct RecordingUpgradeFactory;

    struct RecordedSession {
        correlate: String,
        version: u8,
    }

    impl crate::collab::WebSocketSessionFactory<RecordedSession> for RecordingUpgradeFactory {
        fn for_client(
            &self,
            _channel: Box<dyn ByteChannel>,
            correlate: &str,
            _target: &Uri,
            version: u8,
        ) -> NetResult<RecordedSession> {
            Ok(RecordedSession { correlate: correlate.to_string(), version })
        }
    }

    #[test]
    fn upgrade_rejects_non_websocket_scheme() {
        let client = ClientBuilder::new().build();
        let target = Uri::parse("http://example.com/chat").unwrap();
        assert!(client.upgrade(target, &RecordingUpgradeFactory).is_err());
    }

    #[test]
    fn upgrade_completes_handshake_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]);
            let key = request
                .lines()
                .find_map(|line| line.strip_prefix("Sec-WebSocket-Key: "))
                .unwrap()
                .trim()
                .to_string();
            let accept = crate::client::websocket::accept_value(&key);
            let response = format!(
                "HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Accept: {accept}\r\n\r\n"
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        let client = ClientBuilder::new().build();
        let target = Uri::parse(&format!("ws://127.0.0.1:{port}/chat")).unwrap();
        let session = client.upgrade(target, &RecordingUpgradeFactory).unwrap();
        assert_eq!(session.version, 13);
        assert!(!session.correlate.is_empty());
        server.join().unwrap();
    }
}
