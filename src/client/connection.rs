//! The per-request wire engine: one `ClientConnection` owns one socket for
//! the lifetime of a single request/response exchange. The library always
//! sets `Connection: close` (see `rewrite`), so there is no keep-alive pool
//! to manage — each `exchange` consumes its connection.

use std::io::{BufRead, BufReader, Read, Write};
use std::time::Duration;

use crate::body::BodyDecoder;
use crate::collab::ByteChannel;
use crate::errors::NetError;
use crate::errors::NetResult;
use crate::header::accessors::TypedHeaders;
use crate::header::Headers;
use crate::http::Method;
use crate::message::{attr_names, Entity};
use crate::request::HttpRequest;
use crate::response::{HttpResponse, StatusLine};
use crate::stream::HeaderStreamReader;

/// Mirrors the client-side state machine in §4.7, tracked for diagnostics
/// rather than branching logic (the actual control flow below is linear).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Idle,
    HeadersSent,
    WaitingContinue,
    SendingBody,
    AwaitingStatus,
    ReadingHeaders,
    ReadingBody,
    Done,
    Failed,
}

pub struct ClientConnection {
    writer: Box<dyn ByteChannel>,
    reader: BufReader<Box<dyn ByteChannel>>,
    read_timeout: Duration,
    continue_timeout: Duration,
    max_headers: u16,
    max_body_length: u64,
    state: ConnState,
}

impl ClientConnection {
    pub fn new(
        channel: Box<dyn ByteChannel>,
        buffer_size: usize,
        read_timeout: Duration,
        continue_timeout: Duration,
        max_headers: u16,
        max_body_length: u64,
    ) -> NetResult<Self> {
        let reader_channel = channel.try_clone_channel()?;
        Ok(Self {
            writer: channel,
            reader: BufReader::with_capacity(buffer_size, reader_channel),
            read_timeout,
            continue_timeout,
            max_headers,
            max_body_length,
            state: ConnState::Idle,
        })
    }

    #[must_use]
    pub fn state(&self) -> ConnState {
        self.state
    }

    /// Runs one request/response exchange, consuming the connection and the
    /// request. The request's entity is taken (left `Empty`) since its
    /// bytes are streamed out over the socket, but the request itself
    /// (headers, line, and attributes) survives and is attached to the
    /// returned response as its `response.request` attribute, per §4.6.
    /// The returned response's entity borrows the remainder of the
    /// socket's input stream for lazy decoding.
    pub fn exchange(mut self, mut req: HttpRequest) -> NetResult<HttpResponse> {
        let method = req.method().clone();
        let outcome = self.drive_to_status_line(&mut req);
        let (status_line, headers) = match outcome {
            Ok(received) => received,
            Err(e) => {
                self.state = ConnState::Failed;
                tracing::error!(error = %e, "request/response exchange failed");
                return Err(e);
            }
        };

        match self.finish_response(status_line, headers, &method, req) {
            Ok(response) => {
                self.state = ConnState::Done;
                Ok(response)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to decode response body");
                Err(e)
            }
        }
    }

    /// Runs the request/response line-and-header phase: writes the request,
    /// negotiates `100 Continue` if requested, sends the body, and reads
    /// back the final status line and headers. Leaves `self` positioned to
    /// decode the body via `finish_response`.
    fn drive_to_status_line(
        &mut self,
        req: &mut HttpRequest,
    ) -> NetResult<(StatusLine, Headers)> {
        self.state = ConnState::Idle;

        let mut head = Vec::new();
        req.write_head(&mut head)?;
        self.writer.write_all(&head)?;
        self.state = ConnState::HeadersSent;
        tracing::debug!(method = %req.method(), target = %req.line.target, "request headers sent");

        let has_body = !req.entity.is_empty();
        let expect_continue = req.headers.has_expect_continue() && has_body;

        if expect_continue {
            self.state = ConnState::WaitingContinue;
            if let Some(early) = self.await_continue_or_early_status()? {
                self.state = ConnState::Done;
                return Ok(early);
            }
            self.state = ConnState::SendingBody;
            self.write_body(req)?;
        } else if has_body {
            self.state = ConnState::SendingBody;
            self.write_body(req)?;
        }

        self.writer.flush()?;
        self.state = ConnState::AwaitingStatus;

        let (status_line, headers) = HttpResponse::read_head(&mut self.reader, self.max_headers)?;
        self.state = ConnState::ReadingHeaders;
        tracing::debug!(status = status_line.status.code(), "response headers received");

        Ok((status_line, headers))
    }

    /// Waits up to `continue_timeout` for an interim `100 Continue`.
    ///
    /// Returns `Ok(None)` if a 100 arrived (or the wait timed out, in which
    /// case the body is sent optimistically, matching common client
    /// behavior for a slow-to-respond server) — the caller proceeds to send
    /// the body and read the real final response afterward. Returns
    /// `Ok(Some((status, headers)))` if the server answered with a non-1xx
    /// status before any body was sent; that status *is* the final
    /// response, and no body is transmitted.
    fn await_continue_or_early_status(&mut self) -> NetResult<Option<(StatusLine, Headers)>> {
        self.reader.get_mut().set_read_timeout(Some(self.continue_timeout))?;
        let mut line = String::new();
        let read = self.reader.read_line(&mut line);
        self.reader.get_mut().set_read_timeout(Some(self.read_timeout))?;

        match read {
            Ok(0) => Err(NetError::UnexpectedEof),
            Ok(_) => {
                let status_line = StatusLine::parse(line.trim_end_matches(['\r', '\n']))?;
                let headers =
                    HeaderStreamReader::new(&mut self.reader, self.max_headers).read_headers()?;
                if status_line.status.is_informational() {
                    Ok(None)
                } else {
                    Ok(Some((status_line, headers)))
                }
            }
            Err(e) if is_timeout(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_body(&mut self, req: &mut HttpRequest) -> NetResult<()> {
        let chunked = req.headers.transfer_codings().iter().any(|c| c.is_chunked());
        let mut source = std::mem::take(&mut req.entity).into_reader();

        if chunked {
            let mut buf = [0u8; 8192];
            loop {
                let n = source.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                write!(self.writer, "{n:x}\r\n")?;
                self.writer.write_all(&buf[..n])?;
                self.writer.write_all(b"\r\n")?;
            }
            self.writer.write_all(b"0\r\n\r\n")?;
        } else {
            std::io::copy(&mut source, &mut self.writer)?;
        }
        Ok(())
    }

    /// Decodes the body for a received status line + headers, moves the
    /// reader into the response's entity, and attaches `req` (the final
    /// outgoing request) as the response's `response.request` attribute.
    fn finish_response(
        self,
        status_line: StatusLine,
        headers: Headers,
        request_method: &Method,
        req: HttpRequest,
    ) -> NetResult<HttpResponse> {
        let mut response = HttpResponse::new(status_line.version, status_line.status);
        let force_empty = response.forces_empty_body(request_method);
        response.headers = headers;

        let raw: Box<dyn Read + Send> = Box::new(self.reader);
        let decoder = BodyDecoder::new(self.max_body_length);
        let decoded = decoder.decode(false, force_empty, &response.headers, raw)?;
        response.entity = Entity::Reader(decoded);
        response.put_attribute(attr_names::RESPONSE_REQUEST, req);
        Ok(response)
    }

    /// Runs the handshake phase of a WebSocket upgrade: writes `req`, reads
    /// back the status line and headers, and — unlike `exchange` — does not
    /// route the remaining socket bytes through `BodyDecoder`. A `101`
    /// response carries no body; whatever the peer sends past its headers
    /// belongs to the WebSocket session, so the socket is handed back whole
    /// (with anything already buffered in `reader` preserved) rather than
    /// consumed as a decoded response body.
    pub fn upgrade(mut self, mut req: HttpRequest) -> NetResult<(StatusLine, Headers, Box<dyn ByteChannel>)> {
        let outcome = self.drive_to_status_line(&mut req);
        match outcome {
            Ok((status_line, headers)) => {
                self.state = ConnState::Done;
                let channel: Box<dyn ByteChannel> = Box::new(UpgradedChannel {
                    reader: self.reader,
                    writer: self.writer,
                });
                Ok((status_line, headers, channel))
            }
            Err(e) => {
                self.state = ConnState::Failed;
                tracing::error!(error = %e, "websocket upgrade handshake failed");
                Err(e)
            }
        }
    }
}

/// The live socket recovered after a successful upgrade handshake. Reads
/// continue through the connection's original `BufReader` so any bytes the
/// peer already sent past its status line and headers (buffered during
/// header parsing) are delivered before new socket reads occur; writes go
/// through the separate writer-half clone the connection always held.
struct UpgradedChannel {
    reader: BufReader<Box<dyn ByteChannel>>,
    writer: Box<dyn ByteChannel>,
}

impl Read for UpgradedChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for UpgradedChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl ByteChannel for UpgradedChannel {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> NetResult<()> {
        self.reader.get_mut().set_read_timeout(timeout)
    }

    fn try_clone_channel(&self) -> NetResult<Box<dyn ByteChannel>> {
        self.writer.try_clone_channel()
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Version;
    use crate::uri::Uri;
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn local_listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[test]
    fn exchange_reads_simple_response() {
        let (listener, port) = local_listener();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello")
                .unwrap();
        });

        let stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        let conn = ClientConnection::new(
            Box::new(stream),
            8192,
            Duration::from_millis(500),
            Duration::from_millis(200),
            64,
            1024,
        )
        .unwrap();

        let req = HttpRequest::new(Method::Get, Uri::parse("http://x/").unwrap(), Version::OneDotOne);
        let mut response = conn.exchange(req).unwrap();

        let mut body = Vec::new();
        if let Entity::Reader(r) = &mut response.entity {
            r.read_to_end(&mut body).unwrap();
        }
        assert_eq!(body, b"hello");
        assert!(response.attributes.get::<HttpRequest>(attr_names::RESPONSE_REQUEST).is_some());
        server.join().unwrap();
    }

    #[test]
    fn exchange_sends_buffered_body() {
        let (listener, port) = local_listener();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"body") || n == 0 {
                    break;
                }
            }
            stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n").unwrap();
            buf
        });

        let stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        let conn = ClientConnection::new(
            Box::new(stream),
            8192,
            Duration::from_millis(500),
            Duration::from_millis(200),
            64,
            1024,
        )
        .unwrap();

        let mut req = HttpRequest::new(Method::Post, Uri::parse("http://x/").unwrap(), Version::OneDotOne);
        req.entity = Entity::Buffered(b"body".to_vec());
        req.headers.set_content_length(4);
        let _ = conn.exchange(req).unwrap();
        let sent = server.join().unwrap();
        assert!(sent.windows(4).any(|w| w == b"body"));
    }

    #[test]
    fn upgrade_returns_status_headers_and_live_channel() {
        let (listener, port) = local_listener();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            stream
                .write_all(
                    b"HTTP/1.1 101 Switching Protocols\r\n\
Upgrade: websocket\r\n\
Connection: Upgrade\r\n\
\r\n\
leftover",
                )
                .unwrap();
        });

        let stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        let conn = ClientConnection::new(
            Box::new(stream),
            8192,
            Duration::from_millis(500),
            Duration::from_millis(200),
            64,
            1024,
        )
        .unwrap();

        let req = HttpRequest::new(Method::Get, Uri::parse("http://x/").unwrap(), Version::OneDotOne);
        let (status_line, headers, mut channel) = conn.upgrade(req).unwrap();
        assert_eq!(status_line.status.code(), 101);
        assert!(headers.has(&crate::header::header_consts::UPGRADE));

        let mut leftover = [0u8; 8];
        channel.read_exact(&mut leftover).unwrap();
        assert_eq!(&leftover, b"leftover");
        server.join().unwrap();
    }
}
