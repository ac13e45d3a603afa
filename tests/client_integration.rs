//! End-to-end wire-engine scenarios over an in-process loopback listener,
//! covering the concrete testable-property scenarios: a plain bodiless GET,
//! a chunked+gzip response, and both `100-Continue` outcomes.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;

use netkit_http::body::BodyParsers;
use netkit_http::client::ClientBuilder;
use netkit_http::header::header_consts::EXPECT;
use netkit_http::message::Entity;
use netkit_http::uri::Uri;

fn listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

fn read_request_head(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || n == 0 {
            break;
        }
    }
    buf
}

#[test]
fn get_bodiless_plain_response() {
    let (srv, port) = listener();
    let server = thread::spawn(move || {
        let (mut stream, _) = srv.accept().unwrap();
        let _ = read_request_head(&mut stream);
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=UTF-8\r\n\
                  Content-Length: 13\r\n\r\nHello, world!",
            )
            .unwrap();
    });

    let client = ClientBuilder::new().build();
    let target = Uri::parse(&format!("http://127.0.0.1:{port}/motd")).unwrap();
    let mut res = client.get(target).unwrap();
    assert_eq!(res.status().code(), 200);

    let text = match std::mem::take(&mut res.entity) {
        Entity::Reader(r) => BodyParsers::string(r, 1024, None).unwrap(),
        other => panic!("expected a streamed body, got {other:?}"),
    };
    assert_eq!(text, "Hello, world!");
    server.join().unwrap();
}

#[test]
fn chunked_gzip_response_is_decoded() {
    let (srv, port) = listener();
    let server = thread::spawn(move || {
        let (mut stream, _) = srv.accept().unwrap();
        let _ = read_request_head(&mut stream);

        let mut gz = GzEncoder::new(Vec::new(), Compression::fast());
        gz.write_all(b"decompressed payload").unwrap();
        let compressed = gz.finish().unwrap();

        stream
            .write_all(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Encoding: gzip\r\n\r\n")
            .unwrap();
        write!(stream, "{:x}\r\n", compressed.len()).unwrap();
        stream.write_all(&compressed).unwrap();
        stream.write_all(b"\r\n0\r\n\r\n").unwrap();
    });

    let client = ClientBuilder::new().build();
    let target = Uri::parse(&format!("http://127.0.0.1:{port}/data")).unwrap();
    let mut res = client.get(target).unwrap();
    assert_eq!(res.status().code(), 200);

    let bytes = match std::mem::take(&mut res.entity) {
        Entity::Reader(r) => BodyParsers::bytes(r, 1024).unwrap(),
        other => panic!("expected a streamed body, got {other:?}"),
    };
    assert_eq!(bytes, b"decompressed payload");
    server.join().unwrap();
}

#[test]
fn expect_continue_honored_sends_body_after_interim_response() {
    let (srv, port) = listener();
    let server = thread::spawn(move || {
        let (mut stream, _) = srv.accept().unwrap();
        let head = read_request_head(&mut stream);
        assert!(String::from_utf8_lossy(&head).contains("Expect: 100-continue"));

        stream.write_all(b"HTTP/1.1 100 Continue\r\n\r\n").unwrap();

        let mut body = vec![0u8; 5];
        stream.read_exact(&mut body).unwrap();
        assert_eq!(&body, b"hello");

        stream
            .write_all(b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n")
            .unwrap();
    });

    let client = ClientBuilder::new()
        .continue_timeout(Duration::from_millis(500))
        .build();
    let target = Uri::parse(&format!("http://127.0.0.1:{port}/obj")).unwrap();
    let mut req = netkit_http::request::HttpRequest::new(
        netkit_http::http::Method::Put,
        target,
        netkit_http::http::Version::OneDotOne,
    );
    req.headers.append(EXPECT, "100-continue".into());
    req.set_body(Entity::Buffered(b"hello".to_vec()));

    let res = client.send(req).unwrap();
    assert_eq!(res.status().code(), 201);
    server.join().unwrap();
}

#[test]
fn expect_continue_refused_skips_body_transmission() {
    let (srv, port) = listener();
    let server = thread::spawn(move || {
        let (mut stream, _) = srv.accept().unwrap();
        let _ = read_request_head(&mut stream);
        stream
            .write_all(b"HTTP/1.1 417 Expectation Failed\r\nContent-Length: 0\r\n\r\n")
            .unwrap();

        // The client must not have sent a body; a further read should see
        // only EOF (or nothing) once it closes its half of the connection.
        let mut probe = [0u8; 8];
        stream.set_read_timeout(Some(Duration::from_millis(200))).unwrap();
        let n = stream.read(&mut probe).unwrap_or(0);
        assert_eq!(n, 0, "client must not transmit the body after a non-1xx status");
    });

    let client = ClientBuilder::new()
        .continue_timeout(Duration::from_millis(500))
        .build();
    let target = Uri::parse(&format!("http://127.0.0.1:{port}/obj")).unwrap();
    let mut req = netkit_http::request::HttpRequest::new(
        netkit_http::http::Method::Put,
        target,
        netkit_http::http::Version::OneDotOne,
    );
    req.headers.append(EXPECT, "100-continue".into());
    req.set_body(Entity::Buffered(b"hello".to_vec()));

    let res = client.send(req).unwrap();
    assert_eq!(res.status().code(), 417);
    server.join().unwrap();
}
