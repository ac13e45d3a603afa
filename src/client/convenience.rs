//! One-line verb helpers over `Client::send`, per §5.

use crate::errors::NetResult;
use crate::http::{Method, Version};
use crate::message::Entity;
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::uri::Uri;

use super::Client;

fn request(method: Method, target: Uri) -> HttpRequest {
    HttpRequest::new(method, target, Version::OneDotOne)
}

impl Client {
    pub fn get(&self, target: Uri) -> NetResult<HttpResponse> {
        self.send(request(Method::Get, target))
    }

    pub fn head(&self, target: Uri) -> NetResult<HttpResponse> {
        self.send(request(Method::Head, target))
    }

    pub fn delete(&self, target: Uri) -> NetResult<HttpResponse> {
        self.send(request(Method::Delete, target))
    }

    pub fn options(&self, target: Uri) -> NetResult<HttpResponse> {
        self.send(request(Method::Options, target))
    }

    pub fn trace(&self, target: Uri) -> NetResult<HttpResponse> {
        self.send(request(Method::Trace, target))
    }

    pub fn post(&self, target: Uri, body: Vec<u8>) -> NetResult<HttpResponse> {
        let mut req = request(Method::Post, target);
        req.set_body(Entity::Buffered(body));
        self.send(req)
    }

    pub fn put(&self, target: Uri, body: Vec<u8>) -> NetResult<HttpResponse> {
        let mut req = request(Method::Put, target);
        req.set_body(Entity::Buffered(body));
        self.send(req)
    }

    pub fn patch(&self, target: Uri, body: Vec<u8>) -> NetResult<HttpResponse> {
        let mut req = request(Method::Patch, target);
        req.set_body(Entity::Buffered(body));
        self.send(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientBuilder;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn post_sends_buffered_body_with_content_length() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(b"\r\n\r\n".len()).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
                .unwrap();
            buf
        });

        let client = ClientBuilder::new().build();
        let target = Uri::parse(&format!("http://127.0.0.1:{port}/submit")).unwrap();
        let res = client.post(target, b"hi".to_vec()).unwrap();
        assert_eq!(res.status().code(), 200);
        let sent = server.join().unwrap();
        let head = String::from_utf8_lossy(&sent);
        assert!(head.contains("Content-Length: 2"));
    }
}
