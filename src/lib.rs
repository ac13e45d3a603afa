//! `netkit_http`
//!
//! An HTTP/1.1 message model with typed header accessors, a streaming body
//! pipeline (chunked transfer-coding plus gzip/deflate content-coding
//! composition), and a wire-level client engine with `100-Continue`
//! negotiation and WebSocket upgrade support.

#![deny(clippy::cargo)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::nursery)]
#![deny(clippy::pedantic)]
#![deny(clippy::perf)]
#![deny(clippy::style)]
#![deny(clippy::suspicious)]

pub mod body;
pub mod client;
pub mod collab;
pub mod errors;
pub mod grammar;
pub mod header;
pub mod http;
pub mod message;
pub mod request;
pub mod response;
pub mod stream;
pub mod uri;
pub mod util;
pub mod values;

pub use body::{BodyDecoder, BodyParsers};
pub use client::{Client, ClientBuilder, ClientConfig, ClientConfigBuilder};
pub use errors::{NetError, NetResult, ParseErrorKind};
pub use header::{Header, HeaderKind, HeaderName, Headers, HeaderValue};
pub use http::{Method, Status, Version};
pub use message::{Attributes, Drainable, Entity};
pub use request::{HttpRequest, RequestLine};
pub use response::{HttpResponse, StatusLine};
pub use uri::Uri;
pub use util::trim_whitespace_bytes;

pub mod consts {
    pub use crate::header::header_consts::*;

    /// Default cap on the number of headers accepted on a single message.
    pub const MAX_HEADERS: u16 = 1024;
    /// Default read/write buffer size for a client connection.
    pub const BUFFER_SIZE: usize = 8192;

    #[cfg(test)]
    pub use crate::header::names::TEST_HEADERS;
}
