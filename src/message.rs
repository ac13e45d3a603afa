use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::{Cursor, Read};

use crate::errors::NetResult;

/// The byte source backing a message body.
///
/// `Empty` carries no bytes at all (used for bodiless requests and
/// responses that must not have a body per §4.3/§4.5). `Buffered` holds
/// bytes already materialized in memory. `Reader` wraps an arbitrary
/// `Read` — for an incoming response this is the socket's remaining
/// input, consumed lazily by the body decoder.
pub enum Entity {
    Empty,
    Buffered(Vec<u8>),
    Reader(Box<dyn Read + Send>),
}

impl Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("Entity::Empty"),
            Self::Buffered(b) => write!(f, "Entity::Buffered({} bytes)", b.len()),
            Self::Reader(_) => f.write_str("Entity::Reader(..)"),
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::Empty
    }
}

impl Entity {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// A best-effort size hint, used for `Content-Length` selection on the
    /// write path. Only `Buffered` entities know their size in advance.
    #[must_use]
    pub fn known_size(&self) -> Option<u64> {
        match self {
            Self::Empty => Some(0),
            Self::Buffered(b) => Some(b.len() as u64),
            Self::Reader(_) => None,
        }
    }

    /// Returns a boxed reader over this entity's bytes, consuming it.
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        match self {
            Self::Empty => Box::new(Cursor::new(Vec::new())),
            Self::Buffered(b) => Box::new(Cursor::new(b)),
            Self::Reader(r) => r,
        }
    }
}

impl From<Vec<u8>> for Entity {
    fn from(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            Self::Empty
        } else {
            Self::Buffered(bytes)
        }
    }
}

impl From<String> for Entity {
    fn from(s: String) -> Self {
        Self::from(s.into_bytes())
    }
}

impl From<&str> for Entity {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

/// A typed side-channel carried alongside a request/response, keyed by
/// the well-known attribute names in §4.6 (`scamper.client.message.*`).
///
/// A typed `HashMap<&'static str, Box<dyn Any + Send>>` rather than a
/// stringly-typed value map, per the design note favoring typed context
/// over `Map<String, Object>` in a statically typed language.
#[derive(Default)]
pub struct Attributes(HashMap<&'static str, Box<dyn Any + Send>>);

impl Debug for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attributes")
            .field("keys", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Clone for Attributes {
    fn clone(&self) -> Self {
        // Attribute values are not required to be `Clone` (e.g. a socket
        // handle); a cloned message starts with an empty attribute set.
        Self::default()
    }
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<T: Any + Send>(&mut self, key: &'static str, value: T) {
        self.0.insert(key, Box::new(value));
    }

    #[must_use]
    pub fn get<T: Any + Send>(&self, key: &'static str) -> Option<&T> {
        self.0.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn remove(&mut self, key: &'static str) -> bool {
        self.0.remove(key).is_some()
    }

    #[must_use]
    pub fn has(&self, key: &'static str) -> bool {
        self.0.contains_key(key)
    }
}

pub mod attr_names {
    pub const SOCKET: &str = "scamper.client.message.socket";
    pub const CORRELATE: &str = "scamper.client.message.correlate";
    pub const ABSOLUTE_TARGET: &str = "scamper.client.message.absoluteTarget";
    pub const CLIENT: &str = "scamper.client.message.client";
    pub const RESPONSE_REQUEST: &str = "scamper.client.response.request";
}

/// Shared behavior for draining a message body without materializing it,
/// used by both `HttpRequest` and `HttpResponse`.
pub trait Drainable {
    fn entity_mut(&mut self) -> &mut Entity;

    /// Reads and discards the decoded body, failing with
    /// `ReadLimitExceeded` if more than `max_length` bytes are seen.
    fn drain(&mut self, max_length: u64) -> NetResult<()> {
        use crate::stream::BoundedReader;

        let entity = std::mem::take(self.entity_mut());
        let mut bounded = BoundedReader::new(entity.into_reader(), max_length, max_length);
        let mut sink = [0u8; 4096];
        loop {
            let n = bounded.read(&mut sink)?;
            if n == 0 {
                break;
            }
        }
        Ok(())
    }
}
