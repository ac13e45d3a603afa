use std::sync::Arc;
use std::time::Duration;

use crate::client::filters::{RequestFilter, ResponseFilter};
use crate::collab::{CookieStore, NoopCookieStore, SocketFactory, TlsProvider, DefaultSocketFactory};
use crate::values::coding::ContentCodingRange;

/// Client-wide configuration, enumerated in §6.
pub struct ClientConfig {
    pub buffer_size: usize,
    pub read_timeout: Duration,
    pub continue_timeout: Duration,
    pub accept_encodings: Vec<ContentCodingRange>,
    pub cookie_store: Arc<dyn CookieStore>,
    pub tls: Option<Arc<dyn TlsProvider>>,
    pub socket_factory: Arc<dyn SocketFactory>,
    pub outgoing: Vec<RequestFilter>,
    pub incoming: Vec<ResponseFilter>,
    pub max_body_length: u64,
    pub max_headers: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            buffer_size: 8192,
            read_timeout: Duration::from_millis(30_000),
            continue_timeout: Duration::from_millis(1_000),
            accept_encodings: Vec::new(),
            cookie_store: Arc::new(NoopCookieStore),
            tls: None,
            socket_factory: Arc::new(DefaultSocketFactory { buffer_size: 8192 }),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            max_body_length: 10 * 1024 * 1024,
            max_headers: 1024,
        }
    }
}

/// Builds a `ClientConfig`, validating the `bufferSize >= 1024` constraint
/// from §6.
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self { config: ClientConfig::default() }
    }
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size.max(1024);
        self
    }

    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    #[must_use]
    pub fn continue_timeout(mut self, timeout: Duration) -> Self {
        self.config.continue_timeout = timeout;
        self
    }

    #[must_use]
    pub fn accept_encodings(mut self, ranges: Vec<ContentCodingRange>) -> Self {
        self.config.accept_encodings = ranges;
        self
    }

    #[must_use]
    pub fn cookie_store(mut self, store: Arc<dyn CookieStore>) -> Self {
        self.config.cookie_store = store;
        self
    }

    #[must_use]
    pub fn tls(mut self, provider: Arc<dyn TlsProvider>) -> Self {
        self.config.tls = Some(provider);
        self
    }

    #[must_use]
    pub fn socket_factory(mut self, factory: Arc<dyn SocketFactory>) -> Self {
        self.config.socket_factory = factory;
        self
    }

    #[must_use]
    pub fn outgoing_filter(mut self, filter: RequestFilter) -> Self {
        self.config.outgoing.push(filter);
        self
    }

    #[must_use]
    pub fn incoming_filter(mut self, filter: ResponseFilter) -> Self {
        self.config.incoming.push(filter);
        self
    }

    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_size_floor_is_enforced() {
        let config = ClientConfigBuilder::new().buffer_size(16).build();
        assert_eq!(config.buffer_size, 1024);
    }

    #[test]
    fn defaults_match_spec_values() {
        let config = ClientConfig::default();
        assert_eq!(config.buffer_size, 8192);
        assert_eq!(config.read_timeout, Duration::from_millis(30_000));
        assert_eq!(config.continue_timeout, Duration::from_millis(1_000));
    }
}
