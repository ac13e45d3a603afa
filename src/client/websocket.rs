//! WebSocket upgrade handshake, per §4.6: a `GET` request carrying
//! `Upgrade: websocket`, `Connection: Upgrade`, a freshly generated
//! `Sec-WebSocket-Key`, and `Sec-WebSocket-Version`, validated against the
//! server's `101` response per RFC 6455 §1.3.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;
use sha1::{Digest, Sha1};

use crate::collab::ByteChannel;
use crate::errors::{NetError, NetResult};
use crate::header::header_consts::{
    CONNECTION, HOST, SEC_WEBSOCKET_ACCEPT, SEC_WEBSOCKET_KEY, SEC_WEBSOCKET_VERSION, UPGRADE,
};
use crate::http::{Method, Version};
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::uri::Uri;

const GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Generates a fresh, base64-encoded 16-byte `Sec-WebSocket-Key`.
#[must_use]
pub fn generate_key() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

#[must_use]
pub fn accept_value(key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(GUID.as_bytes());
    BASE64.encode(hasher.finalize())
}

/// Builds the upgrade request for `target`, returning the request and the
/// key it embedded (needed to validate the response's accept value). Does
/// not go through `rewrite::rewrite_request`: that pipeline always rebuilds
/// `Connection` into `close`, which would clobber the `Upgrade` token this
/// handshake requires, so `Host` is set directly here instead.
#[must_use]
pub fn build_upgrade_request(target: Uri) -> (HttpRequest, String) {
    let key = generate_key();
    let host = target.host_header_value();
    let mut req = HttpRequest::new(Method::Get, target, Version::OneDotOne);
    if let Some(host) = host {
        req.headers.append(HOST, host.into());
    }
    req.headers.append(UPGRADE, "websocket".into());
    req.headers.append(CONNECTION, "Upgrade".into());
    req.headers.append(SEC_WEBSOCKET_KEY, key.clone().into());
    req.headers.append(SEC_WEBSOCKET_VERSION, "13".into());
    (req, key)
}

/// Validates a received response as a successful `101` upgrade for `key`.
pub fn validate_upgrade_response(res: &HttpResponse, key: &str) -> NetResult<()> {
    if res.status().code() != 101 {
        return Err(NetError::WebSocketHandshakeFailure(format!(
            "expected 101 Switching Protocols, got {}",
            res.status().code()
        )));
    }
    let upgrade_ok = res
        .headers
        .get_combined(&UPGRADE)
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"));
    if !upgrade_ok {
        return Err(NetError::WebSocketHandshakeFailure(
            "missing or invalid Upgrade header".to_string(),
        ));
    }
    let connection_ok = res
        .headers
        .get_combined(&CONNECTION)
        .is_some_and(|v| v.split(',').any(|tok| tok.trim().eq_ignore_ascii_case("upgrade")));
    if !connection_ok {
        return Err(NetError::WebSocketHandshakeFailure(
            "missing or invalid Connection header".to_string(),
        ));
    }
    let expected = accept_value(key);
    let actual = res.headers.get(&SEC_WEBSOCKET_ACCEPT).map(|v| v.as_str().into_owned());
    if actual.as_deref() != Some(expected.as_str()) {
        return Err(NetError::WebSocketHandshakeFailure(
            "Sec-WebSocket-Accept mismatch".to_string(),
        ));
    }
    Ok(())
}

/// Hands an upgraded channel off to a caller-supplied session factory.
pub fn complete_upgrade<F, S>(
    channel: Box<dyn ByteChannel>,
    correlate: &str,
    target: &Uri,
    factory: &F,
) -> NetResult<S>
where
    F: crate::collab::WebSocketSessionFactory<S>,
{
    factory.for_client(channel, correlate, target, 13)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_value_matches_known_vector() {
        // RFC 6455 §1.3 worked example.
        assert_eq!(accept_value("dGhlIHNhbXBsZSBub25jZQ=="), "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
    }

    #[test]
    fn build_upgrade_request_sets_required_headers() {
        let target = Uri::parse("ws://example.com/chat").unwrap();
        let (req, key) = build_upgrade_request(target);
        assert_eq!(req.headers.get(&HOST).unwrap().as_str(), "example.com");
        assert_eq!(req.headers.get(&UPGRADE).unwrap().as_str(), "websocket");
        assert_eq!(req.headers.get(&CONNECTION).unwrap().as_str(), "Upgrade");
        assert_eq!(req.headers.get(&SEC_WEBSOCKET_KEY).unwrap().as_str(), key);
        assert_eq!(req.headers.get(&SEC_WEBSOCKET_VERSION).unwrap().as_str(), "13");
    }

    #[test]
    fn validate_upgrade_response_rejects_wrong_accept() {
        let mut res = HttpResponse::new(Version::OneDotOne, crate::http::Status::from(101));
        res.headers.append(UPGRADE, "websocket".into());
        res.headers.append(CONNECTION, "Upgrade".into());
        res.headers.append(SEC_WEBSOCKET_ACCEPT, "not-the-right-value".into());
        let err = validate_upgrade_response(&res, "dGhlIHNhbXBsZSBub25jZQ==");
        assert!(err.is_err());
    }

    #[test]
    fn validate_upgrade_response_accepts_correct_handshake() {
        let key = "dGhlIHNhbXBsZSBub25jZQ==";
        let mut res = HttpResponse::new(Version::OneDotOne, crate::http::Status::from(101));
        res.headers.append(UPGRADE, "websocket".into());
        res.headers.append(CONNECTION, "Upgrade".into());
        res.headers.append(SEC_WEBSOCKET_ACCEPT, accept_value(key).into());
        assert!(validate_upgrade_response(&res, key).is_ok());
    }
}
