//! Pre-send request validation and rewriting, per §4.6.

use crate::errors::{NetError, NetResult};
use crate::grammar::split_list;
use crate::header::header_consts::{
    ACCEPT_ENCODING, CONNECTION, CONTENT_LENGTH, HOST, TE, TRANSFER_ENCODING, USER_AGENT,
};
use crate::header::accessors::TypedHeaders;
use crate::header::{Header, Headers};
use crate::http::Method;
use crate::message::Entity;
use crate::request::HttpRequest;
use crate::values::coding::ContentCodingRange;
use crate::values::product::ProductType;

/// The default `User-Agent` product token sent when the caller's request
/// does not already carry one.
fn default_user_agent() -> String {
    ProductType::new("rustnet", Some(env!("CARGO_PKG_VERSION").to_string())).to_string()
}

/// Validates that `req`'s target is absolute with a recognized scheme.
pub fn validate_target(req: &HttpRequest) -> NetResult<()> {
    let target = &req.line.target;
    match target.scheme.as_deref() {
        Some("http" | "https" | "ws" | "wss") => {}
        Some(other) => {
            return Err(NetError::RequestAborted(format!(
                "unsupported target scheme: {other}"
            )));
        }
        None => {
            return Err(NetError::RequestAborted(
                "request target must be absolute".to_string(),
            ));
        }
    }
    if target.authority.is_none() {
        return Err(NetError::RequestAborted(
            "request target is missing an authority".to_string(),
        ));
    }
    Ok(())
}

/// Rewrites `req`'s headers and body framing in place to produce the
/// effective on-wire request. Must run after `validate_target` succeeds.
/// `accept_encodings` is the client's configured `ContentCodingRange` list
/// (§6's `acceptEncodings`), added as `Accept-Encoding` unless the caller
/// already set one.
pub fn rewrite_request(req: &mut HttpRequest, accept_encodings: &[ContentCodingRange]) -> NetResult<()> {
    rewrite_headers(req)?;
    frame_body(req)?;
    apply_accept_encodings(req, accept_encodings);
    Ok(())
}

fn apply_accept_encodings(req: &mut HttpRequest, accept_encodings: &[ContentCodingRange]) {
    if accept_encodings.is_empty() || req.headers.has(&ACCEPT_ENCODING) {
        return;
    }
    let value = accept_encodings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    req.headers.append(ACCEPT_ENCODING, value.into());
}

fn rewrite_headers(req: &mut HttpRequest) -> NetResult<()> {
    let host_value = req
        .line
        .target
        .host_header_value()
        .ok_or_else(|| NetError::RequestAborted("cannot derive Host header".to_string()))?;

    let user_agent = req
        .headers
        .get(&USER_AGENT)
        .map(|v| v.as_str().into_owned())
        .unwrap_or_else(default_user_agent);

    let has_te = req.headers.has(&TE);
    let existing_connection = req.headers.get_combined(&CONNECTION);

    req.headers.remove(&HOST);
    req.headers.remove(&USER_AGENT);
    req.headers.remove(&CONNECTION);

    let mut rebuilt = Headers::new();
    rebuilt.append(HOST, host_value.into());
    rebuilt.append(USER_AGENT, user_agent.into());
    for header in req.headers.iter() {
        rebuilt.append(header.name.clone(), header.value.clone());
    }

    let mut connection_tokens: Vec<String> = existing_connection
        .as_deref()
        .map(split_list)
        .unwrap_or_default()
        .into_iter()
        .filter(|tok| {
            let lower = tok.to_ascii_lowercase();
            lower != "close" && lower != "keep-alive" && lower != "te"
        })
        .collect();
    if has_te {
        connection_tokens.push("TE".to_string());
    }
    connection_tokens.push("close".to_string());
    rebuilt.append(CONNECTION, connection_tokens.join(", ").into());

    req.headers = rebuilt;
    Ok(())
}

fn frame_body(req: &mut HttpRequest) -> NetResult<()> {
    let method = req.line.method.clone();

    if method.is_bodiless() {
        req.entity = Entity::Empty;
        req.headers.remove_content_length();
        req.headers.remove_transfer_encoding();
        return Ok(());
    }

    if !matches!(method, Method::Post | Method::Put | Method::Patch | Method::Options) {
        return Ok(());
    }

    if req.headers.has(&TRANSFER_ENCODING) {
        let mut codings = req.headers.transfer_codings();
        codings.retain(|c| !c.is_chunked());
        codings.push(crate::values::coding::TransferCoding::Chunked);
        req.headers.set_transfer_encoding(&codings);
        req.headers.remove_content_length();
        return Ok(());
    }

    if let Some(len) = req.headers.content_length_option() {
        if len == 0 {
            req.entity = Entity::Empty;
        }
        return Ok(());
    }

    // A caller-set negative Content-Length cannot be represented by the
    // typed accessor's `u64`, so it would already have failed to parse;
    // a textual header value that looks negative is caught here instead.
    if let Some(raw) = req.headers.iter().find(|h| h.name == CONTENT_LENGTH) {
        if raw.value.as_str().trim_start().starts_with('-') {
            return Err(NetError::RequestAborted(
                "negative Content-Length".to_string(),
            ));
        }
    }

    if let Some(size) = req.entity.known_size() {
        req.headers.set_content_length(size);
    } else {
        req.headers.set_transfer_encoding(&[crate::values::coding::TransferCoding::Chunked]);
    }

    Ok(())
}

#[must_use]
pub fn host_header(req: &HttpRequest) -> Option<Header> {
    req.headers
        .get(&HOST)
        .map(|v| Header::new(HOST, v.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Version;
    use crate::uri::Uri;

    fn req(method: Method, target: &str) -> HttpRequest {
        HttpRequest::new(method, Uri::parse(target).unwrap(), Version::OneDotOne)
    }

    #[test]
    fn validate_target_rejects_relative_uri() {
        let r = req(Method::Get, "/just/a/path");
        assert!(validate_target(&r).is_err());
    }

    #[test]
    fn validate_target_rejects_unsupported_scheme() {
        let r = req(Method::Get, "ftp://example.com/");
        assert!(validate_target(&r).is_err());
    }

    #[test]
    fn validate_target_accepts_http() {
        let r = req(Method::Get, "http://example.com/a");
        assert!(validate_target(&r).is_ok());
    }

    #[test]
    fn rewrite_sets_canonical_host_and_user_agent() {
        let mut r = req(Method::Get, "http://example.com:8080/a");
        rewrite_request(&mut r, &[]).unwrap();
        assert_eq!(r.headers.get(&HOST).unwrap().as_str(), "example.com:8080");
        assert!(r.headers.has(&USER_AGENT));
        assert_eq!(r.headers.get(&CONNECTION).unwrap().as_str(), "close");
    }

    #[test]
    fn rewrite_preserves_te_in_connection() {
        let mut r = req(Method::Get, "http://example.com/a");
        r.headers.append(TE, "trailers".into());
        rewrite_request(&mut r, &[]).unwrap();
        assert_eq!(r.headers.get(&CONNECTION).unwrap().as_str(), "TE, close");
    }

    #[test]
    fn get_request_drops_body_framing() {
        let mut r = req(Method::Get, "http://example.com/a");
        r.headers.set_content_length(5);
        r.entity = Entity::Buffered(b"hello".to_vec());
        rewrite_request(&mut r, &[]).unwrap();
        assert!(!r.headers.has_content_length());
        assert!(r.entity.is_empty());
    }

    #[test]
    fn post_with_known_body_size_sets_content_length() {
        let mut r = req(Method::Post, "http://example.com/a");
        r.entity = Entity::Buffered(b"hello".to_vec());
        rewrite_request(&mut r, &[]).unwrap();
        assert_eq!(r.headers.content_length_option(), Some(5));
    }

    #[test]
    fn post_with_unknown_body_size_uses_chunked() {
        let mut r = req(Method::Post, "http://example.com/a");
        r.entity = crate::message::Entity::Reader(Box::new(std::io::Cursor::new(b"x".to_vec())));
        rewrite_request(&mut r, &[]).unwrap();
        assert!(r.headers.transfer_codings().iter().any(|c| c.is_chunked()));
    }

    #[test]
    fn accept_encodings_added_when_absent() {
        use crate::values::coding::{ContentCoding, ContentCodingRange};

        let mut r = req(Method::Get, "http://example.com/a");
        let ranges = vec![
            ContentCodingRange { coding: ContentCoding::Gzip, weight: 1.0 },
            ContentCodingRange { coding: ContentCoding::Deflate, weight: 1.0 },
        ];
        rewrite_request(&mut r, &ranges).unwrap();
        assert_eq!(r.headers.get(&ACCEPT_ENCODING).unwrap().as_str(), "gzip, deflate");
    }

    #[test]
    fn accept_encodings_left_untouched_when_caller_set_one() {
        use crate::values::coding::{ContentCoding, ContentCodingRange};

        let mut r = req(Method::Get, "http://example.com/a");
        r.headers.append(ACCEPT_ENCODING, "br".into());
        let ranges = vec![ContentCodingRange { coding: ContentCoding::Gzip, weight: 1.0 }];
        rewrite_request(&mut r, &ranges).unwrap();
        assert_eq!(r.headers.get(&ACCEPT_ENCODING).unwrap().as_str(), "br");
    }
}
