//! Typed header accessors bridging the untyped `Headers` list to the value
//! types in `crate::values`.
//!
//! One extension trait (`TypedHeaders`), implemented for `Headers`, so
//! `message.headers().content_length()` reads naturally at call sites
//! without extension methods living directly on `HttpRequest`/`HttpResponse`.

use crate::errors::{NetError, NetResult};
use crate::header::header_consts::{
    CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, EXPECT, HOST, RANGE, TE,
    TRANSFER_ENCODING, WWW_AUTHENTICATE,
};
use crate::header::{Header, HeaderName, HeaderValue, Headers};
use crate::values::auth::Challenge;
use crate::values::coding::{ContentCoding, TransferCoding};
use crate::values::etag::EntityTag;
use crate::values::media::MediaType;

/// Typed read/write access to recognized headers.
///
/// `x` fails with `HeaderNotFound` if the header is absent; `x_option`
/// returns `None` instead. `set_x` replaces any existing headers of that
/// name. Multi-valued headers flatten comma-separated lists across
/// repeated headers before parsing.
pub trait TypedHeaders {
    fn has_content_length(&self) -> bool;
    fn content_length(&self) -> NetResult<u64>;
    fn content_length_option(&self) -> Option<u64>;
    fn set_content_length(&mut self, len: u64);
    fn remove_content_length(&mut self);

    fn has_content_type(&self) -> bool;
    fn content_type(&self) -> NetResult<MediaType>;
    fn content_type_option(&self) -> Option<MediaType>;
    fn set_content_type(&mut self, media_type: &MediaType);

    fn has_host(&self) -> bool;
    fn host(&self) -> NetResult<String>;
    fn host_option(&self) -> Option<String>;
    fn set_host(&mut self, value: impl Into<String>);

    fn transfer_codings(&self) -> Vec<TransferCoding>;
    fn set_transfer_encoding(&mut self, codings: &[TransferCoding]);
    fn remove_transfer_encoding(&mut self);

    fn content_codings(&self) -> Vec<ContentCoding>;
    fn set_content_encoding(&mut self, codings: &[ContentCoding]);

    fn has_expect_continue(&self) -> bool;

    fn te_codings(&self) -> Vec<TransferCoding>;

    fn etag(&self) -> Option<EntityTag>;
    fn set_etag(&mut self, tag: &EntityTag);

    fn range_option(&self) -> Option<String>;

    fn content_range_option(&self) -> Option<String>;

    fn www_authenticate(&self) -> Vec<Challenge>;
}

impl TypedHeaders for Headers {
    fn has_content_length(&self) -> bool {
        self.has(&CONTENT_LENGTH)
    }

    fn content_length(&self) -> NetResult<u64> {
        self.content_length_option()
            .ok_or(NetError::HeaderNotFound("Content-Length"))
    }

    fn content_length_option(&self) -> Option<u64> {
        self.get(&CONTENT_LENGTH)?.as_str().trim().parse().ok()
    }

    fn set_content_length(&mut self, len: u64) {
        let mut buf = itoa::Buffer::new();
        self.set(CONTENT_LENGTH, HeaderValue::from(buf.format(len)));
    }

    fn remove_content_length(&mut self) {
        self.remove(&CONTENT_LENGTH);
    }

    fn has_content_type(&self) -> bool {
        self.has(&CONTENT_TYPE)
    }

    fn content_type(&self) -> NetResult<MediaType> {
        self.content_type_option()
            .ok_or(NetError::HeaderNotFound("Content-Type"))
    }

    fn content_type_option(&self) -> Option<MediaType> {
        MediaType::parse(&self.get(&CONTENT_TYPE)?.as_str()).ok()
    }

    fn set_content_type(&mut self, media_type: &MediaType) {
        self.set(CONTENT_TYPE, HeaderValue::from(media_type.to_string()));
    }

    fn has_host(&self) -> bool {
        self.has(&HOST)
    }

    fn host(&self) -> NetResult<String> {
        self.host_option().ok_or(NetError::HeaderNotFound("Host"))
    }

    fn host_option(&self) -> Option<String> {
        self.get(&HOST).map(|v| v.as_str().into_owned())
    }

    fn set_host(&mut self, value: impl Into<String>) {
        self.set(HOST, HeaderValue::from(value.into()));
    }

    fn transfer_codings(&self) -> Vec<TransferCoding> {
        self.get_combined(&TRANSFER_ENCODING)
            .map(|v| {
                crate::grammar::split_list(&v)
                    .iter()
                    .filter_map(|s| TransferCoding::parse(s).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_transfer_encoding(&mut self, codings: &[TransferCoding]) {
        let joined = codings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.set(TRANSFER_ENCODING, HeaderValue::from(joined));
    }

    fn remove_transfer_encoding(&mut self) {
        self.remove(&TRANSFER_ENCODING);
    }

    fn content_codings(&self) -> Vec<ContentCoding> {
        self.get_combined(&CONTENT_ENCODING)
            .map(|v| {
                crate::grammar::split_list(&v)
                    .iter()
                    .filter_map(|s| ContentCoding::parse(s).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_content_encoding(&mut self, codings: &[ContentCoding]) {
        let joined = codings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.set(CONTENT_ENCODING, HeaderValue::from(joined));
    }

    fn has_expect_continue(&self) -> bool {
        self.get(&EXPECT)
            .is_some_and(|v| v.as_str().eq_ignore_ascii_case("100-continue"))
    }

    fn te_codings(&self) -> Vec<TransferCoding> {
        self.get_combined(&TE)
            .map(|v| {
                crate::grammar::split_list(&v)
                    .iter()
                    .filter_map(|s| TransferCoding::parse(s).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn etag(&self) -> Option<EntityTag> {
        EntityTag::parse(&self.get(&ETAG)?.as_str()).ok()
    }

    fn set_etag(&mut self, tag: &EntityTag) {
        self.set(ETAG, HeaderValue::from(tag.to_string()));
    }

    fn range_option(&self) -> Option<String> {
        self.get(&RANGE).map(|v| v.as_str().into_owned())
    }

    fn content_range_option(&self) -> Option<String> {
        self.get(&CONTENT_RANGE).map(|v| v.as_str().into_owned())
    }

    fn www_authenticate(&self) -> Vec<Challenge> {
        self.get_combined(&WWW_AUTHENTICATE)
            .map(|v| Challenge::parse_all(&v))
            .unwrap_or_default()
    }
}

/// Builds a `Header` for a name/value pair, a small convenience used by
/// call sites that need to hand a `Header` (rather than mutate `Headers`
/// in place) to builder-style APIs.
#[must_use]
pub fn header(name: HeaderName, value: impl Into<HeaderValue>) -> Header {
    Header::new(name, value.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::header_consts::CONTENT_LENGTH;

    #[test]
    fn content_length_typed_round_trip() {
        let mut headers = Headers::new();
        headers.set_content_length(42);
        assert_eq!(headers.content_length().unwrap(), 42);
        assert!(headers.has(&CONTENT_LENGTH));
    }

    #[test]
    fn missing_header_returns_not_found() {
        let headers = Headers::new();
        assert!(matches!(
            headers.content_length(),
            Err(NetError::HeaderNotFound("Content-Length"))
        ));
    }

    #[test]
    fn expect_continue_detection_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.set(EXPECT, HeaderValue::from("100-Continue"));
        assert!(headers.has_expect_continue());
    }
}
