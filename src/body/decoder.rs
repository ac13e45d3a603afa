use std::io::{BufReader, Read};

use flate2::read::{DeflateDecoder, GzDecoder};

use crate::errors::{NetError, NetResult};
use crate::header::accessors::TypedHeaders;
use crate::header::Headers;
use crate::stream::{BoundedReader, ChunkedReader};
use crate::values::coding::{ContentCoding, TransferCoding};

/// At most this many transfer-codings are honored on a single message, per
/// §4.5 — a pathological header with more is rejected outright rather than
/// built into an arbitrarily deep reader stack.
const MAX_CODINGS: usize = 6;

/// Composes the transfer/content coding pipeline described for a message's
/// raw entity into a single decoded byte stream.
pub struct BodyDecoder {
    max_length: u64,
}

impl BodyDecoder {
    #[must_use]
    pub fn new(max_length: u64) -> Self {
        Self { max_length }
    }

    /// Decodes `raw` according to `headers`.
    ///
    /// `is_request` distinguishes the two "missing Content-Length" defaults
    /// (0 for a request, `max_length` for a response). `force_empty` covers
    /// the callers that already know the body must be empty regardless of
    /// headers (1xx/204/304 responses, and responses to `HEAD`).
    pub fn decode(
        &self,
        is_request: bool,
        force_empty: bool,
        headers: &Headers,
        raw: Box<dyn Read + Send>,
    ) -> NetResult<Box<dyn Read + Send>> {
        if force_empty {
            return Ok(Box::new(std::io::empty()));
        }

        let transfer_codings = headers.transfer_codings();
        let content_codings = headers.content_codings();

        if transfer_codings.len() > MAX_CODINGS || content_codings.len() > MAX_CODINGS {
            return Err(NetError::UnsupportedEncoding(
                "too many codings on one message".to_string(),
            ));
        }

        let has_transfer = !transfer_codings.is_empty();

        if has_transfer && headers.has_content_length() {
            tracing::warn!(
                "message carries both Transfer-Encoding and Content-Length; \
                 honoring Transfer-Encoding and ignoring the conflicting length"
            );
        }

        let raw_limit = if has_transfer {
            u64::MAX
        } else if let Some(len) = headers.content_length_option() {
            len.min(self.max_length)
        } else if is_request {
            0
        } else {
            self.max_length
        };

        let mut stream: Box<dyn Read + Send> =
            Box::new(BoundedReader::new(raw, raw_limit, raw_limit));

        for coding in transfer_codings.iter().rev() {
            stream = match coding {
                TransferCoding::Chunked => {
                    Box::new(ChunkedReader::new(BufReader::new(stream)))
                }
                TransferCoding::Gzip => Box::new(GzDecoder::new(stream)),
                TransferCoding::Deflate => Box::new(DeflateDecoder::new(stream)),
                other => return Err(NetError::UnsupportedEncoding(other.to_string())),
            };
        }

        if has_transfer {
            stream = Box::new(BoundedReader::new(stream, self.max_length, self.max_length));
        }

        for coding in content_codings.iter().rev() {
            stream = match coding {
                ContentCoding::Identity => stream,
                ContentCoding::Gzip => Box::new(GzDecoder::new(stream)),
                ContentCoding::Deflate => Box::new(DeflateDecoder::new(stream)),
                other => return Err(NetError::UnsupportedEncoding(other.to_string())),
            };
        }

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::header_consts::{CONTENT_LENGTH, TRANSFER_ENCODING};
    use std::io::Cursor;

    #[test]
    fn plain_body_bounded_by_content_length() {
        let decoder = BodyDecoder::new(1024);
        let mut headers = Headers::new();
        headers.set_content_length(5);
        let raw: Box<dyn Read + Send> = Box::new(Cursor::new(b"hello world".to_vec()));
        let mut out = Vec::new();
        decoder
            .decode(false, false, &headers, raw)
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn missing_content_length_on_request_yields_empty_body() {
        let decoder = BodyDecoder::new(1024);
        let headers = Headers::new();
        let raw: Box<dyn Read + Send> = Box::new(Cursor::new(b"ignored".to_vec()));
        let mut out = Vec::new();
        decoder
            .decode(true, false, &headers, raw)
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn chunked_transfer_encoding_is_decoded() {
        let decoder = BodyDecoder::new(1024);
        let mut headers = Headers::new();
        headers.append(TRANSFER_ENCODING, "chunked".into());
        let raw: Box<dyn Read + Send> = Box::new(Cursor::new(
            b"4\r\nWiki\r\n0\r\n\r\n".to_vec(),
        ));
        let mut out = Vec::new();
        decoder
            .decode(false, false, &headers, raw)
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"Wiki");
    }

    #[test]
    fn forced_empty_ignores_headers() {
        let decoder = BodyDecoder::new(1024);
        let mut headers = Headers::new();
        headers.set_content_length(5);
        let raw: Box<dyn Read + Send> = Box::new(Cursor::new(b"hello".to_vec()));
        let mut out = Vec::new();
        decoder
            .decode(false, true, &headers, raw)
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_content_length_on_response_defaults_to_max_length() {
        let decoder = BodyDecoder::new(3);
        let headers = Headers::new();
        let raw: Box<dyn Read + Send> = Box::new(Cursor::new(b"abcdef".to_vec()));
        let result = decoder.decode(false, false, &headers, raw).unwrap().bytes().collect::<Result<Vec<_>, _>>();
        assert!(result.is_err());
    }
}
