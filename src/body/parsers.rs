use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::errors::{NetError, NetResult};
use crate::uri::QueryString;

/// `decode -> materialize` adapters over an already-decoded body stream.
///
/// Each parser consumes the stream it is given; a `BodyDecoder` must run
/// first to turn the raw wire entity into one of these.
pub struct BodyParsers;

impl BodyParsers {
    /// Reads the entire stream into a buffer, failing with
    /// `EntityTooLarge` the moment more than `max_length` bytes are seen.
    pub fn bytes(mut stream: impl Read, max_length: u64) -> NetResult<Vec<u8>> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            if buf.len() as u64 + n as u64 > max_length {
                return Err(NetError::EntityTooLarge(max_length));
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        Ok(buf)
    }

    /// Decodes the stream as text using the charset named in a
    /// `Content-Type` parameter (defaulting to UTF-8). Non-UTF-8 charsets
    /// fall back to a lossy UTF-8 conversion rather than failing, since
    /// this crate carries no general charset-conversion table.
    pub fn string(stream: impl Read, max_length: u64, _charset: Option<&str>) -> NetResult<String> {
        let bytes = Self::bytes(stream, max_length)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Decodes the stream as a string, then URL-decodes it as an
    /// `x-www-form-urlencoded` query string.
    pub fn query_string(stream: impl Read, max_length: u64) -> NetResult<QueryString> {
        let text = Self::string(stream, max_length, None)?;
        Ok(QueryString::parse(&text))
    }

    /// Returns a buffered `Read` handle over the decoded stream, without
    /// materializing it — for callers that want to stream the body
    /// themselves.
    pub fn reader(stream: impl Read + Send + 'static) -> Box<dyn Read + Send> {
        Box::new(stream)
    }

    /// Writes the decoded stream to `destination`. If `destination` is a
    /// directory, a uniquely-named file is created inside it; otherwise
    /// the destination path is overwritten.
    pub fn file(
        mut stream: impl Read,
        max_length: u64,
        destination: &Path,
    ) -> NetResult<PathBuf> {
        let target = if destination.is_dir() {
            destination.join(unique_file_name())
        } else {
            destination.to_path_buf()
        };

        let mut file = File::create(&target)?;
        let mut chunk = [0u8; 8192];
        let mut written: u64 = 0;
        loop {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            written += n as u64;
            if written > max_length {
                return Err(NetError::EntityTooLarge(max_length));
            }
            file.write_all(&chunk[..n])?;
        }
        file.flush()?;
        Ok(target)
    }
}

fn unique_file_name() -> String {
    let pid = std::process::id();
    let addr = &pid as *const u32 as usize;
    format!("netkit-body-{pid:x}-{addr:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn bytes_collects_full_stream() {
        let out = BodyParsers::bytes(Cursor::new(b"abcdef".to_vec()), 100).unwrap();
        assert_eq!(out, b"abcdef");
    }

    #[test]
    fn bytes_rejects_over_max_length() {
        let err = BodyParsers::bytes(Cursor::new(vec![0u8; 10]), 5).unwrap_err();
        assert!(matches!(err, NetError::EntityTooLarge(5)));
    }

    #[test]
    fn string_defaults_to_utf8() {
        let s = BodyParsers::string(Cursor::new("héllo".as_bytes().to_vec()), 100, None).unwrap();
        assert_eq!(s, "héllo");
    }

    #[test]
    fn query_string_parses_decoded_body() {
        let qs = BodyParsers::query_string(Cursor::new(b"a=1&b=2".to_vec()), 100).unwrap();
        assert_eq!(qs.to_map(), vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
    }

    #[test]
    fn file_overwrites_existing_path() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("netkit-test-{}", std::process::id()));
        let written = BodyParsers::file(Cursor::new(b"data".to_vec()), 100, &path).unwrap();
        assert_eq!(fs::read(&written).unwrap(), b"data");
        let _ = fs::remove_file(&written);
    }
}
