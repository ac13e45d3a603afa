use std::io::BufRead;

use crate::errors::{NetResult, ParseErrorKind};
use crate::header::{Header, Headers};

/// Reads a header block: CRLF-terminated lines up to the first empty line,
/// folding leading-whitespace continuation lines into the previous header's
/// value with a single space separator.
///
/// The teacher's connection reader parses header lines one at a time with
/// no folding support; this adds the continuation-line handling RFC 7230
/// §3.2.4 deprecates for generation but still requires recipients to accept.
pub struct HeaderStreamReader<'a, R> {
    inner: &'a mut R,
    max_headers: u16,
}

impl<'a, R: BufRead> HeaderStreamReader<'a, R> {
    #[must_use]
    pub fn new(inner: &'a mut R, max_headers: u16) -> Self {
        Self { inner, max_headers }
    }

    /// Reads logical (already-folded) header lines until the terminating
    /// empty line, parsing each into a `Header` and returning the full set.
    pub fn read_headers(&mut self) -> NetResult<Headers> {
        let mut headers = Headers::new();
        let mut pending: Option<String> = None;
        let mut count: u16 = 0;

        loop {
            let mut raw = String::new();
            let n = self.inner.read_line(&mut raw)?;
            if n == 0 {
                return Err(ParseErrorKind::Header.into());
            }
            let line = raw.trim_end_matches(['\r', '\n']);

            if line.is_empty() {
                if let Some(logical) = pending.take() {
                    headers.append_parsed(&logical, &mut count, self.max_headers)?;
                }
                return Ok(headers);
            }

            let starts_with_whitespace = line.starts_with(' ') || line.starts_with('\t');

            if starts_with_whitespace {
                match pending.as_mut() {
                    Some(logical) => {
                        logical.push(' ');
                        logical.push_str(line.trim_start());
                    }
                    None => return Err(ParseErrorKind::Header.into()),
                }
                continue;
            }

            if let Some(logical) = pending.take() {
                headers.append_parsed(&logical, &mut count, self.max_headers)?;
            }
            pending = Some(line.to_string());
        }
    }
}

impl Headers {
    fn append_parsed(&mut self, line: &str, count: &mut u16, max_headers: u16) -> NetResult<()> {
        *count += 1;
        if *count > max_headers {
            return Err(ParseErrorKind::Header.into());
        }
        let header = Header::parse(line)?;
        self.append(header.name, header.value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn folds_continuation_lines() {
        let raw = "X-Long: part-one\r\n part-two\r\n\tpart-three\r\n\r\n";
        let mut reader = BufReader::new(raw.as_bytes());
        let headers = HeaderStreamReader::new(&mut reader, 1024)
            .read_headers()
            .unwrap();
        let value = headers.get_combined("X-Long").unwrap();
        assert_eq!(value, "part-one part-two part-three");
    }

    #[test]
    fn stops_at_empty_line() {
        let raw = "Host: example.com\r\nConnection: close\r\n\r\nbody follows";
        let mut reader = BufReader::new(raw.as_bytes());
        let headers = HeaderStreamReader::new(&mut reader, 1024)
            .read_headers()
            .unwrap();
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn leading_whitespace_on_first_line_is_invalid() {
        let raw = " Host: example.com\r\n\r\n";
        let mut reader = BufReader::new(raw.as_bytes());
        assert!(HeaderStreamReader::new(&mut reader, 1024)
            .read_headers()
            .is_err());
    }

    #[test]
    fn rejects_more_than_max_headers() {
        let raw = "A: 1\r\nB: 2\r\nC: 3\r\n\r\n";
        let mut reader = BufReader::new(raw.as_bytes());
        assert!(HeaderStreamReader::new(&mut reader, 2)
            .read_headers()
            .is_err());
    }
}
