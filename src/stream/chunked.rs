use std::io::{self, BufRead, Read};

use crate::errors::{NetError, ParseErrorKind};

#[derive(Clone, Debug)]
enum ChunkState {
    /// Waiting to read a `chunk-size [chunk-ext] CRLF` line.
    Start,
    /// Reading the `remaining` data bytes of the current chunk.
    Data(usize),
    /// Consuming the CRLF immediately following a chunk's data.
    End,
    /// Reading and discarding trailer header lines up to the empty line.
    Trailer,
    /// The `0 CRLF CRLF` terminator and trailers have been consumed.
    Done,
}

/// Decodes a `Transfer-Encoding: chunked` body from an underlying reader.
///
/// Consumes `hex-size [;ext]* CRLF data CRLF ... 0 CRLF CRLF`. An EOF
/// encountered mid-chunk or mid-terminator is reported as
/// `NetError::TruncationDetected` rather than silently yielding a short
/// read. Trailer headers, if any, are read and discarded.
pub struct ChunkedReader<R> {
    inner: R,
    state: ChunkState,
}

impl<R: BufRead> ChunkedReader<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: ChunkState::Start,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_chunk_size_line(&mut self) -> io::Result<usize> {
        let mut line = String::new();
        let n = self.inner.read_line(&mut line)?;
        if n == 0 {
            return Err(NetError::TruncationDetected.into());
        }
        let line = line.trim_end_matches(['\r', '\n']);
        let size_str = match memchr::memchr(b';', line.as_bytes()) {
            Some(idx) => &line[..idx],
            None => line,
        }
        .trim();
        usize::from_str_radix(size_str, 16)
            .map_err(|_| NetError::from(ParseErrorKind::Header).into())
    }

    fn consume_chunk_crlf(&mut self) -> io::Result<()> {
        let mut crlf = [0u8; 2];
        self.inner
            .read_exact(&mut crlf)
            .map_err(|_| NetError::TruncationDetected)?;
        if &crlf != b"\r\n" {
            return Err(NetError::from(ParseErrorKind::Header).into());
        }
        Ok(())
    }

    fn consume_trailers(&mut self) -> io::Result<()> {
        loop {
            let mut line = String::new();
            let n = self.inner.read_line(&mut line)?;
            if n == 0 {
                return Err(NetError::TruncationDetected.into());
            }
            if line == "\r\n" || line == "\n" {
                return Ok(());
            }
        }
    }
}

impl<R: BufRead> Read for ChunkedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.state {
                ChunkState::Done => return Ok(0),
                ChunkState::Start => {
                    let size = self.read_chunk_size_line()?;
                    self.state = if size == 0 {
                        ChunkState::Trailer
                    } else {
                        ChunkState::Data(size)
                    };
                }
                ChunkState::Data(remaining) => {
                    if remaining == 0 {
                        self.state = ChunkState::End;
                        continue;
                    }
                    if buf.is_empty() {
                        return Ok(0);
                    }
                    let want = remaining.min(buf.len());
                    let n = self.inner.read(&mut buf[..want])?;
                    if n == 0 {
                        return Err(NetError::TruncationDetected.into());
                    }
                    self.state = ChunkState::Data(remaining - n);
                    return Ok(n);
                }
                ChunkState::End => {
                    self.consume_chunk_crlf()?;
                    self.state = ChunkState::Start;
                }
                ChunkState::Trailer => {
                    self.consume_trailers()?;
                    self.state = ChunkState::Done;
                    return Ok(0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn reader(data: &'static str) -> ChunkedReader<BufReader<Cursor<&'static [u8]>>> {
        ChunkedReader::new(BufReader::new(Cursor::new(data.as_bytes())))
    }

    #[test]
    fn decodes_multiple_chunks() {
        let mut r = reader("4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n");
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"Wikipedia");
    }

    #[test]
    fn decodes_chunk_extensions() {
        let mut r = reader("4;ext=1\r\nWiki\r\n0\r\n\r\n");
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"Wiki");
    }

    #[test]
    fn discards_trailers() {
        let mut r = reader("3\r\nfoo\r\n0\r\nX-Trailer: yes\r\n\r\n");
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"foo");
    }

    #[test]
    fn truncation_mid_chunk_is_an_error() {
        let mut r = reader("a\r\nabc");
        let mut out = Vec::new();
        assert!(r.read_to_end(&mut out).is_err());
    }
}
