use std::io::{self, Read};

use crate::errors::NetError;

/// Wraps a byte source, delivering at most `capacity` bytes to the caller
/// and raising `ReadLimitExceeded(limit)` if the source yields more than
/// `limit` bytes before EOF.
///
/// When `limit == capacity` (the common case — see `BodyDecoder`'s
/// post-decode bound), a read that would cross the limit fails even if the
/// final requested byte would itself be within the limit: reaching
/// `capacity` triggers a one-byte probe read of the source to confirm EOF
/// rather than silently truncating an over-long input. When `capacity` is
/// smaller than `limit`, reaching `capacity` is a legitimate truncation
/// point (not an overrun) and delivery simply stops there with `Ok(0)`.
pub struct BoundedReader<R> {
    inner: R,
    limit: u64,
    capacity: u64,
    consumed: u64,
    delivered: u64,
}

impl<R: Read> BoundedReader<R> {
    #[must_use]
    pub fn new(inner: R, limit: u64, capacity: u64) -> Self {
        Self {
            inner,
            limit,
            capacity,
            consumed: 0,
            delivered: 0,
        }
    }

    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.delivered >= self.capacity {
            return Ok(0);
        }

        let want = (self.capacity - self.delivered).min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..want])?;
        self.consumed += n as u64;
        self.delivered += n as u64;

        if n == 0 {
            return Ok(0);
        }

        if self.consumed > self.limit {
            return Err(NetError::ReadLimitExceeded(self.limit).into());
        }

        if self.delivered == self.capacity && self.limit == self.capacity {
            let mut probe = [0u8; 1];
            if self.inner.read(&mut probe)? > 0 {
                self.consumed += 1;
                return Err(NetError::ReadLimitExceeded(self.limit).into());
            }
        }

        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn yields_all_bytes_when_under_limit() {
        let data = b"hello world".to_vec();
        let mut reader = BoundedReader::new(Cursor::new(data.clone()), 100, 100);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn errors_when_source_exceeds_limit() {
        let data = vec![0u8; 20];
        let mut reader = BoundedReader::new(Cursor::new(data), 10, 10);
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn exact_limit_boundary_succeeds() {
        let data = vec![1u8; 10];
        let mut reader = BoundedReader::new(Cursor::new(data), 10, 10);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn capacity_smaller_than_limit_truncates_delivery() {
        let data = vec![2u8; 50];
        let mut reader = BoundedReader::new(Cursor::new(data), 100, 20);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out.len(), 20);
    }
}
