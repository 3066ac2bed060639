//! Readers that misbehave on purpose.

use std::io::{self, Read};

/// Reader that yields at most `limit` bytes of `data`, then reports end of
/// input.
///
/// Used to simulate a source that stops before delivering everything the
/// caller expects.
#[derive(Debug, Clone)]
pub struct ShortReader {
    data: Vec<u8>,
    pos: usize,
    limit: usize,
}

impl ShortReader {
    /// Creates a reader over `data` that stops after `limit` bytes.
    pub fn new(data: impl Into<Vec<u8>>, limit: usize) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            limit,
        }
    }
}

impl Read for ShortReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let end = self.data.len().min(self.limit);
        let n = (end.saturating_sub(self.pos)).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Reader that yields `data` and then fails with `kind`.
#[derive(Debug, Clone)]
pub struct FailingReader {
    data: Vec<u8>,
    pos: usize,
    kind: io::ErrorKind,
}

impl FailingReader {
    /// Creates a reader that fails with `kind` once `data` is exhausted.
    pub fn new(data: impl Into<Vec<u8>>, kind: io::ErrorKind) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            kind,
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Err(io::Error::new(self.kind, "injected read failure"));
        }
        let n = (self.data.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
