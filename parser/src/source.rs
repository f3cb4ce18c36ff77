//! A byte source with lookahead and position tracking.

use std::io::{self, Read};

/// Size of the scratch buffer used to fill the lookahead.
const PEEK_CHUNK: usize = 256;

/// A reader which can look at upcoming bytes without consuming them,
/// and which keeps count of the bytes consumed so far.
#[derive(Debug)]
pub struct PeekableSource<R> {
    inner: R,
    lookahead: Vec<u8>,
    position: u64,
}

impl<R> PeekableSource<R> {
    /// Wrap a reader, starting at position 0.
    pub fn new(inner: R) -> Self {
        PeekableSource::with_position(inner, 0)
    }

    /// Wrap a reader which starts at the given position
    /// of the original byte stream.
    pub fn with_position(inner: R, position: u64) -> Self {
        PeekableSource {
            inner,
            lookahead: Vec::new(),
            position,
        }
    }

    /// The number of bytes consumed so far,
    /// including the initial position.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<R> PeekableSource<R>
where
    R: Read,
{
    /// Look at the next `n` bytes without consuming them.
    ///
    /// Fewer bytes are returned if the source ends sooner.
    pub fn peek(&mut self, n: usize) -> io::Result<&[u8]> {
        let mut chunk = [0u8; PEEK_CHUNK];
        while self.lookahead.len() < n {
            let want = (n - self.lookahead.len()).min(PEEK_CHUNK);
            match self.inner.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(got) => self.lookahead.extend_from_slice(&chunk[..got]),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        let n = n.min(self.lookahead.len());
        Ok(&self.lookahead[..n])
    }
}

impl<R> Read for PeekableSource<R>
where
    R: Read,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = if self.lookahead.is_empty() {
            self.inner.read(buf)?
        } else {
            let n = buf.len().min(self.lookahead.len());
            buf[..n].copy_from_slice(&self.lookahead[..n]);
            self.lookahead.drain(..n);
            n
        };
        self.position += n as u64;
        Ok(n)
    }
}
