use std::io::{self, SeekFrom};
use std::path::Path;
use std::sync::Arc;

/// Read-only, randomly seekable view over a source blob.
///
/// The bytes are shared behind an [`Arc`] so clones are cheap and never
/// copy the data. Only the cursor is mutable; the scanners in
/// [`crate::process`] take explicit offsets and never touch it.
#[derive(Debug, Clone)]
pub struct ByteStream {
    data: Arc<[u8]>,
    position: usize,
}

impl ByteStream {
    /// Reads the whole file at `path` into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::from(data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current cursor as an absolute offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor, clamping to `[0, len]`.
    ///
    /// Returns the new absolute position.
    pub fn seek(&mut self, pos: SeekFrom) -> usize {
        let len = self.len() as i128;
        let target = match pos {
            SeekFrom::Start(n) => n as i128,
            SeekFrom::Current(n) => self.position as i128 + n as i128,
            SeekFrom::End(n) => len + n as i128,
        };
        self.position = target.clamp(0, len) as usize;
        self.position
    }

    /// Reads the byte under the cursor and advances past it.
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = self.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    /// Reads up to `buf.len()` bytes from the cursor, advancing past them.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let available = self.peek(self.position, buf.len());
        let n = available.len();
        buf[..n].copy_from_slice(available);
        self.position += n;
        n
    }

    pub fn get(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Up to `n` bytes starting at `offset`, without moving the cursor.
    /// Shorter (possibly empty) near the end of the stream.
    pub fn peek(&self, offset: usize, n: usize) -> &[u8] {
        let start = offset.min(self.len());
        let end = offset.saturating_add(n).min(self.len());
        &self.data[start..end]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(data: Vec<u8>) -> Self {
        Self {
            data: data.into(),
            position: 0,
        }
    }
}

impl From<&[u8]> for ByteStream {
    fn from(data: &[u8]) -> Self {
        Self {
            data: data.into(),
            position: 0,
        }
    }
}

impl AsRef<[u8]> for ByteStream {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
