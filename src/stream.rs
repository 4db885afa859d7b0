//! # Sequential Stream Decoding
//!
//! [`DecryptStream`] puts a cursor on top of [`DecryptingSource`] for
//! consumers that want to walk a whole encrypted resource front to back:
//! copying a database file into a plaintext copy, or draining one
//! package-embedded asset of known extent. Seeking is O(log pos) — the
//! cursor repositions via the state jump, never by replaying bytes.

use crate::crypto::keystream::Key;
use crate::decrypt::DecryptingSource;
use crate::error::KlbdecError;
use crate::source::ByteRangeSource;

use std::io::{self, Read, Seek, SeekFrom, Write};

/// Chunk size for whole-resource copies.
const COPY_CHUNK: usize = 64 * 1024;

/// A sequential read cursor over an encrypted resource.
pub struct DecryptStream<S> {
    source: DecryptingSource<S>,
    pos: u64,
}

impl<S: ByteRangeSource> DecryptStream<S> {
    /// Open a stream over `backing` with the cursor at byte 0.
    pub fn open(backing: S, key: Key) -> Self {
        Self {
            source: DecryptingSource::new(backing, key),
            pos: 0,
        }
    }

    /// Current cursor position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Total extent of the resource.
    pub fn size(&self) -> u64 {
        self.source.size()
    }

    /// Reposition the cursor. Cheap; no data is read or replayed.
    ///
    /// Positions past the end are legal and simply make the next read
    /// return nothing, matching ordinary file semantics.
    pub fn seek_to(&mut self, pos: u64) {
        self.pos = pos;
    }

    /// Decrypt up to `n` bytes at the cursor and advance by the number of
    /// bytes actually returned. Returns an empty buffer at or past EOF.
    pub fn read_next(&mut self, n: usize) -> Result<Vec<u8>, KlbdecError> {
        let remaining = self.size().saturating_sub(self.pos);
        let take = (n as u64).min(remaining) as usize;
        let buf = self.source.read_at(self.pos, take)?;
        self.pos += buf.len() as u64;
        Ok(buf)
    }

    /// Drain everything from the cursor to EOF into `out`, in fixed-size
    /// chunks. Returns the number of plaintext bytes written.
    pub fn copy_to<W: Write>(&mut self, out: &mut W) -> Result<u64, KlbdecError> {
        let mut written = 0u64;
        loop {
            let chunk = self.read_next(COPY_CHUNK)?;
            if chunk.is_empty() {
                break;
            }
            out.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }
}

impl<S: ByteRangeSource> Read for DecryptStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // Decrypt straight into the caller's buffer; no intermediate Vec.
        let remaining = self.size().saturating_sub(self.pos);
        let take = (buf.len() as u64).min(remaining) as usize;
        self.source
            .read_into(self.pos, &mut buf[..take])
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        self.pos += take as u64;
        Ok(take)
    }
}

impl<S: ByteRangeSource> Seek for DecryptStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(p) => Some(p),
            SeekFrom::End(d) => self.size().checked_add_signed(d),
            SeekFrom::Current(d) => self.pos.checked_add_signed(d),
        };
        match target {
            Some(p) => {
                self.pos = p;
                Ok(p)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before byte 0",
            )),
        }
    }
}
