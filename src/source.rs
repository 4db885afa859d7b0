//! # Backing Byte Sources
//!
//! [`ByteRangeSource`] is the capability the decryption layer reads
//! ciphertext through: anything that can report a size and hand back raw
//! bytes for an `(offset, length)` pair. Implementations here cover the
//! two shapes the format actually ships in — a standalone encrypted file
//! ([`FileSource`]) and a logical slice of a larger package file
//! ([`SliceSource`]) — plus in-memory slices for tests.

use crate::error::KlbdecError;

use std::fs::File;
use std::path::Path;

/// Random-access provider of raw (encrypted) bytes.
///
/// Logically read-only; implementations take `&self` so any number of
/// readers may issue ranges concurrently.
pub trait ByteRangeSource {
    /// Total extent of the source in bytes.
    fn size(&self) -> u64;

    /// Exactly `length` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// - [`KlbdecError::OutOfRange`] - the range exceeds [`size`](Self::size)
    /// - [`KlbdecError::Io`] - the underlying read failed
    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>, KlbdecError>;

    /// Fill `buf` with the bytes starting at `offset`.
    ///
    /// Same contract as [`read_range`](Self::read_range) with
    /// `buf.len()` as the length; implementations that can read straight
    /// into the caller's buffer override this to skip the intermediate
    /// allocation.
    fn read_range_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), KlbdecError> {
        let chunk = self.read_range(offset, buf.len())?;
        buf.copy_from_slice(&chunk);
        Ok(())
    }
}

/// Bounds check shared by every implementation.
fn check_extent(offset: u64, length: usize, size: u64) -> Result<(), KlbdecError> {
    let end = offset.checked_add(length as u64);
    match end {
        Some(end) if end <= size => Ok(()),
        _ => Err(KlbdecError::OutOfRange {
            offset,
            length: length as u64,
            size,
        }),
    }
}

impl ByteRangeSource for [u8] {
    fn size(&self) -> u64 {
        self.len() as u64
    }

    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>, KlbdecError> {
        check_extent(offset, length, self.len() as u64)?;
        let start = offset as usize;
        Ok(self[start..start + length].to_vec())
    }

    fn read_range_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), KlbdecError> {
        check_extent(offset, buf.len(), self.len() as u64)?;
        let start = offset as usize;
        buf.copy_from_slice(&self[start..start + buf.len()]);
        Ok(())
    }
}

impl ByteRangeSource for Vec<u8> {
    fn size(&self) -> u64 {
        self.as_slice().size()
    }

    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>, KlbdecError> {
        self.as_slice().read_range(offset, length)
    }

    fn read_range_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), KlbdecError> {
        self.as_slice().read_range_into(offset, buf)
    }
}

impl<T: ByteRangeSource + ?Sized> ByteRangeSource for &T {
    fn size(&self) -> u64 {
        (**self).size()
    }

    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>, KlbdecError> {
        (**self).read_range(offset, length)
    }

    fn read_range_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), KlbdecError> {
        (**self).read_range_into(offset, buf)
    }
}

/// A read-only file exposed as a byte-range source.
///
/// Uses positional reads, so one open handle serves any number of worker
/// threads without seeking under each other.
pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    /// Open `path` read-only and record its extent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KlbdecError> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }
}

impl ByteRangeSource for FileSource {
    fn size(&self) -> u64 {
        self.len
    }

    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>, KlbdecError> {
        check_extent(offset, length, self.len)?;
        let mut buf = vec![0u8; length];
        self.read_range_into(offset, &mut buf)?;
        Ok(buf)
    }

    #[cfg(unix)]
    fn read_range_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), KlbdecError> {
        use std::os::unix::fs::FileExt;

        check_extent(offset, buf.len(), self.len)?;
        self.file.read_exact_at(buf, offset)?;
        Ok(())
    }

    #[cfg(windows)]
    fn read_range_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), KlbdecError> {
        use std::os::windows::fs::FileExt;

        check_extent(offset, buf.len(), self.len)?;
        let mut done = 0;
        while done < buf.len() {
            let n = self.file.seek_read(&mut buf[done..], offset + done as u64)?;
            if n == 0 {
                return Err(KlbdecError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "container truncated mid-range",
                )));
            }
            done += n;
        }
        Ok(())
    }
}

/// A logical `(offset, length)` window over another source.
///
/// Package files concatenate many independently encrypted assets; the
/// index database records where each one lives. A `SliceSource` makes one
/// such entry look like a standalone container, with its own origin.
#[derive(Debug)]
pub struct SliceSource<S> {
    inner: S,
    start: u64,
    len: u64,
}

impl<S: ByteRangeSource> SliceSource<S> {
    /// Window `inner` down to `[start, start + len)`.
    ///
    /// # Errors
    ///
    /// - [`KlbdecError::OutOfRange`] - the window exceeds `inner`'s extent
    pub fn new(inner: S, start: u64, len: u64) -> Result<Self, KlbdecError> {
        match start.checked_add(len) {
            Some(end) if end <= inner.size() => Ok(Self { inner, start, len }),
            _ => Err(KlbdecError::OutOfRange {
                offset: start,
                length: len,
                size: inner.size(),
            }),
        }
    }
}

impl<S: ByteRangeSource> ByteRangeSource for SliceSource<S> {
    fn size(&self) -> u64 {
        self.len
    }

    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>, KlbdecError> {
        check_extent(offset, length, self.len)?;
        self.inner.read_range(self.start + offset, length)
    }

    fn read_range_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), KlbdecError> {
        check_extent(offset, buf.len(), self.len)?;
        self.inner.read_range_into(self.start + offset, buf)
    }
}
