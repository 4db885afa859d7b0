//! # Random-Access Decryption
//!
//! [`DecryptingSource`] is the core of the crate: a plaintext view over an
//! encrypted [`ByteRangeSource`]. Every read derives a fresh keystream
//! state for its offset via the closed-form jump, so reads are pure,
//! order-independent, and safe to issue concurrently — there is no shared
//! cursor to race on.

use crate::crypto::keystream::Key;
use crate::error::KlbdecError;
use crate::source::ByteRangeSource;

/// A randomly readable plaintext view of an encrypted backing source.
///
/// Holds the backing source and the immutable [`Key`]; per-read working
/// state never escapes a single [`read_at`](Self::read_at) call. Because
/// `DecryptingSource` itself implements [`ByteRangeSource`], the plaintext
/// view can be windowed with [`crate::SliceSource`] or handed to any
/// consumer that reads ranges.
pub struct DecryptingSource<S> {
    backing: S,
    key: Key,
}

impl<S: ByteRangeSource> DecryptingSource<S> {
    /// Wrap `backing` with the file's decryption key.
    pub fn new(backing: S, key: Key) -> Self {
        Self { backing, key }
    }

    /// The key this view decrypts with.
    pub fn key(&self) -> Key {
        self.key
    }

    /// Total extent of the backing ciphertext (== plaintext extent; the
    /// cipher is length-preserving).
    pub fn size(&self) -> u64 {
        self.backing.size()
    }

    /// Decrypt `length` plaintext bytes starting at `offset`.
    ///
    /// Independent of any other call: the keystream state is recomputed
    /// from (key, offset) each time, in O(log offset) plus O(length).
    /// A `length` of zero returns an empty buffer without touching the
    /// backing source or the cipher.
    ///
    /// # Errors
    ///
    /// - [`KlbdecError::OutOfRange`] - the range exceeds the backing extent
    /// - [`KlbdecError::Io`] - the backing read failed
    pub fn read_at(&self, offset: u64, length: usize) -> Result<Vec<u8>, KlbdecError> {
        if length == 0 {
            return Ok(Vec::new());
        }

        let mut buf = self.backing.read_range(offset, length)?;
        let mut state = self.key.state_at(offset);
        state.apply(&mut buf);
        Ok(buf)
    }

    /// Decrypt `buf.len()` plaintext bytes starting at `offset` into a
    /// caller-provided buffer.
    ///
    /// Same contract as [`read_at`](Self::read_at), minus the allocation:
    /// ciphertext lands directly in `buf` and is unmasked in place. An
    /// empty `buf` short-circuits without touching the backing source.
    ///
    /// # Errors
    ///
    /// - [`KlbdecError::OutOfRange`] - the range exceeds the backing extent
    /// - [`KlbdecError::Io`] - the backing read failed
    pub fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), KlbdecError> {
        if buf.is_empty() {
            return Ok(());
        }

        self.backing.read_range_into(offset, buf)?;
        let mut state = self.key.state_at(offset);
        state.apply(buf);
        Ok(())
    }

    /// Give the backing source back, dropping the view.
    pub fn into_inner(self) -> S {
        self.backing
    }
}

impl<S: ByteRangeSource> ByteRangeSource for DecryptingSource<S> {
    fn size(&self) -> u64 {
        self.backing.size()
    }

    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>, KlbdecError> {
        self.read_at(offset, length)
    }

    fn read_range_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), KlbdecError> {
        self.read_into(offset, buf)
    }
}
