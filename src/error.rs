//! # Error Types
//!
//! This module defines the error types used throughout the library.
//! All operations return [`Result<T, KlbdecError>`](KlbdecError).

use thiserror::Error;

/// The error type for all decryption and extraction operations.
#[derive(Error, Debug)]
pub enum KlbdecError {
    /// I/O error while reading a backing container or writing an artifact.
    ///
    /// This variant wraps [`std::io::Error`] and is automatically created
    /// when underlying file operations fail.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external secret seed could not be obtained or decoded.
    ///
    /// Fatal for the affected container, never for sibling containers in
    /// the same batch run.
    #[error("secret seed unavailable: {0}")]
    SeedUnavailable(String),

    /// Malformed key-derivation input (e.g. an empty seed blob).
    #[error("invalid key-derivation seed: {0}")]
    InvalidSeed(String),

    /// A requested byte range exceeds the backing source's extent.
    ///
    /// Fatal for the single read or job that requested it.
    #[error("range [{offset}, {offset}+{length}) exceeds source size {size}")]
    OutOfRange {
        /// Start of the requested range.
        offset: u64,
        /// Length of the requested range.
        length: u64,
        /// Reported size of the backing source.
        size: u64,
    },

    /// The job was skipped because the batch run was cancelled before it
    /// started. In-flight jobs are never interrupted mid-byte.
    #[error("extraction cancelled before the job started")]
    Cancelled,
}

impl KlbdecError {
    /// `true` for the out-of-range variant, regardless of its payload.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, KlbdecError::OutOfRange { .. })
    }
}
